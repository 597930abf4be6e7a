//! Daily/weekly summaries and the login streak.
//!
//! Pure functions over the full record sequence; the store only knows how
//! to hand back everything, and these do the calendar math.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

/// Aggregate focus time and distraction count over some period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSummary {
    pub focus_secs: u64,
    pub distractions: u64,
}

/// Totals for a single calendar day.
pub fn day_summary(records: &[SessionRecord], date: NaiveDate) -> FocusSummary {
    summarize(records.iter().filter(|r| r.date == date))
}

/// Totals for the ISO week containing `date`.
pub fn week_summary(records: &[SessionRecord], date: NaiveDate) -> FocusSummary {
    let week = date.iso_week();
    summarize(records.iter().filter(|r| r.date.iso_week() == week))
}

fn summarize<'a>(records: impl Iterator<Item = &'a SessionRecord>) -> FocusSummary {
    let mut summary = FocusSummary::default();
    for record in records {
        summary.focus_secs += record.duration_secs;
        summary.distractions += u64::from(record.distractions);
    }
    summary
}

/// Consecutive days ending at `today` with at least `min_daily_focus_secs`
/// of focus time each.
pub fn current_streak(
    records: &[SessionRecord],
    today: NaiveDate,
    min_daily_focus_secs: u64,
) -> u32 {
    // A zero threshold would qualify every calendar day ever.
    let threshold = min_daily_focus_secs.max(1);

    let mut daily: HashMap<NaiveDate, u64> = HashMap::new();
    for record in records {
        *daily.entry(record.date).or_default() += record.duration_secs;
    }

    let mut streak = 0;
    let mut day = today;
    while daily.get(&day).copied().unwrap_or(0) >= threshold {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Human-readable duration, e.g. "2 hrs 5 min" or "12 min".
pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours} hrs {minutes} min")
    } else {
        format!("{minutes} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(d: &str, duration_secs: u64, distractions: u32) -> SessionRecord {
        SessionRecord {
            duration_secs,
            date: date(d),
            distractions,
        }
    }

    #[test]
    fn day_summary_sums_only_that_day() {
        let records = vec![
            record("2026-08-29", 600, 2),
            record("2026-08-29", 300, 1),
            record("2026-08-28", 1000, 9),
        ];
        let summary = day_summary(&records, date("2026-08-29"));
        assert_eq!(summary.focus_secs, 900);
        assert_eq!(summary.distractions, 3);
    }

    #[test]
    fn week_summary_filters_by_iso_week() {
        // 2026-08-24 (Mon) .. 2026-08-30 (Sun) are one ISO week.
        let records = vec![
            record("2026-08-24", 100, 1),
            record("2026-08-30", 200, 1),
            record("2026-08-31", 400, 1), // next week
            record("2026-08-23", 800, 1), // previous week
        ];
        let summary = week_summary(&records, date("2026-08-29"));
        assert_eq!(summary.focus_secs, 300);
        assert_eq!(summary.distractions, 2);
    }

    #[test]
    fn streak_counts_back_from_today() {
        let records = vec![
            record("2026-08-29", 700, 0),
            record("2026-08-28", 650, 0),
            record("2026-08-27", 900, 0),
            // gap on the 26th
            record("2026-08-25", 2000, 0),
        ];
        assert_eq!(current_streak(&records, date("2026-08-29"), 600), 3);
    }

    #[test]
    fn streak_respects_threshold_boundary() {
        let exactly = vec![record("2026-08-29", 600, 0)];
        assert_eq!(current_streak(&exactly, date("2026-08-29"), 600), 1);

        let just_under = vec![record("2026-08-29", 599, 0)];
        assert_eq!(current_streak(&just_under, date("2026-08-29"), 600), 0);
    }

    #[test]
    fn streak_sums_multiple_sessions_per_day() {
        let records = vec![
            record("2026-08-29", 400, 0),
            record("2026-08-29", 250, 0),
        ];
        assert_eq!(current_streak(&records, date("2026-08-29"), 600), 1);
    }

    #[test]
    fn no_qualifying_today_means_zero_streak() {
        let records = vec![record("2026-08-28", 5000, 0)];
        assert_eq!(current_streak(&records, date("2026-08-29"), 600), 0);
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "0 min");
        assert_eq!(format_duration(59), "0 min");
        assert_eq!(format_duration(60), "1 min");
        assert_eq!(format_duration(3600), "1 hrs 0 min");
        assert_eq!(format_duration(7500), "2 hrs 5 min");
    }
}
