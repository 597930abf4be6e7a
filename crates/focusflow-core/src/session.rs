//! Session accounting.
//!
//! The tracker is the single owner of "is a focus session active". It is
//! deliberately synchronous and lock-free internally; the tracking loop
//! wraps it in a mutex and is the only writer (the detached announce tasks
//! only ever see a snapshot of the count). Durations come from a monotonic
//! clock, so wall-clock adjustments cannot produce negative or skewed
//! session lengths.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completed focus session. Immutable once committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Wall-clock length of the session in seconds.
    pub duration_secs: u64,
    /// The logical day the session is attributed to (day of commit).
    pub date: NaiveDate,
    /// Number of distraction detections during the session.
    pub distractions: u32,
}

#[derive(Debug)]
struct ActiveSession {
    started_at: Instant,
    distractions: u32,
}

/// Accumulates elapsed time and distraction count between start and stop.
#[derive(Debug, Default)]
pub struct SessionTracker {
    active: Option<ActiveSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Begin a session. Calling while active restarts it: the clock and
    /// the distraction count both reset.
    pub fn start(&mut self) {
        self.active = Some(ActiveSession {
            started_at: Instant::now(),
            distractions: 0,
        });
    }

    /// Count one distraction detection and return the running total.
    ///
    /// Distractions observed while idle are dropped: the tracking loop
    /// opens a session for its whole running lifetime, so an idle tracker
    /// means nothing is being attributed anywhere.
    pub fn record_distraction(&mut self) -> Option<u32> {
        match &mut self.active {
            Some(session) => {
                session.distractions += 1;
                Some(session.distractions)
            }
            None => {
                debug!("distraction observed outside an active session, dropping");
                None
            }
        }
    }

    /// Elapsed time of the active session, if any. Best-effort display
    /// value; the committed duration is computed once, at stop.
    pub fn elapsed(&self) -> Option<Duration> {
        self.active.as_ref().map(|s| s.started_at.elapsed())
    }

    /// End the session and produce its record. Idle stop is a safe no-op.
    pub fn stop(&mut self) -> Option<SessionRecord> {
        self.active.take().map(|session| SessionRecord {
            duration_secs: session.started_at.elapsed().as_secs(),
            date: Local::now().date_naive(),
            distractions: session.distractions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_stop_yields_zero_distractions() {
        let mut tracker = SessionTracker::new();
        tracker.start();
        let record = tracker.stop().unwrap();
        assert_eq!(record.distractions, 0);
        // duration_secs is u64, so non-negative by construction; just make
        // sure an immediate stop rounds down to zero.
        assert_eq!(record.duration_secs, 0);
        assert!(!tracker.is_active());
    }

    #[test]
    fn distractions_accumulate_and_reset_on_commit() {
        let mut tracker = SessionTracker::new();
        tracker.start();
        for expected in 1..=5 {
            assert_eq!(tracker.record_distraction(), Some(expected));
        }
        let record = tracker.stop().unwrap();
        assert_eq!(record.distractions, 5);

        tracker.start();
        assert_eq!(tracker.record_distraction(), Some(1));
    }

    #[test]
    fn idle_stop_is_a_noop() {
        let mut tracker = SessionTracker::new();
        assert!(tracker.stop().is_none());
        assert!(tracker.stop().is_none());
    }

    #[test]
    fn idle_distractions_are_dropped() {
        let mut tracker = SessionTracker::new();
        assert_eq!(tracker.record_distraction(), None);
        tracker.start();
        assert_eq!(tracker.record_distraction(), Some(1));
    }

    #[test]
    fn restart_resets_the_count() {
        let mut tracker = SessionTracker::new();
        tracker.start();
        tracker.record_distraction();
        tracker.record_distraction();
        tracker.start();
        let record = tracker.stop().unwrap();
        assert_eq!(record.distractions, 0);
    }

    #[test]
    fn elapsed_is_none_while_idle() {
        let tracker = SessionTracker::new();
        assert!(tracker.elapsed().is_none());
    }
}
