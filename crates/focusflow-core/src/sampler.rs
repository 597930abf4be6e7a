//! Foreground-application sampling.
//!
//! The OS boundary is the [`UsageSource`] trait, injected by the host. The
//! sampler itself owns the selection logic: read a short trailing window of
//! usage entries and pick the one most recently used. A missing permission
//! or an empty window is an empty result, never an error.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

/// One usage entry reported by the OS.
#[derive(Debug, Clone)]
pub struct UsageEntry {
    pub app_id: String,
    /// Epoch milliseconds of the entry's last-used timestamp.
    pub last_used_ms: i64,
}

/// OS usage-stats boundary, injected by the host application.
///
/// Implementations must complete well within the polling period.
pub trait UsageSource: Send + Sync {
    /// Whether the process holds the usage-access permission.
    fn has_access(&self) -> bool;

    /// Usage entries whose last-used timestamp falls within
    /// `[begin_ms, end_ms]` (epoch milliseconds).
    fn events_between(
        &self,
        begin_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<UsageEntry>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Picks the foregrounded application from a trailing usage window.
pub struct ForegroundSampler {
    source: Arc<dyn UsageSource>,
    window: Duration,
}

impl ForegroundSampler {
    pub fn new(source: Arc<dyn UsageSource>, window: Duration) -> Self {
        Self { source, window }
    }

    /// The identifier with the most recent strictly-positive last-used
    /// timestamp in the trailing window, or `None` when no eligible entry
    /// exists or the permission is missing.
    pub fn sample(&self) -> Option<String> {
        if !self.source.has_access() {
            debug!("usage access not granted, skipping sample");
            return None;
        }
        let end_ms = Utc::now().timestamp_millis();
        let begin_ms = end_ms - self.window.as_millis() as i64;
        let entries = match self.source.events_between(begin_ms, end_ms) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "usage query failed");
                return None;
            }
        };
        entries
            .into_iter()
            .filter(|e| e.last_used_ms > 0)
            .max_by_key(|e| e.last_used_ms)
            .map(|e| e.app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        access: bool,
        entries: Vec<UsageEntry>,
    }

    impl UsageSource for FakeSource {
        fn has_access(&self) -> bool {
            self.access
        }

        fn events_between(
            &self,
            _begin_ms: i64,
            _end_ms: i64,
        ) -> Result<Vec<UsageEntry>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.entries.clone())
        }
    }

    fn sampler(access: bool, entries: Vec<UsageEntry>) -> ForegroundSampler {
        ForegroundSampler::new(
            Arc::new(FakeSource { access, entries }),
            Duration::from_secs(10),
        )
    }

    #[test]
    fn picks_most_recently_used() {
        let s = sampler(
            true,
            vec![
                UsageEntry {
                    app_id: "com.older".into(),
                    last_used_ms: 1_000,
                },
                UsageEntry {
                    app_id: "com.newer".into(),
                    last_used_ms: 2_000,
                },
            ],
        );
        assert_eq!(s.sample().as_deref(), Some("com.newer"));
    }

    #[test]
    fn ignores_entries_without_positive_timestamp() {
        let s = sampler(
            true,
            vec![
                UsageEntry {
                    app_id: "com.zero".into(),
                    last_used_ms: 0,
                },
                UsageEntry {
                    app_id: "com.negative".into(),
                    last_used_ms: -5,
                },
            ],
        );
        assert_eq!(s.sample(), None);
    }

    #[test]
    fn empty_window_yields_none() {
        assert_eq!(sampler(true, vec![]).sample(), None);
    }

    #[test]
    fn missing_permission_yields_none() {
        let s = sampler(
            false,
            vec![UsageEntry {
                app_id: "com.any".into(),
                last_used_ms: 1,
            }],
        );
        assert_eq!(s.sample(), None);
    }

    #[test]
    fn source_failure_yields_none() {
        struct Failing;
        impl UsageSource for Failing {
            fn has_access(&self) -> bool {
                true
            }
            fn events_between(
                &self,
                _begin_ms: i64,
                _end_ms: i64,
            ) -> Result<Vec<UsageEntry>, Box<dyn std::error::Error + Send + Sync>> {
                Err("usage stats unavailable".into())
            }
        }
        let s = ForegroundSampler::new(Arc::new(Failing), Duration::from_secs(10));
        assert_eq!(s.sample(), None);
    }
}
