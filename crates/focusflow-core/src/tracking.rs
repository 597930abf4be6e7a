//! The tracking loop.
//!
//! A periodic poll cycle samples the foreground application, classifies
//! it, updates the session tracker, and dispatches announcements. The
//! cycle itself is strictly sequential: classification and the tracker
//! update for tick *n* complete before tick *n+1* fires, so distraction
//! counts are never raced. The provide+announce step runs as a detached
//! task that only carries a snapshot of the count and never mutates
//! tracker state; it is bounded by the generation client's timeout.
//!
//! ## Lifecycle
//!
//! ```text
//! Stopped -> start() -> Running -> stop() -> Stopped
//! ```
//!
//! `start` asks the permission gate for usage access first; on denial it
//! requests the permission once and returns without entering the cycle.
//! `stop` cancels the periodic tasks deterministically (no tick fires
//! after it returns), commits the session, and is a safe no-op when
//! already stopped. `start` and `stop` serialize on one lifecycle lock,
//! held for the whole stop sequence, so a concurrent `start` cannot reset
//! the tracker between task teardown and the commit. `shutdown` is
//! terminal: later `start` calls are refused.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::announce::Announcer;
use crate::classify::{Classification, ClassificationSets};
use crate::error::{CoreError, TrackingError};
use crate::events::Event;
use crate::generation::TextGenerationClient;
use crate::messages::{MessageKind, MessageProvider};
use crate::platform::{NotificationSink, PermissionGate, SpeechEngine};
use crate::sampler::{ForegroundSampler, UsageSource};
use crate::session::{SessionRecord, SessionTracker};
use crate::storage::{Config, SessionStore};

const EVENT_CHANNEL_CAPACITY: usize = 64;
const ELAPSED_TICK: Duration = Duration::from_secs(1);

/// State shared between the loop tasks and the detached announce tasks.
struct Shared {
    sampler: ForegroundSampler,
    sets: ClassificationSets,
    provider: MessageProvider,
    announcer: Announcer,
    tracker: Mutex<SessionTracker>,
    events: broadcast::Sender<Event>,
}

impl Shared {
    fn emit(&self, event: Event) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

struct Running {
    shutdown: watch::Sender<bool>,
    poll: JoinHandle<()>,
    ticker: JoinHandle<()>,
}

/// The long-lived tracking orchestrator.
///
/// Constructed once per process with all collaborators injected; `start`
/// and `stop` are its only lifecycle entry points.
pub struct TrackingLoop {
    shared: Arc<Shared>,
    store: Arc<dyn SessionStore>,
    permissions: Arc<dyn PermissionGate>,
    poll_interval: Duration,
    // Lifecycle lock: held across the whole of start and stop.
    running: AsyncMutex<Option<Running>>,
    closed: AtomicBool,
}

impl TrackingLoop {
    /// Wire up the loop from configuration and injected capabilities.
    ///
    /// Must be called within a Tokio runtime (the announcer spawns its
    /// speech worker immediately).
    ///
    /// # Errors
    /// Returns an error if the configured classification sets overlap.
    pub fn new(
        config: &Config,
        usage: Arc<dyn UsageSource>,
        permissions: Arc<dyn PermissionGate>,
        notifications: Arc<dyn NotificationSink>,
        speech: Arc<dyn SpeechEngine>,
        generation: Arc<dyn TextGenerationClient>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, CoreError> {
        let sets = config.classification_sets()?;
        let sampler = ForegroundSampler::new(
            usage,
            Duration::from_secs(config.tracking.sample_window_secs),
        );
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let shared = Arc::new(Shared {
            sampler,
            sets,
            provider: MessageProvider::new(generation),
            announcer: Announcer::new(notifications, speech),
            tracker: Mutex::new(SessionTracker::new()),
            events,
        });
        Ok(Self {
            shared,
            store,
            permissions,
            poll_interval: Duration::from_secs(config.tracking.poll_interval_secs),
            running: AsyncMutex::new(None),
            closed: AtomicBool::new(false),
        })
    }

    /// Subscribe to loop events. Slow subscribers may observe lag; events
    /// are display signals, not state.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        match self.running.try_lock() {
            Ok(guard) => guard.is_some(),
            // A start or stop is mid-transition.
            Err(_) => true,
        }
    }

    /// Start polling. No-op if already running.
    ///
    /// # Errors
    /// Returns [`TrackingError::PermissionDenied`] when the permission
    /// gate reports no usage access; in that case the system settings
    /// prompt has been requested and the loop stays stopped. Returns
    /// [`TrackingError::ShutDown`] after [`TrackingLoop::shutdown`].
    pub async fn start(&self) -> Result<(), TrackingError> {
        if self.closed.load(Ordering::SeqCst) {
            debug!("tracking loop has been shut down");
            return Err(TrackingError::ShutDown);
        }
        let mut running = self.running.lock().await;
        if running.is_some() {
            debug!("tracking loop already running");
            return Ok(());
        }

        if !self.permissions.has_usage_access() {
            warn!("usage access missing, tracking loop will not start");
            self.permissions.request_usage_access();
            self.shared.emit(Event::PermissionRequired { at: Utc::now() });
            return Err(TrackingError::PermissionDenied);
        }

        self.shared.tracker.lock().unwrap().start();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poll = tokio::spawn(poll_loop(
            Arc::clone(&self.shared),
            self.poll_interval,
            shutdown_rx.clone(),
        ));
        let ticker = tokio::spawn(elapsed_ticker(Arc::clone(&self.shared), shutdown_rx));
        *running = Some(Running {
            shutdown: shutdown_tx,
            poll,
            ticker,
        });

        info!(interval_secs = self.poll_interval.as_secs(), "tracking started");
        self.shared.emit(Event::TrackingStarted { at: Utc::now() });
        Ok(())
    }

    /// Stop polling and commit the active session.
    ///
    /// After this returns no further tick fires. In-flight announce tasks
    /// are not awaited; they only hold display snapshots. A stop while
    /// already stopped returns `Ok(None)`.
    ///
    /// A store append failure is surfaced as a warning (and a
    /// [`Event::SessionCommitFailed`] event); the record is still returned
    /// and is not retried.
    pub async fn stop(&self) -> Result<Option<SessionRecord>, CoreError> {
        let mut running = self.running.lock().await;
        let Some(active) = running.take() else {
            debug!("tracking loop already stopped");
            return Ok(None);
        };

        let _ = active.shutdown.send(true);
        if let Err(e) = active.poll.await {
            warn!(error = %e, "poll task ended abnormally");
        }
        if let Err(e) = active.ticker.await {
            warn!(error = %e, "elapsed ticker ended abnormally");
        }

        let record = self.shared.tracker.lock().unwrap().stop();
        info!(?record, "tracking stopped");
        self.shared.emit(Event::TrackingStopped {
            record: record.clone(),
            at: Utc::now(),
        });

        if let Some(ref record) = record {
            match self.store.append(record) {
                Ok(()) => self.shared.emit(Event::SessionCommitted {
                    record: record.clone(),
                    at: Utc::now(),
                }),
                Err(e) => {
                    warn!(error = %e, "failed to persist session record");
                    self.shared.emit(Event::SessionCommitFailed {
                        message: e.to_string(),
                        at: Utc::now(),
                    });
                }
            }
        }
        Ok(record)
    }

    /// Process-teardown path: implicit stop plus announcer release. The
    /// loop is closed for good; subsequent `start` calls are refused.
    pub async fn shutdown(&self) -> Result<Option<SessionRecord>, CoreError> {
        self.closed.store(true, Ordering::SeqCst);
        let record = self.stop().await?;
        self.shared.announcer.shutdown();
        Ok(record)
    }
}

async fn poll_loop(shared: Arc<Shared>, interval: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                debug!("tracking loop shutting down");
                break;
            }
            _ = ticker.tick() => {}
        }
        run_cycle(&shared);
    }
}

/// One tick: sample, classify, update the tracker, dispatch announcements.
/// Synchronous apart from the detached announce task.
fn run_cycle(shared: &Arc<Shared>) {
    let Some(app_id) = shared.sampler.sample() else {
        return;
    };
    match shared.sets.classify(&app_id) {
        Classification::Distraction => {
            let Some(count) = shared.tracker.lock().unwrap().record_distraction() else {
                return;
            };
            debug!(app_id = %app_id, count, "distraction detected");
            shared.emit(Event::DistractionDetected {
                app_id,
                count,
                at: Utc::now(),
            });
            dispatch_announcement(shared, MessageKind::Distraction, Some(count));
        }
        Classification::Focus => {
            debug!(app_id = %app_id, "focus app detected");
            shared.emit(Event::FocusDetected {
                app_id,
                at: Utc::now(),
            });
            dispatch_announcement(shared, MessageKind::Focus, None);
        }
        Classification::Neutral => {}
    }
}

/// Detached provide+announce task. Reads only the snapshot count; never
/// touches the tracker.
fn dispatch_announcement(shared: &Arc<Shared>, kind: MessageKind, count: Option<u32>) {
    let shared = Arc::clone(shared);
    tokio::spawn(async move {
        let message = shared.provider.provide(kind).await;
        shared.announcer.announce(&message, kind, count);
    });
}

async fn elapsed_ticker(shared: Arc<Shared>, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(ELAPSED_TICK);
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }
        let elapsed = shared.tracker.lock().unwrap().elapsed();
        if let Some(elapsed) = elapsed {
            shared.emit(Event::ElapsedTick {
                elapsed_secs: elapsed.as_secs(),
                at: Utc::now(),
            });
        }
    }
}
