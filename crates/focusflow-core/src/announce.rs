//! Announcement delivery: notifications plus sequential speech.
//!
//! Speech requests go through an unbounded FIFO channel consumed by one
//! worker task. The worker awaits the engine's one-time initialization
//! first, so messages announced before the engine is ready accumulate in
//! the channel and drain in push order once it completes. Because the
//! worker awaits each `speak` to completion, utterances are strictly
//! sequential. Engine errors are logged and the worker moves on.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::messages::MessageKind;
use crate::platform::{NotificationSink, Priority, SpeechEngine};

pub struct Announcer {
    notifications: Arc<dyn NotificationSink>,
    speech: Arc<dyn SpeechEngine>,
    queue_tx: Mutex<Option<mpsc::UnboundedSender<String>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Announcer {
    /// Spawns the speech worker; must be called within a Tokio runtime.
    pub fn new(notifications: Arc<dyn NotificationSink>, speech: Arc<dyn SpeechEngine>) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(speech_worker(Arc::clone(&speech), queue_rx));
        Self {
            notifications,
            speech,
            queue_tx: Mutex::new(Some(queue_tx)),
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Post a notification and enqueue the message for speech.
    ///
    /// Distraction announcements carry the running count in the body.
    /// Infallible from the caller's perspective: post failures are logged
    /// and a closed speech queue drops the message.
    pub fn announce(&self, message: &str, kind: MessageKind, distraction_count: Option<u32>) {
        let title = match kind {
            MessageKind::Focus => "Stay Focused!",
            MessageKind::Distraction => "Distraction Alert",
        };
        let body = match (kind, distraction_count) {
            (MessageKind::Distraction, Some(count)) => {
                format!("Distraction #{count}\n\n{message}")
            }
            _ => message.to_string(),
        };
        if let Err(e) = self.notifications.post(title, &body, Priority::High) {
            warn!(error = %e, "notification post failed");
        }
        let queued = self
            .queue_tx
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|queue| queue.send(body).is_ok());
        if !queued {
            debug!("speech queue closed, dropping message");
        }
    }

    /// Abandon any queued speech and release the engine. Closes the queue,
    /// so later announcements post but are never spoken. Safe to call more
    /// than once.
    pub fn shutdown(&self) {
        self.queue_tx.lock().unwrap().take();
        if let Some(worker) = self.worker.lock().unwrap().take() {
            worker.abort();
        }
        self.speech.stop();
    }
}

async fn speech_worker(engine: Arc<dyn SpeechEngine>, mut queue: mpsc::UnboundedReceiver<String>) {
    if let Err(e) = engine.initialize().await {
        warn!(error = %e, "speech engine failed to initialize, dropping queued messages");
        return;
    }
    debug!("speech engine ready");
    while let Some(text) = queue.recv().await {
        if let Err(e) = engine.speak(&text).await {
            warn!(error = %e, "utterance failed");
        }
    }
}
