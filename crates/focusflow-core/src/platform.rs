//! Host-provided platform capabilities.
//!
//! The core never talks to OS settings, notification surfaces, or a speech
//! synthesizer directly. The host application implements these traits and
//! passes them in at construction. All of them are expected to be cheap to
//! call; the speech engine is the only one with real asynchrony.

use async_trait::async_trait;

/// Notification priority hint for the host's notification surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    High,
}

/// Usage-access permission plumbing.
pub trait PermissionGate: Send + Sync {
    fn has_usage_access(&self) -> bool;

    /// Open the system settings surface where the user can grant usage
    /// access. Fire-and-forget.
    fn request_usage_access(&self);
}

/// A user-visible notification surface. No acknowledgement is returned;
/// post failures are logged and swallowed by the caller.
pub trait NotificationSink: Send + Sync {
    fn post(
        &self,
        title: &str,
        body: &str,
        priority: Priority,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// A sequential text-to-speech engine.
///
/// The announcer drives this from a single worker task, so implementations
/// never see concurrent `speak` calls.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// One-time engine initialization. Awaited by the announcer worker
    /// before any utterance; messages announced earlier stay queued.
    async fn initialize(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Speak one utterance. Resolves when the utterance has finished.
    async fn speak(&self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Cut off any in-progress utterance and release the engine.
    fn stop(&self);
}
