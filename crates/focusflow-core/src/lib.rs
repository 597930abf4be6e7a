//! # FocusFlow Core Library
//!
//! This library provides the core business logic for FocusFlow, a personal
//! screen-time/focus tracker. The host application (desktop shell, mobile
//! bridge) is a thin layer over this crate: it implements the OS-facing
//! capability traits and consumes the event feed.
//!
//! ## Architecture
//!
//! - **Tracking Loop**: a periodic poller that samples the foreground
//!   application, classifies it, and updates the session tracker; message
//!   generation and announcement run as detached tasks off the poll path
//! - **Session Tracker**: monotonic-clock session accounting, committed to
//!   SQLite on stop
//! - **Message Provider**: remote chat-completions call with a fixed local
//!   fallback; failures never reach the loop
//! - **Announcer**: notification posting plus a FIFO speech queue drained
//!   by a single worker
//! - **Stats**: daily/weekly summaries and the login streak, computed over
//!   the stored records
//!
//! ## Key Components
//!
//! - [`TrackingLoop`]: lifecycle orchestrator (`start`/`stop`)
//! - [`SessionTracker`] / [`SessionRecord`]: session accounting
//! - [`Database`]: SQLite-backed [`SessionStore`]
//! - [`Config`]: TOML configuration, including the classification sets
//! - [`GroqClient`]: chat-completions [`TextGenerationClient`]

pub mod announce;
pub mod classify;
pub mod error;
pub mod events;
pub mod generation;
pub mod messages;
pub mod platform;
pub mod sampler;
pub mod session;
pub mod stats;
pub mod storage;
pub mod tracking;

pub use announce::Announcer;
pub use classify::{Classification, ClassificationSets};
pub use error::{
    ConfigError, CoreError, GenerationError, Result, StoreError, TrackingError,
};
pub use events::Event;
pub use generation::{GroqClient, TextGenerationClient};
pub use messages::{MessageKind, MessageProvider};
pub use platform::{NotificationSink, PermissionGate, Priority, SpeechEngine};
pub use sampler::{ForegroundSampler, UsageEntry, UsageSource};
pub use session::{SessionRecord, SessionTracker};
pub use stats::{current_streak, day_summary, format_duration, week_summary, FocusSummary};
pub use storage::{data_dir, Config, Database, SessionStore};
pub use tracking::TrackingLoop;
