mod config;
pub mod database;

pub use config::{
    ClassificationConfig, Config, GenerationConfig, StatsConfig, TrackingConfig,
};
pub use database::Database;

use std::path::PathBuf;

use crate::error::StoreError;
use crate::session::SessionRecord;

/// Durable append/query/clear operations on session records.
///
/// The core writes exactly one record per committed session and reads the
/// full sequence back for stats; no other query shapes are needed.
pub trait SessionStore: Send + Sync {
    fn append(&self, record: &SessionRecord) -> Result<(), StoreError>;

    /// All records, newest date first.
    fn query_all(&self) -> Result<Vec<SessionRecord>, StoreError>;

    fn clear_all(&self) -> Result<(), StoreError>;
}

/// Returns `~/.config/focusflow[-dev]/` based on FOCUSFLOW_ENV.
///
/// Set FOCUSFLOW_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusflow-dev")
    } else {
        base_dir.join("focusflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
