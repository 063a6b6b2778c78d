mod config;
pub mod database;
pub mod snapshot;

pub use config::{AlarmConfig, AssistantConfig, Config, ProfileConfig};
pub use database::Database;
pub use snapshot::{Snapshot, SnapshotStore, SNAPSHOT_KEY, TASKS_KEY};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/tempo[-dev]/` based on TEMPO_ENV.
///
/// Set TEMPO_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TEMPO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tempo-dev")
    } else {
        base_dir.join("tempo")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
