mod config;
pub mod database;
pub mod migrations;
pub mod store;

pub use config::{ClassifierConfig, Config, PointsConfig, ProfileConfig, StreakConfig};
pub use database::Database;
pub use store::TaskStore;

use std::path::PathBuf;

/// Returns `~/.config/taskloop[-dev]/` based on TASKLOOP_ENV.
///
/// Set TASKLOOP_ENV=dev to use the development data directory, or
/// TASKLOOP_DATA_DIR to force an explicit directory (the e2e tests do).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = if let Ok(explicit) = std::env::var("TASKLOOP_DATA_DIR") {
        PathBuf::from(explicit)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("TASKLOOP_ENV").unwrap_or_else(|_| "production".to_string());

        if env == "dev" {
            base_dir.join("taskloop-dev")
        } else {
            base_dir.join("taskloop")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
