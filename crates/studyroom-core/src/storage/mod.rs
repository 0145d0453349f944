mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, LoggingConfig, PerformanceConfig, PlannerConfig, ServerConfig};
pub use database::StudyDb;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the Studyroom data directory, creating it if needed.
///
/// `STUDYROOM_DATA_DIR` overrides the location outright. Otherwise the
/// directory is `~/.config/studyroom`, or `~/.config/studyroom-dev` when
/// `STUDYROOM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STUDYROOM_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studyroom-dev")
            } else {
                base_dir.join("studyroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
