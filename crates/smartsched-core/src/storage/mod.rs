mod config;

pub use config::{DefaultsConfig, EngineConfig, MAX_HORIZON_DAYS};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/smartsched[-dev]/` based on SMARTSCHED_ENV.
///
/// Set SMARTSCHED_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SMARTSCHED_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("smartsched-dev")
    } else {
        base_dir.join("smartsched")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
