pub mod config;
pub mod suggest;

use std::path::{Path, PathBuf};

use smartsched_core::{CoreError, EngineConfig};

/// The config file to use: `--config` if given, else the default location.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf, CoreError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => EngineConfig::path(),
    }
}
