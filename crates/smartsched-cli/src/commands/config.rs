use std::path::Path;

use clap::Subcommand;
use smartsched_core::EngineConfig;

use super::config_path;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "defaults.top_k", "scoring.weights")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value; sections take JSON, e.g.
        /// '{"deadline":0.4,"priority":0.2,"time_of_day":0.2,"buffer":0.1,"soonness":0.1}'
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path(config)?;
    match action {
        ConfigAction::Get { key } => {
            let config = EngineConfig::load_from(&path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = EngineConfig::load_from(&path)?;
            config.set(&key, &value)?;
            config.save_to(&path)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = EngineConfig::load_from(&path)?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = EngineConfig::default();
            config.save_to(&path)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
