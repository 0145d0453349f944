//! `studyroom config`: inspect and edit `config.toml`.

use clap::Subcommand;
use studyroom_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value
    Get {
        /// Dot-separated key (e.g. "performance.min_attempts")
        key: String,
    },
    /// Validate and store a value
    Set {
        /// Dot-separated key
        key: String,
        value: String,
    },
    /// Print the whole configuration as TOML
    List,
    /// Print the location of the configuration file
    Path,
    /// Overwrite the file with defaults
    Reset,
}

pub fn run(action: ConfigAction, mut config: Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            tracing::info!(key = %key, "configuration updated");
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => print!("{}", toml::to_string_pretty(&config)?),
        ConfigAction::Path => println!("{}", Config::file_path()?.display()),
        ConfigAction::Reset => {
            let defaults = Config::default();
            defaults.save()?;
            print!("{}", toml::to_string_pretty(&defaults)?);
        }
    }
    Ok(())
}
