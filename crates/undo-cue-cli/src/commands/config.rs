use clap::Subcommand;
use undo_cue_core::{Config, SettingsStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "volume", "assistance_delay")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value; empty clears an optional key
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let store = SettingsStore::open()?;
            match store.config().get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut store = SettingsStore::open()?;
            store.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let store = SettingsStore::open()?;
            let json = serde_json::to_string_pretty(store.config())?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}
