use clap::Subcommand;
use tempo_core::Config;

use super::open_app;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "profile.language", "alarm.kind")
        key: String,
    },
    /// Set a config value. Profile and language changes also update the
    /// calendar, like `tempo profile`
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values with the accepted choices
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print where the config file lives
    Path,
    /// Reset config to defaults. Coins, tasks and the calendar are kept
    Reset {
        /// Keep the profile, language and voice
        #[arg(long)]
        keep_profile: bool,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key} (see `tempo config list`)");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            if let Err(e) = config.set_value(&key, &value) {
                return Err(match Config::choices(&key) {
                    Some(choices) => format!("{e} (expected one of: {})", choices.join(", ")).into(),
                    None => e.into(),
                });
            }
            apply_to_state(&config, &key)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }
            for (key, value) in config.entries() {
                match Config::choices(&key) {
                    Some(choices) => println!("{key} = {value}  [{}]", choices.join("|")),
                    None if key == "assistant.api_key_env" => {
                        let state = if std::env::var_os(&value).is_some() { "set" } else { "not set" };
                        println!("{key} = {value}  ({state})");
                    }
                    None => println!("{key} = {value}"),
                }
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Reset { keep_profile } => {
            let mut config = Config::default();
            if keep_profile {
                config.profile = Config::load_or_default().profile;
            }
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// Mirror profile and language changes into the stored state: a new
/// profile seeds an empty calendar and a new language relabels routines.
fn apply_to_state(config: &Config, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    match key {
        "profile.profile" => {
            let profile = config.profile.profile;
            if open_app(config)?.select_profile(profile)? {
                println!("calendar filled with the {profile} routines");
            }
        }
        "profile.language" => {
            open_app(config)?.set_language(config.profile.language)?;
        }
        _ => {}
    }
    Ok(())
}
