pub mod alarm;
pub mod calendar;
pub mod chat;
pub mod checklist;
pub mod coins;
pub mod config;
pub mod profile;
pub mod shop;
pub mod task;

use tempo_core::{App, Config, GeminiClient, SnapshotStore};

/// Open the persisted app state with the preferences from `config`.
pub fn open_app(config: &Config) -> Result<App, Box<dyn std::error::Error>> {
    let store = SnapshotStore::open()?;
    Ok(App::load(store, config.profile.clone(), config.alarm.kind))
}

pub fn assistant(config: &Config) -> Result<GeminiClient, Box<dyn std::error::Error>> {
    let client = GeminiClient::from_config(&config.assistant)?;
    if !client.has_api_key() {
        tracing::info!(var = %config.assistant.api_key_env, "no API key set, assistant answers offline");
    }
    Ok(client)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Block on a future using a fresh current-thread runtime.
pub fn block_on<F: std::future::Future>(fut: F) -> Result<F::Output, Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    Ok(rt.block_on(fut))
}
