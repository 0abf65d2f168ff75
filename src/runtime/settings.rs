use std::path::Path;

use crate::config::Settings;

/// Load and validate settings from `path`, or from the default location.
pub fn try_load_settings(path: Option<&Path>) -> Result<Settings, String> {
    let loaded = match path {
        Some(path) => Settings::load_from(Some(path)),
        None => Settings::load(),
    };
    let settings = loaded.map_err(|e| format!("failed to load config: {e}"))?;
    settings
        .validate()
        .map_err(|msg| format!("invalid config: {msg}"))?;
    Ok(settings)
}

/// Config is optional; a broken one must not keep the daemon from starting.
pub fn settings_or_defaults(loaded: Result<Settings, String>) -> Settings {
    loaded.unwrap_or_else(|e| {
        warn!("{e}, using defaults");
        Settings::default()
    })
}
