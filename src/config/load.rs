use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `ENCORE__`) override it, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ENCORE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.audio.tick_ms == 0 {
            return Err("audio.tick_ms must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err("playback.volume must be within 0.0..=1.0".to_string());
        }
        if self.controls.volume_step <= 0.0 {
            return Err("controls.volume_step must be > 0".to_string());
        }
        Ok(())
    }

    /// Directory used for the track snapshot and the log file.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.storage.data_dir.clone().or_else(default_data_dir)
    }

    /// Log file path, defaulting to `<data_dir>/encore.log`.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging
            .file
            .clone()
            .or_else(|| self.data_dir().map(|d| d.join("encore.log")))
    }
}

/// Resolve the config path from `ENCORE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ENCORE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/encore/config.toml`
/// or `~/.config/encore/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("encore").join("config.toml"))
}

/// Compute the default data directory `$XDG_DATA_HOME/encore`
/// or `~/.local/share/encore`.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("encore"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
