use crate::config;

/// Load settings, falling back to defaults. Config is optional and must
/// never prevent the app from starting.
///
/// Runs before the logger exists, so problems are returned for logging later.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}
