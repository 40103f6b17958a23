use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How often the audio thread reports the playback position (milliseconds).
    pub tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Whether the lyrics panel starts expanded.
    pub show_lyrics: bool,

    /// Which time fields to show under the progress bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub time_fields: Vec<TimeField>,

    /// Separator used to join `time_fields`.
    pub time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ encore ~ ".to_string(),
            show_lyrics: false,
            time_fields: vec![TimeField::Elapsed, TimeField::Total],
            time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change applied by `+` / `-`.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Initial repeat mode.
    pub repeat_mode: RepeatModeSetting,
    /// Initial volume in `[0, 1]`.
    pub volume: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat_mode: RepeatModeSetting::Off,
            volume: 0.7,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatModeSetting {
    #[serde(alias = "no_repeat", alias = "no-repeat", alias = "none")]
    Off,
    #[serde(alias = "repeat-all", alias = "repeat_all", alias = "loop-all")]
    All,
    #[serde(alias = "repeat-one", alias = "repeat_one", alias = "loop-one")]
    One,
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Cover reference given to tracks submitted without one.
    pub default_cover: String,
    /// Album name given to tracks submitted without one.
    pub unknown_album: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            default_cover: "covers/default.jpg".to_string(),
            unknown_album: "Unknown Album".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding `tracks.json` and the log file.
    /// Defaults to `$XDG_DATA_HOME/encore` or `~/.local/share/encore`.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default log filter, overridden by `RUST_LOG`.
    pub level: String,
    /// Log file path. Defaults to `<data_dir>/encore.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
