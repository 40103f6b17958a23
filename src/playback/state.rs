use crate::config::RepeatModeSetting;

/// Transport state of the playback controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// The library has no tracks; transport intents are rejected.
    #[default]
    Empty,
    /// A track is selected but not playing.
    Idle,
    Playing,
    /// The media reported end of stream and the next step is being decided.
    Ended,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RepeatMode {
    /// Stop after the last track.
    #[default]
    Off,
    /// Wrap around to the first track after the last.
    All,
    /// Restart the current track when it ends.
    One,
}

impl RepeatMode {
    /// `Off -> All -> One -> Off`.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "Repeat: Off",
            RepeatMode::All => "Repeat: All",
            RepeatMode::One => "Repeat: One",
        }
    }
}

impl From<RepeatModeSetting> for RepeatMode {
    fn from(s: RepeatModeSetting) -> Self {
        match s {
            RepeatModeSetting::Off => RepeatMode::Off,
            RepeatModeSetting::All => RepeatMode::All,
            RepeatModeSetting::One => RepeatMode::One,
        }
    }
}
