//! Commands, errors and the play clock of the audio subsystem.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::library::AudioSource;
use crate::playback::Generation;

#[derive(Debug)]
pub enum AudioCmd {
    /// Open `source` paused at 0; events for it carry `generation`.
    Load {
        generation: Generation,
        source: AudioSource,
    },
    /// Drop the loaded source.
    Unload,
    Play,
    Pause,
    /// Jump to an absolute position in the loaded source.
    Seek(Duration),
    /// Output level in `[0, 1]`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no audio output device: {0}")]
    NoOutput(String),
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// Elapsed time of the loaded source: accumulated while paused, running while playing.
#[derive(Debug, Clone, Default)]
pub struct PlayClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlayClock {
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    /// Restart counting from `position`, keeping the running/paused state.
    pub fn reset_to(&mut self, position: Duration) {
        self.accumulated = position;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}
