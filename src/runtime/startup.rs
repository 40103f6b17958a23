use std::path::PathBuf;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config;
use crate::library::{FileStorage, TrackDefaults, TrackStore};
use crate::playback::PlaybackController;

pub type RuntimeApp = App<FileStorage, AudioPlayer>;

/// Wire the store, the audio thread and the controller into an `App`.
pub fn build_app(settings: &config::Settings) -> RuntimeApp {
    let data_dir = settings.data_dir().unwrap_or_else(|| {
        log::warn!("startup: no data directory found, using ./.encore");
        PathBuf::from(".encore")
    });
    log::info!("startup: library at {}", data_dir.display());

    let store = TrackStore::load(
        FileStorage::new(data_dir),
        TrackDefaults::from(&settings.library),
    );
    let audio_player = AudioPlayer::new(settings.audio.clone());
    let player = PlaybackController::new(audio_player, &settings.playback);

    let app = App::new(store, player, settings);
    log::info!(
        "startup: {} tracks, shuffle={}, {}",
        app.tracks().len(),
        app.player.shuffle(),
        app.player.repeat().label()
    );
    app
}
