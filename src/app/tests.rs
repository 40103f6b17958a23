use super::*;
use crate::config::Settings;
use crate::editor::Field;
use crate::library::{
    AudioSource, MemoryStorage, SNAPSHOT_KEY, TrackDefaults, TrackFields, TrackStore,
};
use crate::lyrics::{LyricsPanel, NO_ENGLISH, NO_PORTUGUESE};
use crate::playback::fake::{Call, FakeMedia};
use crate::playback::{MediaEvent, PlaybackController, PlaybackState};
use std::path::PathBuf;
use std::time::Duration;

type TestApp = App<MemoryStorage, FakeMedia>;

fn app_with(store: TrackStore<MemoryStorage>) -> (TestApp, FakeMedia) {
    let settings = Settings::default();
    let media = FakeMedia::default();
    let player = PlaybackController::new(media.clone(), &settings.playback);
    (App::new(store, player, &settings), media)
}

fn seeded_app() -> (TestApp, FakeMedia) {
    app_with(TrackStore::load(MemoryStorage::new(), TrackDefaults::default()))
}

fn empty_app() -> (TestApp, FakeMedia) {
    app_with(TrackStore::load(
        MemoryStorage::with_entry(SNAPSHOT_KEY, "[]"),
        TrackDefaults::default(),
    ))
}

fn playable(title: &str) -> TrackFields {
    TrackFields {
        title: title.into(),
        artist: "Artist".into(),
        audio: Some(AudioSource::Location(PathBuf::from(format!("/m/{title}.mp3")))),
        ..TrackFields::default()
    }
}

#[test]
fn empty_library_disables_transport() {
    let (mut app, _media) = empty_app();
    assert!(app.is_empty());
    app.toggle_play();
    assert!(app.status.as_deref().unwrap().contains("empty"));
    assert_eq!(app.lyrics(), LyricsPanel::Collapsed);
}

#[test]
fn seeded_tracks_without_audio_report_instead_of_playing() {
    let (mut app, media) = seeded_app();
    assert_eq!(app.player.state(), PlaybackState::Idle);
    app.toggle_play();
    assert!(app.status.as_deref().unwrap().contains("no audio file"));
    assert!(!media.calls().contains(&Call::Play));
}

#[test]
fn lyrics_follow_the_current_track() {
    let (mut app, _media) = seeded_app();
    assert_eq!(app.lyrics(), LyricsPanel::Collapsed);

    app.toggle_lyrics();
    let LyricsPanel::Expanded { english, portuguese } = app.lyrics() else {
        panic!("lyrics should be expanded");
    };
    assert!(english.starts_with("Sample English lyrics"));
    assert_ne!(portuguese, NO_PORTUGUESE);
}

#[test]
fn lyrics_placeholders_for_track_without_text() {
    let (mut app, _media) = empty_app();
    app.store.add(playable("Bare")).unwrap();
    app.apply_library_change();
    app.toggle_lyrics();
    assert_eq!(
        app.lyrics(),
        LyricsPanel::Expanded {
            english: NO_ENGLISH,
            portuguese: NO_PORTUGUESE,
        }
    );
}

#[test]
fn adding_first_track_leaves_empty_state() {
    let (mut app, media) = empty_app();
    app.open_add();
    {
        let draft = app.editor.draft_mut().unwrap();
        for c in "Song".chars() {
            draft.insert_char(c);
        }
        draft.focus_next();
        for c in "Band".chars() {
            draft.insert_char(c);
        }
    }
    // Without audio the draft stays open and nothing is created.
    app.commit_draft();
    assert!(app.editor.is_open());
    assert!(app.is_empty());

    app.cancel_draft();
    app.store.add(playable("Song")).unwrap();
    app.apply_library_change();
    assert_eq!(app.player.state(), PlaybackState::Idle);
    assert!(media.calls().contains(&Call::Bind(PathBuf::from("/m/Song.mp3"))));
}

#[test]
fn deleting_playing_track_keeps_valid_index() {
    let (mut app, media) = empty_app();
    for t in ["A", "B", "C"] {
        app.store.add(playable(t)).unwrap();
    }
    app.apply_library_change();

    app.selected = 2;
    app.choose_selected();
    app.toggle_play();
    media.emit(MediaEvent::Started);
    app.tick();
    assert!(app.player.is_playing());

    app.delete_selected();
    assert_eq!(app.tracks().len(), 2);
    assert_eq!(app.player.current_index(), 1);
    assert_eq!(app.selected, 1);
    assert_eq!(app.current_track().unwrap().title, "B");

    app.delete_selected();
    app.delete_selected();
    assert!(app.is_empty());
    assert!(app.current_track().is_none());
}

#[test]
fn editing_selected_track_saves_in_place() {
    let (mut app, _media) = seeded_app();
    app.open_library();
    app.select_next();
    app.edit_selected();
    {
        let draft = app.editor.draft_mut().unwrap();
        while draft.focus() != Field::Album {
            draft.focus_next();
        }
        draft.insert_char('!');
    }
    app.commit_draft();

    assert!(!app.editor.is_open());
    assert_eq!(app.tracks()[1].album, "Wilderness!");
    assert_eq!(app.selected, 1);
    assert_eq!(app.status.as_deref(), Some("Saved track 2"));
}

#[test]
fn progress_click_seeks_proportionally() {
    let (mut app, media) = empty_app();
    app.store.add(playable("Long")).unwrap();
    app.apply_library_change();
    media.emit(MediaEvent::MetadataLoaded {
        duration: Duration::from_secs(240),
    });
    app.tick();

    app.seek_click(30, 60);
    assert_eq!(app.player.position(), Duration::from_secs(120));
}

#[test]
fn asynchronous_play_failure_reaches_status_line() {
    let (mut app, media) = empty_app();
    app.store.add(playable("Broken")).unwrap();
    app.apply_library_change();

    app.toggle_play();
    media.emit(MediaEvent::Failed("cannot decode".into()));
    app.tick();

    assert_eq!(app.player.state(), PlaybackState::Idle);
    assert_eq!(app.status.as_deref(), Some("Playback failed: cannot decode"));
}

#[test]
fn volume_keys_use_configured_step() {
    let (mut app, _media) = seeded_app();
    let before = app.player.volume().level();
    app.volume_up();
    assert!((app.player.volume().level() - (before + 0.05)).abs() < 1e-6);
    app.volume_down();
    app.volume_down();
    assert!((app.player.volume().level() - (before - 0.05)).abs() < 1e-6);
}

#[test]
fn closing_library_discards_draft() {
    let (mut app, _media) = seeded_app();
    app.open_add();
    assert!(app.library_open);
    app.close_library();
    assert!(!app.library_open);
    assert!(!app.editor.is_open());
}

#[test]
fn like_flag_is_player_wide_and_survives_skipping() {
    let (mut app, _media) = empty_app();
    for t in ["A", "B"] {
        app.store.add(playable(t)).unwrap();
    }
    app.apply_library_change();
    assert!(!app.liked);

    app.toggle_like();
    app.next_track();
    assert_eq!(app.current_track().unwrap().title, "B");
    assert!(app.liked);
}

#[test]
fn skipping_from_the_player_leaves_playback_stopped() {
    let (mut app, media) = empty_app();
    for t in ["A", "B"] {
        app.store.add(playable(t)).unwrap();
    }
    app.apply_library_change();
    app.toggle_play();
    media.emit(MediaEvent::Started);
    app.tick();
    assert!(app.player.is_playing());

    app.next_track();
    app.tick();
    assert_eq!(app.player.state(), PlaybackState::Idle);
    assert!(!app.player.is_pending());
}
