//! Application model: `App` owns the track store, the playback controller,
//! the library editor and the overlay flags.
//!
//! Every user intent goes through a method here so the store and the
//! controller never drift apart: each store mutation is followed by
//! `PlaybackController::sync_with_library`.

use std::fmt::Display;

use crate::config::Settings;
use crate::editor::{DraftTarget, EditorError, LibraryEditor};
use crate::library::{KeyValueStorage, StoreError, Track, TrackStore};
use crate::lyrics::{LyricsPanel, lyrics_panel};
use crate::playback::{MediaHandle, PlaybackController, PlaybackState};

/// The main application model.
pub struct App<S: KeyValueStorage, M: MediaHandle> {
    pub store: TrackStore<S>,
    pub player: PlaybackController<M>,
    pub editor: LibraryEditor,

    pub lyrics_visible: bool,
    /// Favourite marker shown next to the title; not persisted.
    pub liked: bool,
    /// Library modal shown.
    pub library_open: bool,
    /// Cursor in the library list.
    pub selected: usize,
    /// One-line message for the status bar, replaced by the next one.
    pub status: Option<String>,

    scrub_seconds: i64,
    volume_step: f32,
}

impl<S: KeyValueStorage, M: MediaHandle> App<S, M> {
    pub fn new(store: TrackStore<S>, player: PlaybackController<M>, settings: &Settings) -> Self {
        let mut app = Self {
            store,
            player,
            editor: LibraryEditor::new(),
            lyrics_visible: settings.ui.show_lyrics,
            liked: false,
            library_open: false,
            selected: 0,
            status: None,
            scrub_seconds: i64::try_from(settings.controls.scrub_seconds).unwrap_or(i64::MAX),
            volume_step: settings.controls.volume_step,
        };
        app.player.sync_with_library(app.store.tracks());
        app
    }

    pub fn tracks(&self) -> &[Track] {
        self.store.tracks()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.player.current_track(self.store.tracks())
    }

    pub fn is_empty(&self) -> bool {
        self.player.state() == PlaybackState::Empty
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    fn report(&mut self, context: &str, err: impl Display) {
        log::warn!("{context}: {err}");
        self.set_status(format!("{context}: {err}"));
    }

    /// Drain media notifications; surface any asynchronous playback failure.
    pub fn tick(&mut self) {
        self.player.poll_media(self.store.tracks());
        if let Some(err) = self.player.take_error() {
            self.set_status(format!("Playback failed: {err}"));
        }
    }

    // Transport

    pub fn toggle_play(&mut self) {
        if let Err(e) = self.player.toggle_play(self.store.tracks()) {
            self.report("Cannot play", e);
        }
    }

    pub fn next_track(&mut self) {
        if let Err(e) = self.player.next_track(self.store.tracks()) {
            self.report("Cannot skip", e);
        }
    }

    pub fn prev_track(&mut self) {
        if let Err(e) = self.player.prev_track(self.store.tracks()) {
            self.report("Cannot skip", e);
        }
    }

    pub fn scrub_forward(&mut self) {
        self.player.seek_by(self.scrub_seconds);
    }

    pub fn scrub_backward(&mut self) {
        self.player.seek_by(-self.scrub_seconds);
    }

    /// Seek to a click on the progress bar at `offset` of `width` cells.
    pub fn seek_click(&mut self, offset: u16, width: u16) {
        if width == 0 {
            return;
        }
        self.player
            .seek_to_ratio(f64::from(offset) / f64::from(width));
    }

    pub fn volume_up(&mut self) {
        self.player.adjust_volume(self.volume_step);
    }

    pub fn volume_down(&mut self) {
        self.player.adjust_volume(-self.volume_step);
    }

    pub fn toggle_mute(&mut self) {
        self.player.toggle_mute();
    }

    pub fn toggle_shuffle(&mut self) {
        self.player.toggle_shuffle();
    }

    pub fn cycle_repeat(&mut self) {
        self.player.cycle_repeat();
    }

    pub fn toggle_like(&mut self) {
        self.liked = !self.liked;
    }

    // Lyrics

    pub fn toggle_lyrics(&mut self) {
        self.lyrics_visible = !self.lyrics_visible;
    }

    pub fn lyrics(&self) -> LyricsPanel<'_> {
        let track = self.current_track();
        lyrics_panel(
            track.and_then(|t| t.lyrics_en.as_deref()),
            track.and_then(|t| t.lyrics_pt.as_deref()),
            self.lyrics_visible,
        )
    }

    // Library modal

    /// Open the library list with the cursor on the current track.
    pub fn open_library(&mut self) {
        self.library_open = true;
        if !self.is_empty() {
            self.selected = self.player.current_index();
        }
    }

    /// Close the modal, discarding any open draft.
    pub fn close_library(&mut self) {
        self.editor.cancel();
        self.library_open = false;
    }

    pub fn select_next(&mut self) {
        let len = self.store.len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.store.tracks().get(self.selected)
    }

    /// Make the highlighted row the current track.
    pub fn choose_selected(&mut self) {
        if let Err(e) = self.player.select(self.selected, self.store.tracks()) {
            self.report("Cannot select", e);
        }
    }

    pub fn open_add(&mut self) {
        self.library_open = true;
        self.editor.open_add();
    }

    pub fn edit_selected(&mut self) {
        let Some(track) = self.store.tracks().get(self.selected) else {
            return;
        };
        self.editor.edit(track);
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_track().map(|t| t.id) else {
            return;
        };
        let result = self.editor.delete(&mut self.store, id);
        self.after_edit(result.map(|t| format!("Deleted \"{}\"", t.title)));
    }

    /// Attach the audio path typed into the draft.
    pub fn attach_typed_audio(&mut self) {
        match self.editor.attach_typed_audio() {
            Ok(()) => self.set_status("Audio attached"),
            Err(e) => self.report("Cannot attach audio", e),
        }
    }

    /// Submit a new draft or save an edited one.
    pub fn commit_draft(&mut self) {
        let adding = self
            .editor
            .draft()
            .is_some_and(|d| d.target() == DraftTarget::New);
        let result = self.editor.commit(&mut self.store);
        if let Ok(id) = &result {
            if let Some(pos) = self.store.position(*id) {
                self.selected = pos;
            }
        }
        let verb = if adding { "Added" } else { "Saved" };
        self.after_edit(result.map(|id| format!("{verb} track {id}")));
    }

    pub fn cancel_draft(&mut self) {
        self.editor.cancel();
    }

    /// Re-align the controller and the cursor after the store may have changed.
    fn after_edit(&mut self, result: Result<String, EditorError>) {
        match result {
            Ok(msg) => {
                self.apply_library_change();
                self.set_status(msg);
            }
            Err(EditorError::Store(e @ StoreError::Persist(_))) => {
                log::error!("library: change kept in memory only: {e}");
                self.apply_library_change();
                self.set_status(format!("Not saved to disk: {e}"));
            }
            Err(e) => self.report("Library", e),
        }
    }

    pub fn apply_library_change(&mut self) {
        self.player.sync_with_library(self.store.tracks());
        let len = self.store.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}
