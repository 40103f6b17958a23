//! Library editor: a draft track that is created, edited and committed to
//! the [`TrackStore`], plus unconditional deletion.
//!
//! The editor never touches playback. Callers re-sync the controller after
//! any operation that reached the store.

mod draft;
mod form;

pub use draft::{Draft, DraftTarget};
pub use form::Field;

use std::path::Path;

use thiserror::Error;

use crate::library::{
    KeyValueStorage, ProbeError, StoreError, Track, TrackId, TrackStore, probe_file,
};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("nothing is being edited")]
    NoDraft,
    #[error("missing {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),
    #[error(transparent)]
    Attach(#[from] ProbeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Default)]
pub struct LibraryEditor {
    draft: Option<Draft>,
}

impl LibraryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.draft.as_mut()
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Start a blank draft for a new track, replacing any open draft.
    pub fn open_add(&mut self) {
        self.draft = Some(Draft::new());
    }

    /// Open an existing track for in-place modification.
    pub fn edit(&mut self, track: &Track) {
        self.draft = Some(Draft::for_track(track));
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Read `path` into memory and bind it to the draft.
    ///
    /// On failure the draft is left exactly as it was.
    pub fn attach_audio(&mut self, path: &Path) -> Result<(), EditorError> {
        let draft = self.draft.as_mut().ok_or(EditorError::NoDraft)?;
        let probed = probe_file(path)?;
        log::debug!(
            "editor: attached {} ({} bytes)",
            probed.origin.display(),
            probed.bytes.len()
        );
        draft.apply_probe(probed);
        Ok(())
    }

    /// Attach whatever path is typed into the audio field.
    pub fn attach_typed_audio(&mut self) -> Result<(), EditorError> {
        let typed = self
            .draft
            .as_ref()
            .ok_or(EditorError::NoDraft)?
            .text(Field::AudioPath)
            .trim()
            .to_string();
        if typed.is_empty() {
            return Err(EditorError::Incomplete(vec!["audio"]));
        }
        self.attach_audio(Path::new(&typed))
    }

    /// Title, artist and audio are all present.
    pub fn can_submit(&self) -> bool {
        self.draft.as_ref().is_some_and(|d| d.missing().is_empty())
    }

    /// Append the draft to the store as a new track and clear it.
    pub fn submit<S: KeyValueStorage>(
        &mut self,
        store: &mut TrackStore<S>,
    ) -> Result<TrackId, EditorError> {
        let draft = self.draft.as_ref().ok_or(EditorError::NoDraft)?;
        let missing = draft.missing();
        if !missing.is_empty() {
            return Err(EditorError::Incomplete(missing));
        }
        let fields = draft.fields().clone();
        let result = store.add(fields);
        self.clear_if_committed(&result);
        Ok(result?)
    }

    /// Replace the edited track by id, keeping its position.
    pub fn save<S: KeyValueStorage>(
        &mut self,
        store: &mut TrackStore<S>,
    ) -> Result<TrackId, EditorError> {
        let draft = self.draft.as_ref().ok_or(EditorError::NoDraft)?;
        let DraftTarget::Existing(id) = draft.target() else {
            return self.submit(store);
        };
        if !draft.has_identity() {
            let mut missing = draft.missing();
            missing.retain(|m| *m != "audio");
            return Err(EditorError::Incomplete(missing));
        }
        let fields = draft.fields().clone();
        let result = store.update(id, fields);
        self.clear_if_committed(&result);
        result?;
        Ok(id)
    }

    /// Submit a new draft or save an edited one.
    pub fn commit<S: KeyValueStorage>(
        &mut self,
        store: &mut TrackStore<S>,
    ) -> Result<TrackId, EditorError> {
        match self.draft.as_ref().map(Draft::target) {
            Some(DraftTarget::Existing(_)) => self.save(store),
            Some(DraftTarget::New) => self.submit(store),
            None => Err(EditorError::NoDraft),
        }
    }

    /// Remove `id` from the store. No confirmation, no undo.
    pub fn delete<S: KeyValueStorage>(
        &mut self,
        store: &mut TrackStore<S>,
        id: TrackId,
    ) -> Result<Track, EditorError> {
        if self
            .draft
            .as_ref()
            .is_some_and(|d| d.target() == DraftTarget::Existing(id))
        {
            self.draft = None;
        }
        Ok(store.remove(id)?)
    }

    /// A failed write still leaves the change in memory.
    fn clear_if_committed<T>(&mut self, result: &Result<T, StoreError>) {
        if matches!(result, Ok(_) | Err(StoreError::Persist(_))) {
            self.draft = None;
        }
    }
}
