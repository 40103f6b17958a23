use crate::library::{AudioSource, ProbedAudio, Track, TrackFields, TrackId, format_clock};

use super::form::Field;

/// What a draft will become once committed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DraftTarget {
    New,
    Existing(TrackId),
}

/// An uncommitted track under edit.
#[derive(Debug, Clone)]
pub struct Draft {
    pub(super) target: DraftTarget,
    pub(super) fields: TrackFields,
    pub(super) focus: Field,
    /// Raw text of the audio path field, independent of the attached source.
    pub(super) audio_input: String,
}

impl Draft {
    pub fn new() -> Self {
        Self {
            target: DraftTarget::New,
            fields: TrackFields::default(),
            focus: Field::Title,
            audio_input: String::new(),
        }
    }

    pub fn for_track(track: &Track) -> Self {
        Self {
            target: DraftTarget::Existing(track.id),
            fields: track.fields(),
            focus: Field::Title,
            audio_input: track
                .audio
                .as_ref()
                .map(|a| a.reference().display().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn target(&self) -> DraftTarget {
        self.target
    }

    pub fn fields(&self) -> &TrackFields {
        &self.fields
    }

    pub fn has_audio(&self) -> bool {
        self.fields.audio.is_some()
    }

    /// Title and artist filled in.
    pub fn has_identity(&self) -> bool {
        !self.fields.title.trim().is_empty() && !self.fields.artist.trim().is_empty()
    }

    /// Names of the fields still blocking submission.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.fields.title.trim().is_empty() {
            missing.push("title");
        }
        if self.fields.artist.trim().is_empty() {
            missing.push("artist");
        }
        if !self.has_audio() {
            missing.push("audio");
        }
        missing
    }

    /// Take over a probed file: payload, display duration, and any
    /// title/artist/album the user has not typed yet.
    pub(super) fn apply_probe(&mut self, probed: ProbedAudio) {
        self.fields.duration = format_clock(probed.duration);
        if self.fields.title.trim().is_empty() {
            if let Some(stem) = probed.stem {
                self.fields.title = stem;
            }
        }
        if self.fields.artist.trim().is_empty() {
            if let Some(artist) = probed.artist {
                self.fields.artist = artist;
            }
        }
        if self.fields.album.trim().is_empty() {
            if let Some(album) = probed.album {
                self.fields.album = album;
            }
        }
        self.audio_input = probed.origin.display().to_string();
        self.fields.audio = Some(AudioSource::Payload {
            origin: probed.origin,
            bytes: probed.bytes,
        });
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}
