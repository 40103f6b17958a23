use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::LibrarySettings;

/// Unique identifier of a track within the store.
///
/// Ids are time-derived (unix milliseconds) but never reused or lowered:
/// see [`TrackId::fresh`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(pub u64);

impl TrackId {
    /// Produce an id strictly greater than every id in `existing`.
    pub fn fresh<'a>(existing: impl IntoIterator<Item = &'a TrackId>) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let floor = existing
            .into_iter()
            .map(|id| id.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        Self(now.max(floor))
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a track's audio comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Bytes of a file attached during this session, plus the path they were read from.
    Payload { origin: PathBuf, bytes: Arc<[u8]> },
    /// A path reference; this is all that survives a reload.
    Location(PathBuf),
}

impl AudioSource {
    /// The reference written to the snapshot. Payload bytes are never persisted.
    pub fn reference(&self) -> &Path {
        match self {
            AudioSource::Payload { origin, .. } => origin,
            AudioSource::Location(path) => path,
        }
    }
}

impl fmt::Debug for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioSource::Payload { origin, bytes } => f
                .debug_struct("Payload")
                .field("origin", origin)
                .field("len", &bytes.len())
                .finish(),
            AudioSource::Location(path) => f.debug_tuple("Location").field(path).finish(),
        }
    }
}

/// Every field of a [`Track`] except its id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackFields {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: String,
    pub audio: Option<AudioSource>,
    pub cover: Option<String>,
    pub lyrics_en: Option<String>,
    pub lyrics_pt: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Display duration, `m:ss`.
    pub duration: String,
    pub audio: Option<AudioSource>,
    pub cover: Option<String>,
    pub lyrics_en: Option<String>,
    pub lyrics_pt: Option<String>,
}

/// Placeholder values substituted for missing fields.
#[derive(Debug, Clone)]
pub struct TrackDefaults {
    pub unknown_album: String,
    pub default_cover: String,
}

impl Default for TrackDefaults {
    fn default() -> Self {
        Self::from(&LibrarySettings::default())
    }
}

impl From<&LibrarySettings> for TrackDefaults {
    fn from(s: &LibrarySettings) -> Self {
        Self {
            unknown_album: s.unknown_album.clone(),
            default_cover: s.default_cover.clone(),
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

impl Track {
    /// Build a track, substituting defaults for every missing field.
    ///
    /// This is the only place default values are applied.
    pub fn from_fields(id: TrackId, fields: TrackFields, defaults: &TrackDefaults) -> Self {
        let album = match fields.album.trim() {
            "" => defaults.unknown_album.clone(),
            a => a.to_string(),
        };
        let duration = match fields.duration.trim() {
            "" => "0:00".to_string(),
            d => d.to_string(),
        };
        let cover = non_empty(fields.cover).or_else(|| Some(defaults.default_cover.clone()));

        Self {
            id,
            title: fields.title.trim().to_string(),
            artist: fields.artist.trim().to_string(),
            album,
            duration,
            audio: fields.audio,
            cover,
            lyrics_en: non_empty(fields.lyrics_en),
            lyrics_pt: non_empty(fields.lyrics_pt),
        }
    }

    /// Copy of every field except the id, e.g. to seed an edit form.
    pub fn fields(&self) -> TrackFields {
        TrackFields {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            duration: self.duration.clone(),
            audio: self.audio.clone(),
            cover: self.cover.clone(),
            lyrics_en: self.lyrics_en.clone(),
            lyrics_pt: self.lyrics_pt.clone(),
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// `"Artist - Title"`, used in lists and the status line.
    pub fn display(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

/// Format a duration as `m:ss` (minutes unpadded, seconds zero-padded).
/// Partial seconds are truncated.
pub fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
