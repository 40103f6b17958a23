//! The ordered track collection and its durable mirror.
//!
//! Every mutation re-serializes the whole sequence into one storage key.
//! Audio payload bytes never reach the snapshot: a `Payload` source is
//! written as its origin path and comes back as a `Location` after reload.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{AudioSource, Track, TrackDefaults, TrackFields, TrackId};
use super::seed::seed_tracks;
use super::storage::KeyValueStorage;

/// Storage key holding the JSON snapshot.
pub const SNAPSHOT_KEY: &str = "tracks";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no track with id {0}")]
    UnknownTrack(TrackId),
    /// The in-memory change was applied but could not be made durable.
    #[error("failed to persist library: {0}")]
    Persist(#[source] std::io::Error),
    #[error("failed to serialize library: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Snapshot record, shaped like the stored JSON objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTrack {
    id: u64,
    title: String,
    artist: String,
    #[serde(default)]
    album: String,
    #[serde(default)]
    duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lyrics_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lyrics_pt: Option<String>,
}

impl From<&Track> for StoredTrack {
    fn from(t: &Track) -> Self {
        Self {
            id: t.id.0,
            title: t.title.clone(),
            artist: t.artist.clone(),
            album: t.album.clone(),
            duration: t.duration.clone(),
            audio_url: t
                .audio
                .as_ref()
                .map(|a| a.reference().to_string_lossy().into_owned()),
            cover: t.cover.clone(),
            lyrics_en: t.lyrics_en.clone(),
            lyrics_pt: t.lyrics_pt.clone(),
        }
    }
}

impl StoredTrack {
    fn into_track(self) -> Track {
        Track {
            id: TrackId(self.id),
            title: self.title,
            artist: self.artist,
            album: self.album,
            duration: self.duration,
            audio: self
                .audio_url
                .filter(|u| !u.trim().is_empty())
                .map(|u| AudioSource::Location(PathBuf::from(u))),
            cover: self.cover,
            lyrics_en: self.lyrics_en,
            lyrics_pt: self.lyrics_pt,
        }
    }
}

pub struct TrackStore<S: KeyValueStorage> {
    tracks: Vec<Track>,
    storage: S,
    defaults: TrackDefaults,
}

impl<S: KeyValueStorage> TrackStore<S> {
    /// Read the snapshot from `storage`.
    ///
    /// A missing, unreadable or unparseable snapshot seeds the two example
    /// tracks; loading never fails.
    pub fn load(storage: S, defaults: TrackDefaults) -> Self {
        let tracks = match storage.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<StoredTrack>>(&raw) {
                Ok(records) => {
                    let tracks = dedup_ids(records.into_iter().map(StoredTrack::into_track));
                    log::info!("library: loaded {} tracks from snapshot", tracks.len());
                    tracks
                }
                Err(e) => {
                    log::warn!("library: snapshot is corrupt ({e}), seeding example tracks");
                    seed_tracks(&defaults)
                }
            },
            Ok(None) => {
                log::info!("library: no snapshot found, seeding example tracks");
                seed_tracks(&defaults)
            }
            Err(e) => {
                log::warn!("library: failed to read snapshot ({e}), seeding example tracks");
                seed_tracks(&defaults)
            }
        };

        Self {
            tracks,
            storage,
            defaults,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Overwrite the whole sequence and persist it.
    pub fn replace_all(&mut self, tracks: Vec<Track>) -> Result<(), StoreError> {
        self.tracks = dedup_ids(tracks);
        self.persist()
    }

    /// Append a new track with a fresh id.
    pub fn add(&mut self, fields: TrackFields) -> Result<TrackId, StoreError> {
        let id = TrackId::fresh(self.tracks.iter().map(|t| &t.id));
        self.tracks.push(Track::from_fields(id, fields, &self.defaults));
        log::info!("library: added track {id}");
        self.persist().map(|()| id)
    }

    /// Replace every field of track `id`, keeping its position.
    pub fn update(&mut self, id: TrackId, fields: TrackFields) -> Result<(), StoreError> {
        let pos = self.position(id).ok_or(StoreError::UnknownTrack(id))?;
        self.tracks[pos] = Track::from_fields(id, fields, &self.defaults);
        log::info!("library: updated track {id}");
        self.persist()
    }

    /// Delete track `id`. Other tracks keep their ids and relative order.
    pub fn remove(&mut self, id: TrackId) -> Result<Track, StoreError> {
        let pos = self.position(id).ok_or(StoreError::UnknownTrack(id))?;
        let removed = self.tracks.remove(pos);
        log::info!("library: removed track {id}");
        self.persist().map(|()| removed)
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let records: Vec<StoredTrack> = self.tracks.iter().map(StoredTrack::from).collect();
        let json = serde_json::to_string(&records)?;
        self.storage
            .set(SNAPSHOT_KEY, &json)
            .map_err(StoreError::Persist)
    }
}

/// Keep the first occurrence of each id; later duplicates get fresh ids.
fn dedup_ids(tracks: impl IntoIterator<Item = Track>) -> Vec<Track> {
    let mut out: Vec<Track> = Vec::new();
    for mut t in tracks {
        if out.iter().any(|o| o.id == t.id) {
            let id = TrackId::fresh(out.iter().map(|o| &o.id));
            log::warn!("library: duplicate id {} reassigned to {id}", t.id);
            t.id = id;
        }
        out.push(t);
    }
    out
}
