//! Reading an audio file picked by the user: bytes, duration and tags.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lofty::error::LoftyError;
use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use thiserror::Error;

use super::model::AudioSource;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a recognised audio file: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: LoftyError,
    },
}

/// An audio file loaded into memory, with what could be decoded from it.
#[derive(Debug, Clone)]
pub struct ProbedAudio {
    pub origin: PathBuf,
    pub bytes: Arc<[u8]>,
    pub duration: Duration,
    /// File name without its extension.
    pub stem: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

/// Load `path` into memory and decode its duration and primary tags.
pub fn probe_file(path: &Path) -> Result<ProbedAudio, ProbeError> {
    let bytes: Arc<[u8]> = fs::read(path)
        .map_err(|source| ProbeError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .into();

    let tagged = read_tagged(&bytes).map_err(|source| ProbeError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let duration = tagged.properties().duration();

    let mut title = None;
    let mut artist = None;
    let mut album = None;
    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        title = tag_string(tag, &ItemKey::TrackTitle);
        artist = tag_string(tag, &ItemKey::TrackArtist);
        album = tag_string(tag, &ItemKey::AlbumTitle);
    }

    Ok(ProbedAudio {
        origin: path.to_path_buf(),
        bytes,
        duration,
        stem: file_stem(path),
        title,
        artist,
        album,
    })
}

/// Best-effort duration of an attached or referenced source.
pub fn probe_duration(source: &AudioSource) -> Option<Duration> {
    let tagged = match source {
        AudioSource::Payload { bytes, .. } => read_tagged(bytes).ok()?,
        AudioSource::Location(path) => lofty::read_from_path(path).ok()?,
    };
    Some(tagged.properties().duration()).filter(|d| !d.is_zero())
}

/// Detect the container from the bytes themselves and read it.
fn read_tagged(bytes: &[u8]) -> Result<TaggedFile, LoftyError> {
    Probe::new(Cursor::new(bytes)).guess_file_type()?.read()
}

fn tag_string(tag: &Tag, key: &ItemKey) -> Option<String> {
    tag.get_string(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// File name with the last extension stripped, e.g. `"song.final.mp3"` -> `"song.final"`.
pub fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_stem_strips_only_last_extension() {
        assert_eq!(file_stem(Path::new("/m/song.mp3")).as_deref(), Some("song"));
        assert_eq!(
            file_stem(Path::new("/m/live.at.home.flac")).as_deref(),
            Some("live.at.home")
        );
        assert_eq!(file_stem(Path::new("/m/noext")).as_deref(), Some("noext"));
    }

    fn wav_bytes(secs: u32) -> Vec<u8> {
        let rate: u32 = 8_000;
        let data_len = rate * secs;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&rate.to_le_bytes());
        bytes.extend_from_slice(&rate.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0x80);
        bytes
    }

    #[test]
    fn reads_duration_from_in_memory_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("take one.wav");
        fs::write(&path, wav_bytes(3)).unwrap();

        let probed = probe_file(&path).unwrap();
        assert_eq!(probed.duration.as_secs(), 3);
        assert_eq!(probed.stem.as_deref(), Some("take one"));
        assert_eq!(probed.bytes.len(), 44 + 3 * 8_000);
    }

    #[test]
    fn duration_lookup_handles_payload_and_location() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let bytes = wav_bytes(2);
        fs::write(&path, &bytes).unwrap();

        let payload = AudioSource::Payload {
            origin: path.clone(),
            bytes: bytes.into(),
        };
        assert_eq!(probe_duration(&payload), Some(Duration::from_secs(2)));
        assert_eq!(
            probe_duration(&AudioSource::Location(path)),
            Some(Duration::from_secs(2))
        );
        assert_eq!(
            probe_duration(&AudioSource::Location(dir.path().join("gone.wav"))),
            None
        );
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = probe_file(&dir.path().join("missing.mp3")).unwrap_err();
        assert!(matches!(err, ProbeError::Read { .. }));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fake.mp3");
        fs::write(&path, b"definitely not audio").unwrap();
        let err = probe_file(&path).unwrap_err();
        assert!(matches!(err, ProbeError::Decode { .. }));
    }
}
