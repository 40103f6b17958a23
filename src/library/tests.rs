use super::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn fields(title: &str) -> TrackFields {
    TrackFields {
        title: title.into(),
        artist: "Artist".into(),
        ..TrackFields::default()
    }
}

fn empty_store() -> TrackStore<MemoryStorage> {
    TrackStore::load(MemoryStorage::with_entry(SNAPSHOT_KEY, "[]"), TrackDefaults::default())
}

fn ids(store: &TrackStore<MemoryStorage>) -> Vec<TrackId> {
    store.tracks().iter().map(|t| t.id).collect()
}

#[test]
fn format_clock_pads_seconds_only() {
    assert_eq!(format_clock(Duration::ZERO), "0:00");
    assert_eq!(format_clock(Duration::from_secs(7)), "0:07");
    assert_eq!(format_clock(Duration::from_millis(263_900)), "4:23");
    assert_eq!(format_clock(Duration::from_secs(3_725)), "62:05");
}

#[test]
fn from_fields_substitutes_defaults() {
    let defaults = TrackDefaults::default();
    let t = Track::from_fields(
        TrackId(9),
        TrackFields {
            title: "  Song ".into(),
            artist: "Band".into(),
            lyrics_en: Some("   ".into()),
            ..TrackFields::default()
        },
        &defaults,
    );
    assert_eq!(t.title, "Song");
    assert_eq!(t.album, "Unknown Album");
    assert_eq!(t.duration, "0:00");
    assert_eq!(t.cover.as_deref(), Some(defaults.default_cover.as_str()));
    assert_eq!(t.lyrics_en, None);
    assert_eq!(t.display(), "Band - Song");
}

#[test]
fn fresh_ids_are_strictly_greater_than_existing() {
    let huge = TrackId(u64::MAX / 2);
    let id = TrackId::fresh([&TrackId(1), &huge]);
    assert!(id > huge);
    assert!(TrackId::fresh(std::iter::empty()).0 > 0);
}

#[test]
fn missing_snapshot_seeds_two_examples() {
    let store = TrackStore::load(MemoryStorage::new(), TrackDefaults::default());
    assert_eq!(store.len(), 2);
    assert_eq!(store.tracks()[0].title, "Journey's End");
    assert_eq!(store.tracks()[1].title, "Mountain Echoes");
    assert!(store.tracks().iter().all(|t| !t.has_audio()));
}

#[test]
fn corrupt_snapshot_seeds_exactly_the_two_examples() {
    let store = TrackStore::load(
        MemoryStorage::with_entry(SNAPSHOT_KEY, "{ not json"),
        TrackDefaults::default(),
    );
    let titles: Vec<&str> = store.tracks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Journey's End", "Mountain Echoes"]);
    assert_eq!(ids(&store), vec![TrackId(1), TrackId(2)]);
}

#[test]
fn empty_snapshot_stays_empty() {
    let store = empty_store();
    assert!(store.is_empty());
}

#[test]
fn loading_does_not_write_the_seeds_back() {
    let store = TrackStore::load(MemoryStorage::new(), TrackDefaults::default());
    assert_eq!(store.storage().get(SNAPSHOT_KEY).unwrap(), None);
}

#[test]
fn snapshot_uses_camel_case_records_and_drops_payload_bytes() {
    let mut store = empty_store();
    let id = store
        .add(TrackFields {
            audio: Some(AudioSource::Payload {
                origin: PathBuf::from("/music/song.mp3"),
                bytes: Arc::from(vec![1u8, 2, 3]),
            }),
            lyrics_pt: Some("letra".into()),
            ..fields("Song")
        })
        .unwrap();

    let raw = store.storage().get(SNAPSHOT_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let rec = &json[0];
    assert_eq!(rec["id"], serde_json::json!(id.0));
    assert_eq!(rec["audioUrl"], "/music/song.mp3");
    assert_eq!(rec["lyricsPt"], "letra");
    assert_eq!(rec["album"], "Unknown Album");
    assert!(rec.get("lyricsEn").is_none());

    let reloaded = TrackStore::load(store.storage().clone(), TrackDefaults::default());
    assert_eq!(
        reloaded.tracks()[0].audio,
        Some(AudioSource::Location(PathBuf::from("/music/song.mp3")))
    );
}

#[test]
fn add_update_remove_keep_ids_unique_and_positions_stable() {
    let mut store = empty_store();
    let a = store.add(fields("A")).unwrap();
    let b = store.add(fields("B")).unwrap();
    let c = store.add(fields("C")).unwrap();
    assert!(a < b && b < c);

    store.update(b, fields("B2")).unwrap();
    assert_eq!(ids(&store), vec![a, b, c]);
    assert_eq!(store.tracks()[1].title, "B2");

    let removed = store.remove(a).unwrap();
    assert_eq!(removed.title, "A");
    assert_eq!(ids(&store), vec![b, c]);

    let d = store.add(fields("D")).unwrap();
    assert!(d > c);
    assert_eq!(ids(&store), vec![b, c, d]);

    let mut seen = ids(&store);
    seen.dedup();
    assert_eq!(seen.len(), store.len());
}

#[test]
fn unknown_ids_are_rejected() {
    let mut store = empty_store();
    assert!(matches!(
        store.update(TrackId(42), fields("x")),
        Err(StoreError::UnknownTrack(TrackId(42)))
    ));
    assert!(matches!(
        store.remove(TrackId(42)),
        Err(StoreError::UnknownTrack(TrackId(42)))
    ));
}

#[test]
fn replace_all_persists_and_reassigns_duplicate_ids() {
    let mut store = empty_store();
    let defaults = TrackDefaults::default();
    let t1 = Track::from_fields(TrackId(5), fields("one"), &defaults);
    let t2 = Track::from_fields(TrackId(5), fields("two"), &defaults);
    store.replace_all(vec![t1, t2]).unwrap();

    assert_eq!(store.tracks()[0].id, TrackId(5));
    assert_ne!(store.tracks()[1].id, TrackId(5));

    let reloaded = TrackStore::load(store.storage().clone(), TrackDefaults::default());
    assert_eq!(reloaded.len(), 2);
}

#[test]
fn file_backed_store_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = TrackStore::load(FileStorage::new(dir.path()), TrackDefaults::default());
    assert_eq!(store.len(), 2);
    let id = store.add(fields("Persisted")).unwrap();

    let reloaded = TrackStore::load(FileStorage::new(dir.path()), TrackDefaults::default());
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded.get(id).map(|t| t.title.as_str()), Some("Persisted"));
}
