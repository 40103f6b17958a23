//! Example tracks used when no usable snapshot exists.

use super::model::{Track, TrackDefaults, TrackFields, TrackId};

pub const SEED_COVER: &str = "covers/backpacker.jpg";

/// The two example tracks a fresh library starts with. Neither has audio.
pub fn seed_tracks(defaults: &TrackDefaults) -> Vec<Track> {
    vec![
        Track::from_fields(
            TrackId(1),
            TrackFields {
                title: "Journey's End".into(),
                artist: "Wanderer".into(),
                album: "Paths Unknown".into(),
                duration: "4:23".into(),
                audio: None,
                cover: Some(SEED_COVER.into()),
                lyrics_en: Some(
                    "Sample English lyrics would go here...\n\n\
                     This is where your song lyrics\nwould be displayed in English."
                        .into(),
                ),
                lyrics_pt: Some(
                    "Exemplo de letra em português ficaria aqui...\n\n\
                     Aqui é onde a letra da sua música\nseria exibida em português."
                        .into(),
                ),
            },
            defaults,
        ),
        Track::from_fields(
            TrackId(2),
            TrackFields {
                title: "Mountain Echoes".into(),
                artist: "Nature's Call".into(),
                album: "Wilderness".into(),
                duration: "3:45".into(),
                audio: None,
                cover: Some(SEED_COVER.into()),
                lyrics_en: Some(
                    "Another sample of English lyrics...\n\n\
                     Your actual song lyrics\nwould replace this text."
                        .into(),
                ),
                lyrics_pt: Some(
                    "Outro exemplo de letra em português...\n\n\
                     Sua letra real da música\nsubstituiria este texto."
                        .into(),
                ),
            },
            defaults,
        ),
    ]
}
