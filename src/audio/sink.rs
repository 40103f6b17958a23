//! Utilities for creating `rodio` sinks from an [`AudioSource`].
//!
//! Payloads decode straight from memory, locations from the file on disk.
//! Either way the sink comes back paused at the requested start position.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::library::AudioSource;

use super::types::MediaError;

/// A paused sink plus the decoder's idea of the total length, if it has one.
pub(super) struct OpenedSink {
    pub sink: Sink,
    pub total: Option<Duration>,
}

/// Create a paused `Sink` for `source` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    source: &AudioSource,
    start_at: Duration,
) -> Result<OpenedSink, MediaError> {
    let sink = Sink::connect_new(stream.mixer());
    let total = match source {
        AudioSource::Payload { origin, bytes } => {
            let decoder =
                Decoder::new(Cursor::new(bytes.clone())).map_err(|source| MediaError::Decode {
                    path: origin.clone(),
                    source,
                })?;
            let total = decoder.total_duration();
            // `skip_duration` is the seeking primitive; Duration::ZERO is fine.
            sink.append(decoder.skip_duration(start_at));
            total
        }
        AudioSource::Location(path) => {
            let file = File::open(path).map_err(|source| MediaError::Open {
                path: path.clone(),
                source,
            })?;
            let decoder =
                Decoder::new(BufReader::new(file)).map_err(|source| MediaError::Decode {
                    path: path.clone(),
                    source,
                })?;
            let total = decoder.total_duration();
            sink.append(decoder.skip_duration(start_at));
            total
        }
    };
    sink.pause();
    Ok(OpenedSink { sink, total })
}

/// Ramp `sink` down to silence over `fade_out_ms`.
pub(super) fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        std::thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
