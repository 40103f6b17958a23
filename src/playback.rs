//! Playback: transport state machine, volume, and the media handle seam.
//!
//! `PlaybackController` is generic over `MediaHandle` so the runtime drives
//! it with the rodio-backed `audio::AudioPlayer` and tests drive it with an
//! in-memory fake.

mod controller;
mod media;
mod state;
mod volume;

pub use controller::*;
pub use media::*;
pub use state::*;

#[cfg(test)]
pub mod fake;
