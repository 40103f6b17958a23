//! Audio output: a dedicated thread owning the `rodio` stream, driven over a
//! command channel and reporting lifecycle events back.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
