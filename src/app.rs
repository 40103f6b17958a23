//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the track store, the
//! playback controller, the library editor and the overlay flags.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
