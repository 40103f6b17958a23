//! Track library: the canonical track schema, the persisted store and the
//! audio file probe used by the editor.

mod model;
mod probe;
mod seed;
mod storage;
mod store;

pub use model::*;
pub use probe::{ProbeError, ProbedAudio, probe_duration, probe_file};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{SNAPSHOT_KEY, StoreError, TrackStore};

#[cfg(test)]
mod tests;
