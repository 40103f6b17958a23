//! The media resource seen from the controller: a control surface plus
//! lifecycle notifications scoped to an explicit subscription.
//!
//! Each `bind` opens a new generation. The returned [`MediaSubscription`]
//! keeps that generation attached to the handle's [`ListenerSlot`]; once it
//! is dropped (rebind, unbind or controller teardown) notifications for that
//! generation are no longer delivered.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::library::AudioSource;

pub type Generation = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The source was opened; yields its total duration.
    MetadataLoaded { duration: Duration },
    /// A play request was honoured.
    Started,
    /// Periodic position update while playing.
    Position(Duration),
    /// Natural end of stream.
    Ended,
    /// The source could not be opened or played.
    Failed(String),
}

/// A lifecycle event tagged with the binding it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaNotice {
    pub generation: Generation,
    pub event: MediaEvent,
}

/// Which generation, if any, currently has a listener attached.
#[derive(Debug, Clone, Default)]
pub struct ListenerSlot(Rc<Cell<Option<Generation>>>);

impl ListenerSlot {
    /// Attach a listener for `generation`, replacing any previous one.
    pub fn attach(&self, generation: Generation) -> MediaSubscription {
        self.0.set(Some(generation));
        MediaSubscription {
            generation,
            slot: self.clone(),
        }
    }

    pub fn accepts(&self, generation: Generation) -> bool {
        self.0.get() == Some(generation)
    }

    pub fn is_attached(&self) -> bool {
        self.0.get().is_some()
    }
}

/// Keeps lifecycle delivery alive for one binding; detaches on drop.
#[derive(Debug)]
pub struct MediaSubscription {
    generation: Generation,
    slot: ListenerSlot,
}

impl MediaSubscription {
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

impl Drop for MediaSubscription {
    fn drop(&mut self) {
        if self.slot.accepts(self.generation) {
            self.slot.0.set(None);
        }
    }
}

/// Control surface of the single media resource.
pub trait MediaHandle {
    /// Point the handle at `source`, position 0, paused.
    fn bind(&mut self, source: &AudioSource) -> MediaSubscription;
    /// Drop the current source.
    fn unbind(&mut self);
    /// Request playback; confirmed by `Started` or rejected by `Failed`.
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, level: f32);
    /// Drain notifications for the attached subscription.
    fn poll_events(&mut self) -> Vec<MediaNotice>;
}
