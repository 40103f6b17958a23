//! In-memory media handle for tests: records every command and delivers
//! notices queued with [`FakeMedia::emit`].

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use crate::library::AudioSource;

use super::media::{Generation, ListenerSlot, MediaEvent, MediaHandle, MediaNotice, MediaSubscription};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Bind(PathBuf),
    Unbind,
    Play,
    Pause,
    Seek(Duration),
    Volume(f32),
}

#[derive(Default)]
struct FakeLog {
    calls: Vec<Call>,
    generation: Generation,
    queue: Vec<MediaNotice>,
}

#[derive(Clone, Default)]
pub struct FakeMedia {
    log: Rc<RefCell<FakeLog>>,
    slot: ListenerSlot,
}

impl FakeMedia {
    pub fn emit(&self, event: MediaEvent) {
        let mut log = self.log.borrow_mut();
        let generation = log.generation;
        log.queue.push(MediaNotice { generation, event });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.log.borrow_mut().calls.clear();
    }

    /// Generation of the most recent binding.
    pub fn generation(&self) -> Generation {
        self.log.borrow().generation
    }

    pub fn is_attached(&self) -> bool {
        self.slot.is_attached()
    }
}

impl MediaHandle for FakeMedia {
    fn bind(&mut self, source: &AudioSource) -> MediaSubscription {
        let mut log = self.log.borrow_mut();
        log.generation += 1;
        log.calls.push(Call::Bind(source.reference().to_path_buf()));
        self.slot.attach(log.generation)
    }

    fn unbind(&mut self) {
        self.log.borrow_mut().calls.push(Call::Unbind);
    }

    fn play(&mut self) {
        self.log.borrow_mut().calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.log.borrow_mut().calls.push(Call::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.log.borrow_mut().calls.push(Call::Seek(position));
    }

    fn set_volume(&mut self, level: f32) {
        self.log.borrow_mut().calls.push(Call::Volume(level));
    }

    fn poll_events(&mut self) -> Vec<MediaNotice> {
        let queued = std::mem::take(&mut self.log.borrow_mut().queue);
        queued
            .into_iter()
            .filter(|n| self.slot.accepts(n.generation))
            .collect()
    }
}
