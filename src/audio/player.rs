use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::library::AudioSource;
use crate::playback::{
    Generation, ListenerSlot, MediaHandle, MediaNotice, MediaSubscription,
};

use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// Front end of the audio thread. Lives on the UI thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<MediaNotice>,
    slot: ListenerSlot,
    generation: Generation,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    pub fn new(audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaNotice>();
        let audio_handle = spawn_audio_thread(rx, event_tx, audio_settings);

        Self {
            tx,
            events: event_rx,
            slot: ListenerSlot::default(),
            generation: 0,
            join: Some(audio_handle),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            log::warn!("audio: thread is gone, command dropped");
        }
    }

    pub fn quit_softly(&mut self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl MediaHandle for AudioPlayer {
    fn bind(&mut self, source: &AudioSource) -> MediaSubscription {
        self.generation += 1;
        self.send(AudioCmd::Load {
            generation: self.generation,
            source: source.clone(),
        });
        self.slot.attach(self.generation)
    }

    fn unbind(&mut self) {
        self.send(AudioCmd::Unload);
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(AudioCmd::Seek(position));
    }

    fn set_volume(&mut self, level: f32) {
        self.send(AudioCmd::SetVolume(level));
    }

    fn poll_events(&mut self) -> Vec<MediaNotice> {
        self.events
            .try_iter()
            .filter(|n| self.slot.accepts(n.generation))
            .collect()
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        if self.join.is_some() {
            self.quit_softly(Duration::ZERO);
        }
    }
}
