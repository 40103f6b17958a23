use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;
use crate::library::{AudioSource, probe_duration};
use crate::playback::{Generation, MediaEvent, MediaNotice};

use super::sink::{create_sink_at, fade_out_sink};
use super::types::{AudioCmd, MediaError, PlayClock};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaNotice>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped; noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                log::error!("audio: no output device: {e}");
                None
            }
        };

        let mut worker = AudioWorker {
            stream,
            events,
            loaded: None,
            sink: None,
            clock: PlayClock::default(),
            volume: 1.0,
        };

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    worker.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => worker.handle(cmd),
                Err(RecvTimeoutError::Timeout) => worker.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        log::debug!("audio: thread exiting");
    })
}

/// The source currently loaded, kept so seeks can reopen it.
struct Loaded {
    generation: Generation,
    source: AudioSource,
}

struct AudioWorker {
    stream: Option<OutputStream>,
    events: Sender<MediaNotice>,
    loaded: Option<Loaded>,
    /// `None` while nothing is loaded or the loaded source failed to open.
    sink: Option<Sink>,
    clock: PlayClock,
    volume: f32,
}

impl AudioWorker {
    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load { generation, source } => self.load(generation, source),
            AudioCmd::Unload => {
                self.stop_sink();
                self.loaded = None;
            }
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => {
                if let Some(s) = &self.sink {
                    s.pause();
                }
                self.clock.pause();
            }
            AudioCmd::Seek(position) => self.seek(position),
            AudioCmd::SetVolume(level) => {
                self.volume = level;
                if let Some(s) = &self.sink {
                    s.set_volume(level);
                }
            }
            AudioCmd::Quit { .. } => {}
        }
    }

    fn load(&mut self, generation: Generation, source: AudioSource) {
        self.stop_sink();
        self.clock = PlayClock::default();

        match self.open_at(&source, Duration::ZERO) {
            Ok((sink, total)) => {
                self.sink = Some(sink);
                let duration = total
                    .or_else(|| probe_duration(&source))
                    .unwrap_or(Duration::ZERO);
                self.emit(generation, MediaEvent::MetadataLoaded { duration });
            }
            Err(e) => {
                log::warn!("audio: {e}");
                self.emit(generation, MediaEvent::Failed(e.to_string()));
            }
        }
        self.loaded = Some(Loaded { generation, source });
    }

    fn play(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        let generation = loaded.generation;
        match &self.sink {
            Some(s) => {
                s.play();
                self.clock.start();
                self.emit(generation, MediaEvent::Started);
            }
            None => {
                let reason = match &self.stream {
                    Some(_) => format!("{} could not be opened", loaded.source.reference().display()),
                    None => MediaError::NoOutput("playback unavailable".into()).to_string(),
                };
                self.emit(generation, MediaEvent::Failed(reason));
            }
        }
    }

    /// Rebuild the sink and skip into the source. Keeps the paused/playing state.
    fn seek(&mut self, position: Duration) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        if self.sink.is_none() {
            return;
        }
        let generation = loaded.generation;
        let source = loaded.source.clone();
        let running = self.clock.is_running();

        self.stop_sink();
        match self.open_at(&source, position) {
            Ok((sink, _)) => {
                if running {
                    sink.play();
                }
                self.sink = Some(sink);
                self.clock.reset_to(position);
                self.emit(generation, MediaEvent::Position(position));
            }
            Err(e) => {
                log::warn!("audio: seek failed: {e}");
                self.clock = PlayClock::default();
                self.emit(generation, MediaEvent::Failed(e.to_string()));
            }
        }
    }

    /// Periodic position report and end-of-stream detection.
    fn tick(&mut self) {
        let (Some(loaded), Some(sink)) = (&self.loaded, &self.sink) else {
            return;
        };
        if !self.clock.is_running() {
            return;
        }
        let generation = loaded.generation;
        if sink.empty() {
            self.clock.pause();
            self.emit(generation, MediaEvent::Ended);
        } else {
            self.emit(generation, MediaEvent::Position(self.clock.elapsed()));
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = &self.sink {
            if self.clock.is_running() {
                fade_out_sink(s, fade_out_ms);
            }
            s.stop();
        }
        self.sink = None;
    }

    fn open_at(
        &self,
        source: &AudioSource,
        start_at: Duration,
    ) -> Result<(Sink, Option<Duration>), MediaError> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| MediaError::NoOutput("playback unavailable".into()))?;
        let opened = create_sink_at(stream, source, start_at)?;
        opened.sink.set_volume(self.volume);
        Ok((opened.sink, opened.total))
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn emit(&self, generation: Generation, event: MediaEvent) {
        // The receiver only goes away during shutdown.
        let _ = self.events.send(MediaNotice { generation, event });
    }
}
