//! Playback controller: owns the media handle, the current index into the
//! track list and the transport state.
//!
//! The track list itself belongs to the store; every operation that needs it
//! takes the current slice, and `sync_with_library` must be called after each
//! store mutation.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::PlaybackSettings;
use crate::library::{AudioSource, Track, TrackId};

use super::media::{MediaEvent, MediaHandle, MediaNotice, MediaSubscription};
use super::state::{PlaybackState, RepeatMode};
use super::volume::Volume;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("the library is empty")]
    EmptyLibrary,
    #[error("\"{0}\" has no audio file")]
    NoAudioSource(String),
    #[error("no track at position {0}")]
    IndexOutOfBounds(usize),
}

pub struct PlaybackController<M: MediaHandle> {
    media: M,
    subscription: Option<MediaSubscription>,
    /// Source the media handle is bound to, used to detect edits of the current track.
    bound_source: Option<AudioSource>,

    state: PlaybackState,
    current: usize,
    current_id: Option<TrackId>,
    /// A play request is waiting for the media to confirm or reject it.
    pending_play: bool,

    position: Duration,
    duration: Duration,
    volume: Volume,
    shuffle: bool,
    repeat: RepeatMode,

    last_error: Option<String>,
    rng: StdRng,
}

impl<M: MediaHandle> PlaybackController<M> {
    pub fn new(mut media: M, settings: &PlaybackSettings) -> Self {
        let volume = Volume::new(settings.volume);
        media.set_volume(volume.effective());
        Self {
            media,
            subscription: None,
            bound_source: None,
            state: PlaybackState::Empty,
            current: 0,
            current_id: None,
            pending_play: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume,
            shuffle: settings.shuffle,
            repeat: settings.repeat_mode.into(),
            last_error: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the random source used by shuffle.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_pending(&self) -> bool {
        self.pending_play
    }

    /// Index of the current track; meaningless while `Empty`.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_track<'a>(&self, tracks: &'a [Track]) -> Option<&'a Track> {
        match self.state {
            PlaybackState::Empty => None,
            _ => tracks.get(self.current),
        }
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Fraction of the track already played, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            0.0
        } else {
            (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        }
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    #[cfg(test)]
    pub fn effective_volume(&self) -> f32 {
        self.volume.effective()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    #[cfg(test)]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Take the most recent playback error, clearing it.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Re-align with the track list after a store mutation.
    ///
    /// The current track is followed by id. If it was removed, the index is
    /// clamped into range and the new current track is bound, stopped. An
    /// empty list moves the controller to `Empty`.
    pub fn sync_with_library(&mut self, tracks: &[Track]) {
        if tracks.is_empty() {
            self.release();
            self.state = PlaybackState::Empty;
            self.current = 0;
            self.current_id = None;
            log::info!("playback: library is empty");
            return;
        }

        let followed = self
            .current_id
            .and_then(|id| tracks.iter().position(|t| t.id == id));

        match followed {
            Some(pos) => {
                self.current = pos;
                if tracks[pos].audio != self.bound_source {
                    log::debug!("playback: audio of current track changed, rebinding");
                    self.bind_current(tracks);
                    self.state = PlaybackState::Idle;
                }
            }
            None => {
                self.current = self.current.min(tracks.len() - 1);
                self.bind_current(tracks);
                self.state = PlaybackState::Idle;
            }
        }
    }

    /// Pause when playing, otherwise request playback of the current track.
    pub fn toggle_play(&mut self, tracks: &[Track]) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Empty => Err(PlaybackError::EmptyLibrary),
            PlaybackState::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackState::Idle | PlaybackState::Ended => {
                if self.pending_play {
                    self.pause();
                    return Ok(());
                }
                self.request_play(tracks)
            }
        }
    }

    pub fn pause(&mut self) {
        self.media.pause();
        self.pending_play = false;
        if self.state != PlaybackState::Empty {
            self.state = PlaybackState::Idle;
        }
    }

    /// Advance by the next-track policy: a uniformly random index when
    /// shuffle is on (the same track may come up again), otherwise the
    /// following index, wrapping after the last. The new track is bound
    /// stopped.
    pub fn next_track(&mut self, tracks: &[Track]) -> Result<(), PlaybackError> {
        if self.state == PlaybackState::Empty || tracks.is_empty() {
            return Err(PlaybackError::EmptyLibrary);
        }
        let next = self.pick_next(tracks.len());
        self.bind_index(next, tracks);
        Ok(())
    }

    /// Step back one index, wrapping to the last track. Shuffle is ignored.
    pub fn prev_track(&mut self, tracks: &[Track]) -> Result<(), PlaybackError> {
        if self.state == PlaybackState::Empty || tracks.is_empty() {
            return Err(PlaybackError::EmptyLibrary);
        }
        let len = tracks.len();
        let prev = (self.current + len - 1) % len;
        self.bind_index(prev, tracks);
        Ok(())
    }

    /// Make `index` the current track, stopped.
    pub fn select(&mut self, index: usize, tracks: &[Track]) -> Result<(), PlaybackError> {
        if self.state == PlaybackState::Empty || tracks.is_empty() {
            return Err(PlaybackError::EmptyLibrary);
        }
        if index >= tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        self.bind_index(index, tracks);
        Ok(())
    }

    /// Set the stored volume. A non-zero value clears mute.
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.media.set_volume(self.volume.effective());
    }

    /// Nudge the stored volume by `delta`.
    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.volume.level() + delta);
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.media.set_volume(self.volume.effective());
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn cycle_repeat(&mut self) {
        self.repeat = self.repeat.cycle();
    }

    /// Seek to `ratio` of the track (clamped to `[0, 1]`), committed immediately.
    pub fn seek_to_ratio(&mut self, ratio: f64) {
        if self.subscription.is_none() {
            return;
        }
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        self.seek(self.duration.mul_f64(ratio));
    }

    /// Scrub by `secs` seconds, clamped to `[0, duration]`.
    pub fn seek_by(&mut self, secs: i64) {
        if self.subscription.is_none() {
            return;
        }
        let delta = Duration::from_secs(secs.unsigned_abs());
        let target = if secs >= 0 {
            self.position.saturating_add(delta)
        } else {
            self.position.saturating_sub(delta)
        };
        let target = if self.duration.is_zero() {
            target
        } else {
            target.min(self.duration)
        };
        self.seek(target);
    }

    /// Drain media notifications and apply them.
    pub fn poll_media(&mut self, tracks: &[Track]) {
        for notice in self.media.poll_events() {
            self.handle_media_notice(notice, tracks);
        }
    }

    /// Apply one lifecycle notification. Notices from an earlier binding are ignored.
    pub fn handle_media_notice(&mut self, notice: MediaNotice, tracks: &[Track]) {
        let current = self.subscription.as_ref().map(MediaSubscription::generation);
        if current != Some(notice.generation) {
            log::debug!(
                "playback: dropping stale {:?} from generation {}",
                notice.event,
                notice.generation
            );
            return;
        }

        match notice.event {
            MediaEvent::MetadataLoaded { duration } => {
                self.duration = duration;
            }
            MediaEvent::Position(p) => {
                self.position = p;
            }
            MediaEvent::Started => {
                if self.pending_play {
                    self.pending_play = false;
                    self.state = PlaybackState::Playing;
                } else if self.state != PlaybackState::Playing {
                    // Paused again before the media confirmed.
                    self.media.pause();
                }
            }
            MediaEvent::Ended => {
                if self.state != PlaybackState::Playing {
                    // Queued before a pause reached the media.
                    log::debug!("playback: ignoring end of stream while {:?}", self.state);
                    return;
                }
                self.state = PlaybackState::Ended;
                self.position = self.duration;
                self.resolve_end(tracks);
            }
            MediaEvent::Failed(reason) => {
                log::warn!("playback: media rejected playback: {reason}");
                self.pending_play = false;
                if self.state == PlaybackState::Playing {
                    self.state = PlaybackState::Idle;
                }
                self.last_error = Some(reason);
            }
        }
    }

    fn resolve_end(&mut self, tracks: &[Track]) {
        let len = tracks.len();
        if len == 0 {
            self.sync_with_library(tracks);
            return;
        }

        match self.repeat {
            RepeatMode::One => {
                self.state = PlaybackState::Idle;
                self.seek(Duration::ZERO);
                self.start_if_bound(tracks);
            }
            RepeatMode::All => {
                let next = self.pick_next(len);
                self.bind_index(next, tracks);
                self.start_if_bound(tracks);
            }
            RepeatMode::Off if self.shuffle || self.current + 1 < len => {
                let next = self.pick_next(len);
                self.bind_index(next, tracks);
                self.start_if_bound(tracks);
            }
            RepeatMode::Off => {
                log::info!("playback: reached the end of the library");
                self.state = PlaybackState::Idle;
                self.seek(Duration::ZERO);
            }
        }
    }

    fn pick_next(&mut self, len: usize) -> usize {
        if self.shuffle {
            self.rng.gen_range(0..len)
        } else {
            (self.current + 1) % len
        }
    }

    fn bind_index(&mut self, index: usize, tracks: &[Track]) {
        self.current = index;
        self.bind_current(tracks);
        self.state = PlaybackState::Idle;
    }

    /// Rebind the media handle to the current track, position 0.
    fn bind_current(&mut self, tracks: &[Track]) {
        self.release();
        let Some(track) = tracks.get(self.current) else {
            return;
        };
        self.current_id = Some(track.id);
        self.bound_source = track.audio.clone();
        if let Some(source) = &track.audio {
            self.subscription = Some(self.media.bind(source));
            log::debug!("playback: bound \"{}\"", track.title);
        }
    }

    /// Drop the current binding and reset position.
    fn release(&mut self) {
        if self.subscription.take().is_some() {
            self.media.unbind();
        }
        self.bound_source = None;
        self.pending_play = false;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
    }

    fn request_play(&mut self, tracks: &[Track]) -> Result<(), PlaybackError> {
        let track = tracks
            .get(self.current)
            .ok_or(PlaybackError::IndexOutOfBounds(self.current))?;
        if self.subscription.is_none() {
            return Err(PlaybackError::NoAudioSource(track.title.clone()));
        }
        self.media.play();
        self.pending_play = true;
        Ok(())
    }

    fn start_if_bound(&mut self, tracks: &[Track]) {
        if let Err(e) = self.request_play(tracks) {
            log::info!("playback: not auto-playing: {e}");
            self.last_error = Some(e.to_string());
        }
    }

    fn seek(&mut self, position: Duration) {
        self.media.seek(position);
        self.position = position;
    }
}
