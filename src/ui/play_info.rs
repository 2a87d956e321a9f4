//! Now-playing information view-model.
//!
//! Follows the engine through its event stream. Events reach the view-model
//! only after the owner thread drains the dispatch queue the engine was
//! configured with, so the cached state is never touched from elsewhere.

use {async_channel::Receiver, parking_lot::RwLock, tracing::debug};

use crate::audio::{EngineEvent, PlaybackState, PlayerEngine, TrackInfo};

/// Last known engine state as seen through its events.
#[derive(Debug, Clone, Default)]
struct NowPlaying {
    track: Option<TrackInfo>,
    playback_state: PlaybackState,
    volume: f32,
    mute: bool,
}

/// Presentation of the currently loaded track.
#[derive(Debug)]
pub struct PlayInfoViewModel {
    /// Engine events, delivered through the dispatch context.
    events: Receiver<EngineEvent>,
    /// State rebuilt from the events.
    now_playing: RwLock<NowPlaying>,
}

impl PlayInfoViewModel {
    /// Creates the view-model from the engine's current state and
    /// subscribes to its changes.
    #[must_use]
    pub fn new(engine: &PlayerEngine) -> Self {
        let now_playing = NowPlaying {
            track: engine.current_track(),
            playback_state: engine.playback_state(),
            volume: engine.volume(),
            mute: engine.is_muted(),
        };
        Self {
            events: engine.subscribe(),
            now_playing: RwLock::new(now_playing),
        }
    }

    /// Applies every engine event delivered so far.
    ///
    /// # Returns
    ///
    /// The number of events applied.
    pub fn apply_pending_events(&self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
            count += 1;
        }
        count
    }

    /// The loaded track.
    #[must_use]
    pub fn current_track(&self) -> Option<TrackInfo> {
        self.now_playing.read().track.clone()
    }

    /// Current transport state.
    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        self.now_playing.read().playback_state
    }

    /// Volume in percent.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.now_playing.read().volume
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.now_playing.read().mute
    }

    /// One-line status text, e.g. `"Playing: Title"`.
    #[must_use]
    pub fn status_line(&self) -> String {
        match (self.playback_state(), self.current_track()) {
            (_, None) => "No track loaded".to_string(),
            (PlaybackState::Playing, Some(track)) => format!("Playing: {}", track.title),
            (PlaybackState::Paused, Some(track)) => format!("Paused: {}", track.title),
            (PlaybackState::Stopped, Some(track)) => format!("Stopped: {}", track.title),
        }
    }

    fn apply(&self, event: EngineEvent) {
        debug!("PlayInfoViewModel: {:?}", event);
        let mut now_playing = self.now_playing.write();
        match event {
            EngineEvent::PlaybackStateChanged(state) => now_playing.playback_state = state,
            EngineEvent::TrackChanged(track) => now_playing.track = track,
            EngineEvent::VolumeChanged { volume, mute } => {
                now_playing.volume = volume;
                now_playing.mute = mute;
            }
        }
    }
}
