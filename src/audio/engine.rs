//! Playback engine handle.
//!
//! This module provides the `PlayerEngine` that the composition root
//! constructs once and shares with every consumer. It tracks transport
//! state, owns the equalizer capability, and reports state changes through
//! the dispatch context it was configured with.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering::SeqCst},
};

use {
    async_channel::{Receiver, Sender, unbounded},
    parking_lot::RwLock,
    serde::{Deserialize, Serialize},
    thiserror::Error,
    tracing::{debug, info},
};

use crate::{
    audio::equalizer::{Equalizer, EqualizerCapability, EqualizerRef},
    config::{MAX_VOLUME, SharedSettings},
    state::Dispatcher,
};

/// Current playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing is playing.
    #[default]
    Stopped,
    /// Track is currently playing.
    Playing,
    /// Track is paused.
    Paused,
}

/// Information about the currently loaded track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Path to the audio file.
    pub path: String,
    /// Display title.
    pub title: String,
}

/// Engine change notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Transport state changed.
    PlaybackStateChanged(PlaybackState),
    /// A different track was loaded.
    TrackChanged(Option<TrackInfo>),
    /// Volume or mute changed.
    VolumeChanged { volume: f32, mute: bool },
}

/// Error type for engine operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// `configure` was called a second time.
    #[error("Engine is already configured")]
    AlreadyConfigured,
    /// The operation needs `configure` first.
    #[error("Engine is not configured")]
    NotConfigured,
    /// `initialize` was called a second time.
    #[error("Engine is already initialized")]
    AlreadyInitialized,
    /// The operation needs `initialize` first.
    #[error("Engine is not initialized")]
    NotInitialized,
    /// Track not found or not loaded.
    #[error("No track loaded")]
    NoTrackLoaded,
    /// Invalid operation for current state.
    #[error("Invalid operation: {reason}")]
    InvalidOperation { reason: String },
}

/// Dependencies supplied by `configure`.
struct EngineConfig {
    dispatcher: Dispatcher,
    settings: SharedSettings,
}

/// Playback engine handle shared by the coordinator and its children.
///
/// Exactly one instance is expected per process; it is created by the
/// composition root and handed out as `Arc<PlayerEngine>`.
#[derive(Default)]
pub struct PlayerEngine {
    /// Dispatcher and settings, present once configured.
    config: RwLock<Option<EngineConfig>>,
    /// Whether the engine finished initialization.
    initialized: AtomicBool,
    /// Equalizer owned by the engine, present once initialized.
    equalizer: RwLock<Option<Arc<dyn EqualizerCapability>>>,
    /// Current playback state.
    state: RwLock<PlaybackState>,
    /// Currently loaded track.
    current_track: RwLock<Option<TrackInfo>>,
    /// Subscribers for manual broadcast fan-out.
    subscribers: Arc<RwLock<Vec<Sender<EngineEvent>>>>,
}

impl PlayerEngine {
    /// Creates an unconfigured engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the dispatch context and settings document.
    ///
    /// Must be called exactly once per engine.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::AlreadyConfigured` on a second call.
    pub fn configure(
        &self,
        dispatcher: Dispatcher,
        settings: SharedSettings,
    ) -> Result<(), EngineError> {
        let mut config = self.config.write();
        if config.is_some() {
            return Err(EngineError::AlreadyConfigured);
        }
        *config = Some(EngineConfig {
            dispatcher,
            settings,
        });
        debug!("PlayerEngine: configured");
        Ok(())
    }

    /// Whether `configure` has been called.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.read().is_some()
    }

    /// Initializes the engine with an equalizer restored from settings.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the engine is unconfigured or already initialized.
    pub fn initialize(&self) -> Result<(), EngineError> {
        let settings = self.settings().ok_or(EngineError::NotConfigured)?;
        self.initialize_with_equalizer(Arc::new(Equalizer::from_settings(settings)))
    }

    /// Initializes the engine with a caller-supplied equalizer.
    ///
    /// # Arguments
    ///
    /// * `equalizer` - Capability the engine takes ownership of.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the engine is unconfigured or already initialized.
    pub fn initialize_with_equalizer(
        &self,
        equalizer: Arc<dyn EqualizerCapability>,
    ) -> Result<(), EngineError> {
        if !self.is_configured() {
            return Err(EngineError::NotConfigured);
        }
        if self.is_initialized() {
            return Err(EngineError::AlreadyInitialized);
        }

        *self.equalizer.write() = Some(equalizer);
        self.initialized.store(true, SeqCst);
        info!("PlayerEngine: initialized");
        Ok(())
    }

    /// Whether the engine is ready for playback.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(SeqCst)
    }

    /// Non-owning reference to the engine's equalizer.
    ///
    /// # Returns
    ///
    /// `None` until the engine is initialized.
    #[must_use]
    pub fn equalizer(&self) -> Option<EqualizerRef> {
        self.equalizer.read().as_ref().map(EqualizerRef::new)
    }

    /// Stops playback and releases the equalizer.
    ///
    /// Close any equalizer panel before calling this: outstanding
    /// `EqualizerRef`s stop resolving afterwards. An enabled equalizer
    /// writes its state into the settings document before it is released.
    pub fn shutdown(&self) {
        self.stop();
        if let Some(equalizer) = self.equalizer.write().take()
            && equalizer.is_enabled()
        {
            equalizer.save_equalizer_settings();
        }
        self.initialized.store(false, SeqCst);
        info!("PlayerEngine: shut down");
    }

    /// Loads a track without starting playback.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotInitialized` before initialization.
    pub fn load(&self, track: TrackInfo) -> Result<(), EngineError> {
        if !self.is_initialized() {
            return Err(EngineError::NotInitialized);
        }

        debug!("PlayerEngine: loading {}", track.path);
        *self.current_track.write() = Some(track.clone());
        self.set_state(PlaybackState::Stopped);
        self.notify(EngineEvent::TrackChanged(Some(track)));
        Ok(())
    }

    /// Starts or resumes playback of the loaded track.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if uninitialized or no track is loaded.
    pub fn play(&self) -> Result<(), EngineError> {
        if !self.is_initialized() {
            return Err(EngineError::NotInitialized);
        }
        if self.current_track.read().is_none() {
            return Err(EngineError::NoTrackLoaded);
        }

        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// Pauses playback.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidOperation` if nothing is playing.
    pub fn pause(&self) -> Result<(), EngineError> {
        if self.playback_state() != PlaybackState::Playing {
            return Err(EngineError::InvalidOperation {
                reason: "Cannot pause when not playing".to_string(),
            });
        }

        self.set_state(PlaybackState::Paused);
        Ok(())
    }

    /// Stops playback, keeping the loaded track.
    pub fn stop(&self) {
        self.set_state(PlaybackState::Stopped);
    }

    /// Gets the current playback state.
    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        *self.state.read()
    }

    /// Gets the loaded track.
    #[must_use]
    pub fn current_track(&self) -> Option<TrackInfo> {
        self.current_track.read().clone()
    }

    /// Current volume in percent, or full volume when unconfigured.
    #[must_use]
    pub fn volume(&self) -> f32 {
        let Some(settings) = self.settings() else {
            return MAX_VOLUME;
        };
        settings.read().player_settings.volume
    }

    /// Sets the volume, clamped to `0..=MAX_VOLUME`, and records it in the
    /// settings.
    pub fn set_volume(&self, volume: f32) {
        let Some(settings) = self.settings() else {
            return;
        };

        let volume = volume.clamp(0.0, MAX_VOLUME);
        let mute = {
            let mut settings = settings.write();
            settings.player_settings.volume = volume;
            settings.player_settings.mute
        };
        self.notify(EngineEvent::VolumeChanged { volume, mute });
    }

    /// Whether output is muted.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.settings()
            .is_some_and(|settings| settings.read().player_settings.mute)
    }

    /// Mutes or unmutes output and records it in the settings.
    pub fn set_mute(&self, mute: bool) {
        let Some(settings) = self.settings() else {
            return;
        };

        let volume = {
            let mut settings = settings.write();
            settings.player_settings.mute = mute;
            settings.player_settings.volume
        };
        self.notify(EngineEvent::VolumeChanged { volume, mute });
    }

    /// Subscribes to engine change events.
    ///
    /// Events are delivered when the owner thread drains its dispatch queue.
    pub fn subscribe(&self) -> Receiver<EngineEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.write().push(tx);
        rx
    }

    fn settings(&self) -> Option<SharedSettings> {
        self.config
            .read()
            .as_ref()
            .map(|config| Arc::clone(&config.settings))
    }

    fn set_state(&self, state: PlaybackState) {
        let previous = std::mem::replace(&mut *self.state.write(), state);
        if previous != state {
            debug!("PlayerEngine: {:?} -> {:?}", previous, state);
            self.notify(EngineEvent::PlaybackStateChanged(state));
        }
    }

    /// Marshals an event onto the dispatcher's thread before fan-out.
    fn notify(&self, event: EngineEvent) {
        let config = self.config.read();
        let Some(config) = config.as_ref() else {
            return;
        };

        let subscribers = Arc::clone(&self.subscribers);
        config.dispatcher.post(move || {
            subscribers
                .write()
                .retain(|tx| tx.try_send(event.clone()).is_ok());
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        audio::engine::{EngineError, EngineEvent, PlaybackState, PlayerEngine, TrackInfo},
        config::SmpSettings,
        state::{DispatchQueue, dispatch_channel},
    };

    fn configured_engine() -> (PlayerEngine, DispatchQueue) {
        let (dispatcher, queue) = dispatch_channel();
        let engine = PlayerEngine::new();
        engine
            .configure(dispatcher, SmpSettings::default().into_shared())
            .unwrap();
        (engine, queue)
    }

    fn track() -> TrackInfo {
        TrackInfo {
            path: "/music/track.flac".to_string(),
            title: "Track".to_string(),
        }
    }

    #[test]
    fn test_configure_only_once() {
        let (engine, _queue) = configured_engine();
        let (dispatcher, _other) = dispatch_channel();

        assert_eq!(
            engine.configure(dispatcher, SmpSettings::default().into_shared()),
            Err(EngineError::AlreadyConfigured)
        );
    }

    #[test]
    fn test_initialize_requires_configuration() {
        let engine = PlayerEngine::new();
        assert_eq!(engine.initialize(), Err(EngineError::NotConfigured));
        assert!(!engine.is_initialized());
        assert!(engine.equalizer().is_none());
    }

    #[test]
    fn test_initialize_exposes_equalizer() {
        let (engine, _queue) = configured_engine();
        engine.initialize().unwrap();

        assert!(engine.is_initialized());
        let equalizer = engine.equalizer().unwrap().upgrade().unwrap();
        assert_eq!(equalizer.bands().len(), 10);
        assert_eq!(engine.initialize(), Err(EngineError::AlreadyInitialized));
    }

    #[test]
    fn test_shutdown_invalidates_equalizer_refs() {
        let (engine, _queue) = configured_engine();
        engine.initialize().unwrap();
        let reference = engine.equalizer().unwrap();

        engine.shutdown();
        assert!(!engine.is_initialized());
        assert!(reference.upgrade().is_none());
    }

    #[test]
    fn test_shutdown_persists_enabled_equalizer() {
        let (dispatcher, _queue) = dispatch_channel();
        let settings = SmpSettings::default().into_shared();
        let engine = PlayerEngine::new();
        engine.configure(dispatcher, Arc::clone(&settings)).unwrap();
        engine.initialize().unwrap();

        let equalizer = engine.equalizer().unwrap().upgrade().unwrap();
        equalizer.set_enabled(true);
        equalizer.set_band_gain(1, 3.0);
        drop(equalizer);

        engine.shutdown();
        let saved = settings.read().player_settings.equalizer.clone();
        assert!(saved.enabled);
        assert_eq!(saved.bands[1].gain, 3.0);
    }

    #[test]
    fn test_transport_state_transitions() {
        let (engine, _queue) = configured_engine();
        assert_eq!(engine.load(track()), Err(EngineError::NotInitialized));

        engine.initialize().unwrap();
        assert_eq!(engine.play(), Err(EngineError::NoTrackLoaded));
        assert!(engine.pause().is_err());

        engine.load(track()).unwrap();
        engine.play().unwrap();
        assert_eq!(engine.playback_state(), PlaybackState::Playing);
        engine.pause().unwrap();
        assert_eq!(engine.playback_state(), PlaybackState::Paused);
        engine.stop();
        assert_eq!(engine.playback_state(), PlaybackState::Stopped);
        assert_eq!(engine.current_track(), Some(track()));
    }

    #[test]
    fn test_volume_is_clamped_and_persisted() {
        let (dispatcher, _queue) = dispatch_channel();
        let settings = SmpSettings::default().into_shared();
        let engine = PlayerEngine::new();
        engine.configure(dispatcher, Arc::clone(&settings)).unwrap();

        engine.set_volume(150.0);
        assert_eq!(engine.volume(), 100.0);
        engine.set_volume(-1.0);
        assert_eq!(settings.read().player_settings.volume, 0.0);

        engine.set_mute(true);
        assert!(engine.is_muted());
        assert!(settings.read().player_settings.mute);
    }

    #[test]
    fn test_events_are_delivered_through_dispatcher() {
        let (engine, queue) = configured_engine();
        let events = engine.subscribe();
        engine.initialize().unwrap();
        engine.load(track()).unwrap();
        engine.play().unwrap();

        // Nothing reaches subscribers until the owner thread drains the queue
        assert!(events.is_empty());
        queue.run_pending();

        assert_eq!(
            events.try_recv().unwrap(),
            EngineEvent::TrackChanged(Some(track()))
        );
        assert_eq!(
            events.try_recv().unwrap(),
            EngineEvent::PlaybackStateChanged(PlaybackState::Playing)
        );
        assert!(events.try_recv().is_err());
    }
}
