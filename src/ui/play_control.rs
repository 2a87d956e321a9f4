//! Transport controls and their keyboard shortcuts.
//!
//! The `PlayControlViewModel` drives the engine from the playlist and is
//! the first handler offered every key press.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    audio::{EngineError, PlaybackState, PlayerEngine},
    config::SharedSettings,
    ui::{keys::Key, medialib::MedialibViewModel, playlists::PlaylistsViewModel},
};

/// Volume change per key press, in percent.
pub const VOLUME_STEP: f32 = 5.0;

/// Transport controls.
pub struct PlayControlViewModel {
    /// Engine being controlled.
    engine: Arc<PlayerEngine>,
    /// Settings document holding shuffle and repeat modes.
    settings: SharedSettings,
    /// Playlist the transport plays from.
    playlists: Arc<PlaylistsViewModel>,
    /// Library that can be queued into the playlist.
    medialib: Arc<MedialibViewModel>,
}

impl PlayControlViewModel {
    /// Creates the transport controls.
    #[must_use]
    pub fn new(
        engine: Arc<PlayerEngine>,
        settings: SharedSettings,
        playlists: Arc<PlaylistsViewModel>,
        medialib: Arc<MedialibViewModel>,
    ) -> Self {
        Self {
            engine,
            settings,
            playlists,
            medialib,
        }
    }

    /// Playlist the transport plays from.
    #[must_use]
    pub fn playlists(&self) -> &Arc<PlaylistsViewModel> {
        &self.playlists
    }

    /// Whether there is anything the transport can act on.
    #[must_use]
    pub fn can_play(&self) -> bool {
        self.engine.is_initialized() && !self.playlists.is_empty()
    }

    /// Toggles between playing and paused, starting the selection if stopped.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the engine rejects the transition.
    pub fn play_or_pause(&self) -> Result<(), EngineError> {
        match self.engine.playback_state() {
            PlaybackState::Playing => self.engine.pause(),
            PlaybackState::Paused => self.engine.play(),
            PlaybackState::Stopped => {
                if self.playlists.current_index().is_none() {
                    self.playlists.select_next();
                }
                self.play_current()
            }
        }
    }

    /// Plays the next playlist entry.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the entry cannot be loaded or played.
    pub fn play_next(&self) -> Result<(), EngineError> {
        match self.playlists.select_next() {
            Some(_) => self.play_current(),
            None => {
                debug!("PlayControl: end of playlist");
                self.engine.stop();
                Ok(())
            }
        }
    }

    /// Plays the previous playlist entry.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the entry cannot be loaded or played.
    pub fn play_previous(&self) -> Result<(), EngineError> {
        match self.playlists.select_previous() {
            Some(_) => self.play_current(),
            None => Ok(()),
        }
    }

    /// Appends every library file to the playlist.
    ///
    /// # Returns
    ///
    /// The number of files queued.
    pub fn queue_library(&self) -> usize {
        let files = self.medialib.media_files();
        let count = files.len();
        self.playlists.add_files(files);
        count
    }

    /// Flips shuffle mode.
    pub fn toggle_shuffle(&self) -> bool {
        let mut settings = self.settings.write();
        settings.player_settings.shuffle_mode = !settings.player_settings.shuffle_mode;
        settings.player_settings.shuffle_mode
    }

    /// Flips repeat mode.
    pub fn toggle_repeat(&self) -> bool {
        let mut settings = self.settings.write();
        settings.player_settings.repeat_mode = !settings.player_settings.repeat_mode;
        settings.player_settings.repeat_mode
    }

    /// Flips mute.
    pub fn toggle_mute(&self) -> bool {
        let mute = !self.engine.is_muted();
        self.engine.set_mute(mute);
        mute
    }

    /// Changes the volume by `delta` percent.
    pub fn change_volume(&self, delta: f32) {
        self.engine.set_volume(self.engine.volume() + delta);
    }

    /// Handles a transport shortcut.
    ///
    /// # Returns
    ///
    /// `true` if the key was claimed. Keys whose action is currently not
    /// executable are left for other handlers.
    pub fn handle_key_down(&self, key: Key) -> bool {
        let result = match key {
            Key::Space if self.can_play() => self.play_or_pause(),
            Key::Right if self.can_play() => self.play_next(),
            Key::Left if self.can_play() => self.play_previous(),
            Key::Up if self.engine.is_initialized() => {
                self.change_volume(VOLUME_STEP);
                Ok(())
            }
            Key::Down if self.engine.is_initialized() => {
                self.change_volume(-VOLUME_STEP);
                Ok(())
            }
            key if key.is_char('s') => {
                self.toggle_shuffle();
                Ok(())
            }
            key if key.is_char('r') => {
                self.toggle_repeat();
                Ok(())
            }
            key if key.is_char('m') && self.engine.is_initialized() => {
                self.toggle_mute();
                Ok(())
            }
            _ => return false,
        };

        if let Err(e) = result {
            warn!("PlayControl: {:?} failed: {}", key, e);
        }
        true
    }

    fn play_current(&self) -> Result<(), EngineError> {
        let track = self
            .playlists
            .current_track()
            .ok_or(EngineError::NoTrackLoaded)?;
        self.engine.load(track)?;
        self.engine.play()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        audio::{PlaybackState, PlayerEngine},
        config::SmpSettings,
        state::dispatch_channel,
        ui::{
            keys::Key,
            medialib::{MediaFile, MedialibViewModel},
            play_control::PlayControlViewModel,
            playlists::PlaylistsViewModel,
        },
    };

    fn play_control(initialize: bool, tracks: usize) -> (PlayControlViewModel, Arc<PlayerEngine>) {
        let (dispatcher, _queue) = dispatch_channel();
        let settings = SmpSettings::default().into_shared();
        let engine = Arc::new(PlayerEngine::new());
        engine
            .configure(dispatcher.clone(), Arc::clone(&settings))
            .unwrap();
        if initialize {
            engine.initialize().unwrap();
        }

        let playlists = Arc::new(PlaylistsViewModel::new(Arc::clone(&settings)));
        playlists.add_files((0..tracks).map(|i| MediaFile::from_path(&format!("/t{i}.flac"))));
        let medialib = Arc::new(MedialibViewModel::new(dispatcher, Arc::clone(&settings)));

        let control = PlayControlViewModel::new(Arc::clone(&engine), settings, playlists, medialib);
        (control, engine)
    }

    #[test]
    fn test_space_toggles_playback() {
        let (control, engine) = play_control(true, 2);

        assert!(control.handle_key_down(Key::Space));
        assert_eq!(engine.playback_state(), PlaybackState::Playing);
        assert_eq!(engine.current_track().unwrap().path, "/t0.flac");

        assert!(control.handle_key_down(Key::Space));
        assert_eq!(engine.playback_state(), PlaybackState::Paused);
    }

    #[test]
    fn test_transport_keys_not_claimed_when_nothing_to_play() {
        let (control, _engine) = play_control(true, 0);
        assert!(!control.handle_key_down(Key::Space));
        assert!(!control.handle_key_down(Key::Right));

        let (control, _engine) = play_control(false, 2);
        assert!(!control.handle_key_down(Key::Space));
        assert!(!control.handle_key_down(Key::Up));
        assert!(!control.handle_key_down(Key::Char('m')));
    }

    #[test]
    fn test_next_and_previous() {
        let (control, engine) = play_control(true, 3);
        control.play_next().unwrap();
        control.play_next().unwrap();
        assert_eq!(engine.current_track().unwrap().path, "/t1.flac");

        assert!(control.handle_key_down(Key::Left));
        assert_eq!(engine.current_track().unwrap().path, "/t0.flac");
        assert_eq!(engine.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn test_end_of_playlist_stops() {
        let (control, engine) = play_control(true, 1);
        control.play_next().unwrap();
        control.play_next().unwrap();
        assert_eq!(engine.playback_state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_mode_toggles() {
        let (control, engine) = play_control(true, 0);

        assert!(control.handle_key_down(Key::Char('S')));
        assert!(control.handle_key_down(Key::Char('r')));
        assert!(control.handle_key_down(Key::Char('m')));
        assert!(engine.is_muted());
        assert!(!control.toggle_shuffle());
        assert!(!control.toggle_repeat());

        assert!(control.handle_key_down(Key::Down));
        assert_eq!(engine.volume(), 95.0);
    }

    #[test]
    fn test_unrelated_key_is_not_claimed() {
        let (control, _engine) = play_control(true, 2);
        assert!(!control.handle_key_down(Key::Char('e')));
        assert!(!control.handle_key_down(Key::Escape));
    }

    #[test]
    fn test_queue_library() {
        let (control, _engine) = play_control(true, 0);
        control.medialib.add_media_files(["/lib/a.mp3", "/lib/b.ogg"]);
        assert_eq!(control.queue_library(), 2);
        assert_eq!(control.playlists().len(), 2);
    }
}
