//! smplayer - Simple Music Player core
//!
//! The coordination layer of a desktop music player: settings persistence,
//! the composition root that assembles the playback engine handle,
//! playlist, media library, equalizer and transport view-models, and the
//! routing of keyboard input to the active control surface.

pub mod audio;
pub mod config;
pub mod error;
pub mod state;
pub mod ui;

// Re-export key types for convenience
pub use {
    audio::{EngineError, EqualizerCapability, PlaybackState, PlayerEngine},
    config::{SettingsError, SettingsStore, SmpSettings},
    error::AppError,
    state::{CommandId, DispatchQueue, Dispatcher, Property, dispatch_channel},
    ui::{Key, MainWindowViewModel},
};
