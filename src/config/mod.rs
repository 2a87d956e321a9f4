//! Settings document schema and persistence.
//!
//! This module provides the JSON settings document with XDG Base Directory
//! compliance and the store used to load and save it.

pub mod settings;

pub use settings::{
    EqualizerBandSettings, EqualizerSettings, MainSettings, MedialibSettings, PlayerSettings,
    PlaylistSettings, SettingsError, SettingsStore, SharedSettings, SmpSettings, WindowPlacement,
    MAX_VOLUME, get_config_path,
};
