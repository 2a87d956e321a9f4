//! Settings document persistence with XDG Base Directory compliance.
//!
//! This module defines the serialized settings schema shared by every
//! component of the player and the `SettingsStore` that reads and writes
//! it as a single JSON document.

use std::{
    env::var,
    fs::{create_dir_all, read_to_string, rename, write},
    io::Error as StdError,
    path::{Path, PathBuf},
    sync::Arc,
};

use {
    parking_lot::RwLock,
    serde::{Deserialize, Serialize},
    serde_json::{Error as SerdeJsonError, from_str, to_string_pretty},
    thiserror::Error,
    tracing::{debug, info},
};

/// Settings document shared between the coordinator and its children.
pub type SharedSettings = Arc<RwLock<SmpSettings>>;

/// Highest accepted output volume, in percent.
pub const MAX_VOLUME: f32 = 100.0;

/// Center frequencies (Hz) of the default ten-band equalizer.
pub const DEFAULT_EQUALIZER_FREQUENCIES: [f32; 10] = [
    32.0, 64.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
];

/// Error type for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read or write settings file.
    #[error("IO error: {0}")]
    IoError(#[from] StdError),
    /// Failed to serialize or deserialize settings.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] SerdeJsonError),
    /// Invalid settings value.
    #[error("Invalid settings value: {reason}")]
    InvalidValue { reason: String },
}

/// Root of the persisted settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmpSettings {
    /// Main window settings.
    pub main_settings: MainSettings,
    /// Playback engine configuration.
    pub player_settings: PlayerSettings,
    /// Media library configuration.
    pub medialib: MedialibSettings,
    /// Last playlist state.
    pub playlist: PlaylistSettings,
}

impl SmpSettings {
    /// Wraps the document for sharing with child components.
    #[must_use]
    pub fn into_shared(self) -> SharedSettings {
        Arc::new(RwLock::new(self))
    }

    /// Checks values the schema alone cannot constrain.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidValue` if the volume is outside
    /// `0..=MAX_VOLUME`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let volume = self.player_settings.volume;
        if !(0.0..=MAX_VOLUME).contains(&volume) {
            return Err(SettingsError::InvalidValue {
                reason: format!("volume {volume} is outside 0-{MAX_VOLUME}"),
            });
        }
        Ok(())
    }
}

/// Main window settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainSettings {
    /// Last known window placement, if the window was ever closed normally.
    pub placement: Option<WindowPlacement>,
}

/// Position and size of the main window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowPlacement {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    pub maximized: bool,
}

/// Playback engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Output volume in percent (0-100).
    pub volume: f32,
    /// Whether output is muted.
    pub mute: bool,
    /// Whether playlist order is shuffled.
    pub shuffle_mode: bool,
    /// Whether the playlist wraps around at its end.
    pub repeat_mode: bool,
    /// Equalizer state.
    pub equalizer: EqualizerSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            volume: 100.0,
            mute: false,
            shuffle_mode: false,
            repeat_mode: false,
            equalizer: EqualizerSettings::default(),
        }
    }
}

/// Persisted equalizer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualizerSettings {
    pub enabled: bool,
    pub name: String,
    pub bands: Vec<EqualizerBandSettings>,
}

impl Default for EqualizerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            name: "Default".to_string(),
            bands: DEFAULT_EQUALIZER_FREQUENCIES
                .iter()
                .map(|&frequency| EqualizerBandSettings {
                    frequency,
                    gain: 0.0,
                })
                .collect(),
        }
    }
}

/// A single persisted equalizer band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EqualizerBandSettings {
    /// Center frequency in Hz.
    pub frequency: f32,
    /// Gain in dB.
    pub gain: f32,
}

/// Media library configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedialibSettings {
    /// Directories the library was built from.
    pub directories: Vec<String>,
    /// Accepted file extensions, lowercase and without the dot.
    pub extensions: Vec<String>,
}

impl Default for MedialibSettings {
    fn default() -> Self {
        Self {
            directories: vec![],
            extensions: ["mp3", "flac", "ogg", "wav", "wma", "m4a"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Last playlist state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// Playlist entries in order.
    pub files: Vec<String>,
    /// Index of the selected entry.
    pub current_index: Option<usize>,
}

/// Reads and writes the settings document at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// Path to the settings file on disk.
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore {
    /// Creates a store for the default XDG settings path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_path(get_config_path())
    }

    /// Creates a store with a custom settings path (for testing).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Gets the settings file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the settings document.
    ///
    /// A missing file yields the default document. An existing file that
    /// cannot be read or parsed is an error; it never falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the file exists but cannot be read or
    /// parsed, or holds an out-of-range value.
    pub fn load(&self) -> Result<SmpSettings, SettingsError> {
        if !self.path.exists() {
            debug!("No settings file at {:?}, using defaults", self.path);
            return Ok(SmpSettings::default());
        }

        debug!("Loading settings from {:?}", self.path);
        let contents = read_to_string(&self.path)?;
        let settings: SmpSettings = from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Saves the settings document, replacing the file in full.
    ///
    /// The document is written to a sibling temp file first and then renamed
    /// over the target, so an interrupted write leaves the previous file intact.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if serialization or any filesystem step fails.
    pub fn save(&self, settings: &SmpSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)?;
        }

        let contents = to_string_pretty(settings)?;
        let temp_path = self.path.with_extension("json.tmp");
        write(&temp_path, contents)?;
        rename(&temp_path, &self.path)?;

        info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

/// Ensures proper XDG directory usage for the settings file.
///
/// # Returns
///
/// The path to the settings file.
#[must_use]
pub fn get_config_path() -> PathBuf {
    let mut config_dir = get_xdg_config_home();
    config_dir.push("smplayer");
    config_dir.push("settings.json");
    config_dir
}

/// Gets the XDG config home directory following XDG Base Directory specification.
///
/// Uses `XDG_CONFIG_HOME` environment variable if set, otherwise defaults to $HOME/.config
fn get_xdg_config_home() -> PathBuf {
    if let Ok(config_home) = var("XDG_CONFIG_HOME")
        && !config_home.is_empty()
    {
        return PathBuf::from(config_home);
    }

    if let Ok(home) = var("HOME") {
        let mut path = PathBuf::from(home);
        path.push(".config");
        return path;
    }

    PathBuf::from(".")
}
