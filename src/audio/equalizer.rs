//! Equalizer capability exposed by the playback engine.
//!
//! The engine owns its equalizer. Consumers only ever see an `EqualizerRef`,
//! a non-owning handle that stops resolving once the engine lets go of the
//! capability object.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, Ordering::SeqCst},
    },
};

use {parking_lot::RwLock, tracing::debug};

use crate::config::{EqualizerBandSettings, SharedSettings};

/// Maximum boost or cut of a single band, in dB.
pub const MAX_BAND_GAIN_DB: f32 = 12.0;

/// A single equalizer band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualizerBand {
    /// Center frequency in Hz.
    pub frequency: f32,
    /// Gain in dB, within `±MAX_BAND_GAIN_DB`.
    pub gain: f32,
}

impl From<EqualizerBandSettings> for EqualizerBand {
    fn from(settings: EqualizerBandSettings) -> Self {
        Self {
            frequency: settings.frequency,
            gain: settings.gain.clamp(-MAX_BAND_GAIN_DB, MAX_BAND_GAIN_DB),
        }
    }
}

impl From<EqualizerBand> for EqualizerBandSettings {
    fn from(band: EqualizerBand) -> Self {
        Self {
            frequency: band.frequency,
            gain: band.gain,
        }
    }
}

/// Operations the presentation layer may perform on the engine's equalizer.
pub trait EqualizerCapability: Send + Sync {
    /// Whether the equalizer is currently applied to the output.
    fn is_enabled(&self) -> bool;

    /// Enables or bypasses the equalizer.
    fn set_enabled(&self, enabled: bool);

    /// Current band layout and gains.
    fn bands(&self) -> Vec<EqualizerBand>;

    /// Sets one band's gain, clamped to `±MAX_BAND_GAIN_DB`.
    ///
    /// # Returns
    ///
    /// `false` if `index` is out of range.
    fn set_band_gain(&self, index: usize, gain: f32) -> bool;

    /// Writes the current state into the settings document.
    fn save_equalizer_settings(&self);
}

/// Equalizer backed by the shared settings document.
pub struct Equalizer {
    /// Settings document the state is persisted into.
    settings: SharedSettings,
    /// Whether the equalizer is applied.
    enabled: AtomicBool,
    /// Current bands.
    bands: RwLock<Vec<EqualizerBand>>,
}

impl Equalizer {
    /// Creates an equalizer from the persisted equalizer section.
    ///
    /// # Arguments
    ///
    /// * `settings` - Shared settings document to read from and save into.
    #[must_use]
    pub fn from_settings(settings: SharedSettings) -> Self {
        let (enabled, bands) = {
            let guard = settings.read();
            let section = &guard.player_settings.equalizer;
            let bands = section
                .bands
                .iter()
                .copied()
                .map(EqualizerBand::from)
                .collect::<Vec<_>>();
            (section.enabled, bands)
        };
        debug!(
            "Equalizer: restored {} band(s), enabled: {}",
            bands.len(),
            enabled
        );

        Self {
            settings,
            enabled: AtomicBool::new(enabled),
            bands: RwLock::new(bands),
        }
    }
}

impl EqualizerCapability for Equalizer {
    fn is_enabled(&self) -> bool {
        self.enabled.load(SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, SeqCst);
    }

    fn bands(&self) -> Vec<EqualizerBand> {
        self.bands.read().clone()
    }

    fn set_band_gain(&self, index: usize, gain: f32) -> bool {
        match self.bands.write().get_mut(index) {
            Some(band) => {
                band.gain = gain.clamp(-MAX_BAND_GAIN_DB, MAX_BAND_GAIN_DB);
                true
            }
            None => false,
        }
    }

    fn save_equalizer_settings(&self) {
        let bands: Vec<EqualizerBandSettings> =
            self.bands.read().iter().copied().map(Into::into).collect();
        let mut settings = self.settings.write();
        let section = &mut settings.player_settings.equalizer;
        section.enabled = self.is_enabled();
        section.bands = bands;
        debug!("Equalizer: saved settings, enabled: {}", section.enabled);
    }
}

impl Debug for Equalizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Equalizer")
            .field("enabled", &self.is_enabled())
            .field("bands", &*self.bands.read())
            .finish()
    }
}

/// Non-owning reference to an equalizer capability.
///
/// Holding an `EqualizerRef` never extends the capability's lifetime; every
/// access goes through `upgrade`, which fails once the owner has dropped it.
#[derive(Clone)]
pub struct EqualizerRef {
    inner: Weak<dyn EqualizerCapability>,
}

impl EqualizerRef {
    /// Creates a non-owning reference to `capability`.
    #[must_use]
    pub fn new(capability: &Arc<dyn EqualizerCapability>) -> Self {
        Self {
            inner: Arc::downgrade(capability),
        }
    }

    /// Temporarily resolves the capability.
    #[must_use]
    pub fn upgrade(&self) -> Option<Arc<dyn EqualizerCapability>> {
        self.inner.upgrade()
    }

    /// Whether this refers to the same capability object as `capability`.
    #[must_use]
    pub fn refers_to(&self, capability: &Arc<dyn EqualizerCapability>) -> bool {
        Weak::ptr_eq(&self.inner, &Arc::downgrade(capability))
    }
}

impl Debug for EqualizerRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("EqualizerRef")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
