//! Equalizer panel view-model.
//!
//! The panel borrows the engine's equalizer through an `EqualizerRef` and
//! never owns it. Detaching drops the reference; the equalizer itself lives
//! on in the engine.

use std::sync::Arc;

use {parking_lot::RwLock, tracing::debug};

use crate::audio::{EqualizerBand, EqualizerCapability, EqualizerRef};

/// Presentation of the open equalizer panel.
#[derive(Debug)]
pub struct EqualizerViewModel {
    /// Borrowed equalizer, cleared when the panel closes.
    equalizer: RwLock<Option<EqualizerRef>>,
}

impl EqualizerViewModel {
    /// Creates a panel over the engine's equalizer.
    #[must_use]
    pub fn new(equalizer: EqualizerRef) -> Self {
        Self {
            equalizer: RwLock::new(Some(equalizer)),
        }
    }

    /// The borrowed reference, if still attached.
    #[must_use]
    pub fn equalizer_ref(&self) -> Option<EqualizerRef> {
        self.equalizer.read().clone()
    }

    /// Resolves the borrowed equalizer for a single operation.
    #[must_use]
    pub fn equalizer(&self) -> Option<Arc<dyn EqualizerCapability>> {
        self.equalizer
            .read()
            .as_ref()
            .and_then(EqualizerRef::upgrade)
    }

    /// Drops the borrowed reference.
    pub fn detach(&self) {
        if self.equalizer.write().take().is_some() {
            debug!("EqualizerViewModel: detached from engine equalizer");
        }
    }

    /// Whether the equalizer is applied; `false` once detached.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.equalizer()
            .is_some_and(|equalizer| equalizer.is_enabled())
    }

    /// Enables or bypasses the equalizer.
    pub fn set_enabled(&self, enabled: bool) {
        if let Some(equalizer) = self.equalizer() {
            equalizer.set_enabled(enabled);
        }
    }

    /// Current bands; empty once detached.
    #[must_use]
    pub fn bands(&self) -> Vec<EqualizerBand> {
        self.equalizer()
            .map(|equalizer| equalizer.bands())
            .unwrap_or_default()
    }

    /// Sets one band's gain.
    ///
    /// # Returns
    ///
    /// `false` if detached or `index` is out of range.
    pub fn set_band_gain(&self, index: usize, gain: f32) -> bool {
        self.equalizer()
            .is_some_and(|equalizer| equalizer.set_band_gain(index, gain))
    }

    /// Flattens every band to 0 dB.
    pub fn reset_bands(&self) {
        let Some(equalizer) = self.equalizer() else {
            return;
        };
        for index in 0..equalizer.bands().len() {
            equalizer.set_band_gain(index, 0.0);
        }
    }
}
