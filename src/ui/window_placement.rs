//! Main window placement backed by the settings document.

use tracing::debug;

use crate::config::{SharedSettings, WindowPlacement};

/// Smallest window size that is restored as-is.
const MIN_WIDTH: u32 = 320;
const MIN_HEIGHT: u32 = 240;

/// Reads and records the main window's placement.
#[derive(Debug)]
pub struct WindowPlacementSettings {
    /// Settings document the placement lives in.
    settings: SharedSettings,
}

impl WindowPlacementSettings {
    /// Creates placement settings over the main settings section.
    #[must_use]
    pub fn new(settings: SharedSettings) -> Self {
        Self { settings }
    }

    /// Placement to restore, if one was recorded and is usable.
    ///
    /// Placements smaller than the minimum window size are ignored.
    #[must_use]
    pub fn placement(&self) -> Option<WindowPlacement> {
        self.settings
            .read()
            .main_settings
            .placement
            .filter(|placement| placement.width >= MIN_WIDTH && placement.height >= MIN_HEIGHT)
    }

    /// Records the window's current placement.
    pub fn save_placement(&self, placement: WindowPlacement) {
        debug!("Recording window placement {:?}", placement);
        self.settings.write().main_settings.placement = Some(placement);
    }

    /// Forgets the recorded placement.
    pub fn clear(&self) {
        self.settings.write().main_settings.placement = None;
    }
}
