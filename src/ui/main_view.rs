//! Main view-model grouping the transport and now-playing panels.

use crate::ui::{play_control::PlayControlViewModel, play_info::PlayInfoViewModel};

/// Transport controls plus now-playing information.
pub struct MainViewModel {
    /// Transport controls; first in line for key presses.
    pub play_control: PlayControlViewModel,
    /// Now-playing information.
    pub play_info: PlayInfoViewModel,
}

impl MainViewModel {
    /// Creates the main view-model.
    #[must_use]
    pub fn new(play_control: PlayControlViewModel, play_info: PlayInfoViewModel) -> Self {
        Self {
            play_control,
            play_info,
        }
    }
}
