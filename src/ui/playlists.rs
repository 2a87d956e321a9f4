//! Playlist view-model.
//!
//! Keeps the ordered playlist and the selected entry, restoring both from
//! the settings document and writing changes back into it.

use {parking_lot::RwLock, tracing::debug};

use crate::{audio::TrackInfo, config::SharedSettings, ui::medialib::MediaFile};

/// Mutable playlist contents.
#[derive(Debug, Default)]
struct PlaylistState {
    items: Vec<MediaFile>,
    current_index: Option<usize>,
}

/// Presentation state of the playlist.
#[derive(Debug)]
pub struct PlaylistsViewModel {
    /// Settings document holding the playlist and repeat mode.
    settings: SharedSettings,
    /// Items and selection.
    state: RwLock<PlaylistState>,
}

impl PlaylistsViewModel {
    /// Creates the view-model, restoring the last playlist from settings.
    #[must_use]
    pub fn new(settings: SharedSettings) -> Self {
        let state = {
            let guard = settings.read();
            let items: Vec<MediaFile> = guard
                .playlist
                .files
                .iter()
                .map(|path| MediaFile::from_path(path))
                .collect();
            let current_index = guard
                .playlist
                .current_index
                .filter(|&index| index < items.len());
            PlaylistState {
                items,
                current_index,
            }
        };
        debug!("PlaylistsViewModel: restored {} item(s)", state.items.len());

        Self {
            settings,
            state: RwLock::new(state),
        }
    }

    /// Playlist entries in order.
    #[must_use]
    pub fn items(&self) -> Vec<MediaFile> {
        self.state.read().items.clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    /// Whether the playlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }

    /// Appends files to the playlist.
    pub fn add_files(&self, files: impl IntoIterator<Item = MediaFile>) {
        self.state.write().items.extend(files);
        self.persist();
    }

    /// Removes every entry.
    pub fn clear(&self) {
        *self.state.write() = PlaylistState::default();
        self.persist();
    }

    /// Index of the selected entry.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.state.read().current_index
    }

    /// The selected entry as a loadable track.
    #[must_use]
    pub fn current_track(&self) -> Option<TrackInfo> {
        let state = self.state.read();
        state
            .current_index
            .and_then(|index| state.items.get(index))
            .map(|item| TrackInfo {
                path: item.path.clone(),
                title: item.title.clone(),
            })
    }

    /// Selects an entry.
    ///
    /// # Returns
    ///
    /// `false` if `index` is out of range.
    pub fn select(&self, index: usize) -> bool {
        {
            let mut state = self.state.write();
            if index >= state.items.len() {
                return false;
            }
            state.current_index = Some(index);
        }
        self.persist();
        true
    }

    /// Selects the entry after the current one.
    ///
    /// Wraps to the first entry in repeat mode. With no selection the first
    /// entry is selected.
    ///
    /// # Returns
    ///
    /// The newly selected index, or `None` at the end without repeat.
    pub fn select_next(&self) -> Option<usize> {
        let repeat = self.settings.read().player_settings.repeat_mode;
        let next = {
            let state = self.state.read();
            let len = state.items.len();
            match state.current_index {
                _ if len == 0 => None,
                None => Some(0),
                Some(index) if index + 1 < len => Some(index + 1),
                Some(_) if repeat => Some(0),
                Some(_) => None,
            }
        }?;
        self.select(next);
        Some(next)
    }

    /// Selects the entry before the current one.
    ///
    /// Wraps to the last entry in repeat mode.
    ///
    /// # Returns
    ///
    /// The newly selected index, or `None` at the start without repeat.
    pub fn select_previous(&self) -> Option<usize> {
        let repeat = self.settings.read().player_settings.repeat_mode;
        let previous = {
            let state = self.state.read();
            let len = state.items.len();
            match state.current_index {
                _ if len == 0 => None,
                None => Some(0),
                Some(index) if index > 0 => Some(index - 1),
                Some(_) if repeat => Some(len - 1),
                Some(_) => None,
            }
        }?;
        self.select(previous);
        Some(previous)
    }

    /// Writes items and selection into the settings document.
    fn persist(&self) {
        let state = self.state.read();
        let mut settings = self.settings.write();
        settings.playlist.files = state.items.iter().map(|item| item.path.clone()).collect();
        settings.playlist.current_index = state.current_index;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        config::SmpSettings,
        ui::{medialib::MediaFile, playlists::PlaylistsViewModel},
    };

    fn playlist_with(count: usize, repeat: bool) -> PlaylistsViewModel {
        let mut document = SmpSettings::default();
        document.player_settings.repeat_mode = repeat;
        let playlists = PlaylistsViewModel::new(document.into_shared());
        playlists.add_files((0..count).map(|i| MediaFile::from_path(&format!("/t{i}.flac"))));
        playlists
    }

    #[test]
    fn test_restores_from_settings() {
        let mut document = SmpSettings::default();
        document.playlist.files = vec!["/a.flac".to_string(), "/b.flac".to_string()];
        document.playlist.current_index = Some(5);

        let playlists = PlaylistsViewModel::new(document.into_shared());
        assert_eq!(playlists.len(), 2);
        // Out-of-range selection is dropped
        assert_eq!(playlists.current_index(), None);
    }

    #[test]
    fn test_next_without_repeat_stops_at_end() {
        let playlists = playlist_with(2, false);
        assert_eq!(playlists.select_next(), Some(0));
        assert_eq!(playlists.select_next(), Some(1));
        assert_eq!(playlists.select_next(), None);
        assert_eq!(playlists.current_index(), Some(1));
    }

    #[test]
    fn test_repeat_wraps_both_ways() {
        let playlists = playlist_with(3, true);
        playlists.select(2);
        assert_eq!(playlists.select_next(), Some(0));
        assert_eq!(playlists.select_previous(), Some(2));
    }

    #[test]
    fn test_empty_playlist_selects_nothing() {
        let playlists = playlist_with(0, true);
        assert!(playlists.is_empty());
        assert_eq!(playlists.select_next(), None);
        assert_eq!(playlists.select_previous(), None);
        assert!(!playlists.select(0));
    }

    #[test]
    fn test_changes_are_written_to_settings() {
        let settings = SmpSettings::default().into_shared();
        let playlists = PlaylistsViewModel::new(Arc::clone(&settings));

        playlists.add_files([MediaFile::from_path("/x.flac")]);
        playlists.select(0);
        assert_eq!(settings.read().playlist.files, vec!["/x.flac"]);
        assert_eq!(settings.read().playlist.current_index, Some(0));
        assert_eq!(playlists.current_track().unwrap().title, "x");

        playlists.clear();
        assert!(settings.read().playlist.files.is_empty());
    }
}
