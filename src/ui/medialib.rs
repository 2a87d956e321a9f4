//! Media library view-model.
//!
//! Holds the library's configured directories and the media files the
//! library store has reported. Scanning itself happens elsewhere.

use std::{path::Path, sync::Arc};

use {parking_lot::RwLock, tracing::debug};

use crate::{config::SharedSettings, state::Dispatcher};

/// A file known to the media library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Full path to the file.
    pub path: String,
    /// Display title, derived from the file name.
    pub title: String,
}

impl MediaFile {
    /// Creates an entry titled after the file stem.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let title = Path::new(path)
            .file_stem()
            .map_or_else(
                || path.to_string(),
                |stem| stem.to_string_lossy().to_string(),
            );
        Self {
            path: path.to_string(),
            title,
        }
    }
}

/// Presentation state of the media library.
#[derive(Debug)]
pub struct MedialibViewModel {
    /// Dispatch context for store callbacks.
    dispatcher: Dispatcher,
    /// Settings document holding the library section.
    settings: SharedSettings,
    /// Files currently listed.
    media_files: RwLock<Vec<MediaFile>>,
}

impl MedialibViewModel {
    /// Creates the view-model.
    #[must_use]
    pub fn new(dispatcher: Dispatcher, settings: SharedSettings) -> Self {
        debug!(
            "MedialibViewModel: {} configured director(ies)",
            settings.read().medialib.directories.len()
        );
        Self {
            dispatcher,
            settings,
            media_files: RwLock::new(Vec::new()),
        }
    }

    /// Configured library directories.
    #[must_use]
    pub fn directories(&self) -> Vec<String> {
        self.settings.read().medialib.directories.clone()
    }

    /// Adds a library directory, ignoring duplicates.
    ///
    /// # Returns
    ///
    /// `true` if the directory was added.
    pub fn add_directory(&self, directory: &str) -> bool {
        let mut settings = self.settings.write();
        let directories = &mut settings.medialib.directories;
        if directories.iter().any(|existing| existing == directory) {
            return false;
        }
        directories.push(directory.to_string());
        true
    }

    /// Whether `path` has one of the accepted extensions.
    #[must_use]
    pub fn accepts(&self, path: &str) -> bool {
        let Some(extension) = Path::new(path).extension() else {
            return false;
        };
        let extension = extension.to_string_lossy().to_lowercase();
        self.settings
            .read()
            .medialib
            .extensions
            .iter()
            .any(|accepted| *accepted == extension)
    }

    /// Adds files reported by the library store, skipping unsupported ones.
    ///
    /// # Returns
    ///
    /// The number of files added.
    pub fn add_media_files<'a>(&self, paths: impl IntoIterator<Item = &'a str>) -> usize {
        let accepted: Vec<MediaFile> = paths
            .into_iter()
            .filter(|path| self.accepts(path))
            .map(MediaFile::from_path)
            .collect();
        let count = accepted.len();
        self.media_files.write().extend(accepted);
        count
    }

    /// Hands over files found by the library store on another thread.
    ///
    /// The files are added when the owner thread drains its dispatch queue.
    ///
    /// # Returns
    ///
    /// `false` if the owner thread's queue is gone and the files were dropped.
    pub fn report_media_files(self: &Arc<Self>, paths: Vec<String>) -> bool {
        let medialib = Arc::clone(self);
        self.dispatcher.post(move || {
            let added = medialib.add_media_files(paths.iter().map(String::as_str));
            debug!("MedialibViewModel: library store reported {} file(s)", added);
        })
    }

    /// Files currently listed.
    #[must_use]
    pub fn media_files(&self) -> Vec<MediaFile> {
        self.media_files.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread::spawn};

    use crate::{
        config::SmpSettings,
        state::dispatch_channel,
        ui::medialib::{MediaFile, MedialibViewModel},
    };

    #[test]
    fn test_media_file_title_from_stem() {
        let file = MediaFile::from_path("/music/Artist - Song.flac");
        assert_eq!(file.title, "Artist - Song");
    }

    #[test]
    fn test_add_media_files_filters_extensions() {
        let (dispatcher, _queue) = dispatch_channel();
        let medialib = MedialibViewModel::new(dispatcher, SmpSettings::default().into_shared());

        let added = medialib.add_media_files(["/a.FLAC", "/b.txt", "/c.mp3", "/noext"]);
        assert_eq!(added, 2);
        assert_eq!(medialib.media_files().len(), 2);
    }

    #[test]
    fn test_reported_files_arrive_on_owner_thread() {
        let (dispatcher, queue) = dispatch_channel();
        let medialib = Arc::new(MedialibViewModel::new(
            dispatcher,
            SmpSettings::default().into_shared(),
        ));

        let reporter = Arc::clone(&medialib);
        spawn(move || {
            assert!(reporter.report_media_files(vec![
                "/scan/a.flac".to_string(),
                "/scan/cover.jpg".to_string(),
            ]));
        })
        .join()
        .unwrap();

        assert!(medialib.media_files().is_empty());
        assert_eq!(queue.run_pending(), 1);
        assert_eq!(
            medialib.media_files(),
            vec![MediaFile::from_path("/scan/a.flac")]
        );
    }

    #[test]
    fn test_report_after_queue_is_gone_is_dropped() {
        let (dispatcher, queue) = dispatch_channel();
        let medialib = Arc::new(MedialibViewModel::new(
            dispatcher,
            SmpSettings::default().into_shared(),
        ));
        drop(queue);

        assert!(!medialib.report_media_files(vec!["/scan/a.flac".to_string()]));
        assert!(medialib.media_files().is_empty());
    }

    #[test]
    fn test_add_directory_persists_once() {
        let (dispatcher, _queue) = dispatch_channel();
        let settings = SmpSettings::default().into_shared();
        let medialib = MedialibViewModel::new(dispatcher, settings.clone());

        assert!(medialib.add_directory("/music"));
        assert!(!medialib.add_directory("/music"));
        assert_eq!(settings.read().medialib.directories, vec!["/music"]);
    }
}
