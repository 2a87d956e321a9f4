//! Presentation layer of the player.
//!
//! This module provides the main window view-model that composes the
//! player's object graph, and the child view-models it owns.


pub mod equalizer;
pub mod keys;
pub mod links;
pub mod main_view;
pub mod main_window;
pub mod medialib;
pub mod play_control;
pub mod play_info;
pub mod playlists;
pub mod window_placement;

pub use {
    equalizer::EqualizerViewModel,
    keys::Key,
    links::{LinkOpener, SystemLinkOpener},
    main_view::MainViewModel,
    main_window::MainWindowViewModel,
    medialib::{MediaFile, MedialibViewModel},
    play_control::PlayControlViewModel,
    play_info::PlayInfoViewModel,
    playlists::PlaylistsViewModel,
    window_placement::WindowPlacementSettings,
};
