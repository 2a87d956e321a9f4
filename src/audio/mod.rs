//! Playback engine handle and its equalizer capability.

pub mod engine;
pub mod equalizer;

pub use {
    engine::{EngineError, EngineEvent, PlaybackState, PlayerEngine, TrackInfo},
    equalizer::{Equalizer, EqualizerBand, EqualizerCapability, EqualizerRef},
};
