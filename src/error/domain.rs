//! Domain-specific error types using `thiserror`.
//!
//! Each subsystem defines its own error enum next to its code; this module
//! aggregates them for the composition root.

use thiserror::Error;

use crate::{audio::EngineError, config::SettingsError};

/// Errors that can abort building the main window.
#[derive(Error, Debug)]
pub enum AppError {
    /// The settings document could not be loaded or saved.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
    /// The engine rejected its configuration.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}
