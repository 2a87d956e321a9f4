//! Error handling built on `thiserror` and `anyhow`.
//!
//! This module provides the aggregate error returned by the composition
//! root and helpers for reporting operational failures that are logged
//! rather than propagated.

pub mod domain;
pub mod operational;

pub use {
    domain::AppError,
    operational::{ErrorReporter, ResultExt},
};
