//! Operational error context propagation with `anyhow`.
//!
//! Failures the player tolerates, such as a link that cannot be opened,
//! are wrapped with context and logged through `ErrorReporter`.

use std::{error::Error as StdError, fmt::Display};

use {
    anyhow::{Context, Error, Result as AnyhowResult},
    tracing::{error, warn},
};

/// Extension trait for enhanced error context.
pub trait ResultExt<T, E> {
    /// Adds context to an error with a static string.
    fn add_context(self, context: &'static str) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static;

    /// Adds context to an error with a formatted string.
    fn add_contextf(self, format: impl Display) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn add_context(self, context: &'static str) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.context(context)
    }

    fn add_contextf(self, format: impl Display) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.context(format.to_string())
    }
}

/// Centralized logging of errors that are reported instead of propagated.
#[derive(Debug)]
pub struct ErrorReporter;

impl ErrorReporter {
    /// Reports a recoverable failure.
    pub fn warn(error: &Error, operation: &str) {
        let message = Self::to_user_message(error);
        warn!(operation = operation, error = %message, "Operation failed");
    }

    /// Reports a failure that ends the current operation for good.
    pub fn error(error: &Error, operation: &str) {
        let message = Self::to_user_message(error);
        error!(operation = operation, error = %message, "Operation aborted");
    }

    /// Formats the whole error chain on one line, outermost first.
    pub fn to_user_message(error: &Error) -> String {
        format!("{error:#}")
    }
}
