//! Presentation-state primitives shared by the view-models.
//!
//! This module provides the dispatch context, change-notified slots, and
//! predicate-gated commands the coordinator is built from.

pub mod commands;
pub mod dispatcher;
pub mod observable;

pub use {
    commands::{Command, CommandId, CommandTable},
    dispatcher::{DispatchQueue, Dispatcher, dispatch_channel},
    observable::{ObservableSlot, Property},
};
