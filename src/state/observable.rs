//! Change-notified slots for presentation-layer binding.
//!
//! An `ObservableSlot` owns an optional shared value and a list of
//! subscribers. Replacing the value with a different instance notifies every
//! subscriber synchronously; assigning the instance already held is a no-op.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use {
    async_channel::{Receiver, Sender, unbounded},
    parking_lot::RwLock,
    tracing::debug,
};

/// Names of the coordinator's observable properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Main window placement settings.
    WindowPlacement,
    /// Media library view-model.
    Medialib,
    /// Playlists view-model.
    Playlists,
    /// Main (transport and play info) view-model.
    Main,
    /// Equalizer view-model.
    Equalizer,
}

/// A value slot that notifies subscribers when its instance changes.
pub struct ObservableSlot<T> {
    /// Property reported to subscribers.
    property: Property,
    /// Current instance, if any.
    value: Option<Arc<T>>,
    /// Active subscribers for manual broadcast fan-out.
    subscribers: RwLock<Vec<Sender<Property>>>,
}

impl<T> ObservableSlot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new(property: Property) -> Self {
        Self {
            property,
            value: None,
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Gets the current instance.
    #[must_use]
    pub fn get(&self) -> Option<&Arc<T>> {
        self.value.as_ref()
    }

    /// Whether the slot currently holds an instance.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Replaces the current instance.
    ///
    /// Identity, not structural equality, decides whether anything changed.
    ///
    /// # Arguments
    ///
    /// * `value` - New instance, or `None` to clear the slot.
    ///
    /// # Returns
    ///
    /// `true` if the slot changed and subscribers were notified.
    pub fn set(&mut self, value: Option<Arc<T>>) -> bool {
        let unchanged = match (&self.value, &value) {
            (Some(current), Some(new)) => Arc::ptr_eq(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return false;
        }

        self.value = value;
        let notified = self.broadcast();
        debug!(
            "ObservableSlot: {:?} changed, notified {} subscriber(s)",
            self.property, notified
        );
        true
    }

    /// Subscribes to changes of this slot.
    ///
    /// # Returns
    ///
    /// A receiver that yields the slot's property once per change.
    pub fn subscribe(&self) -> Receiver<Property> {
        let (tx, rx) = unbounded();
        self.subscribers.write().push(tx);
        rx
    }

    /// Sends a change event to all subscribers, dropping closed ones.
    fn broadcast(&self) -> usize {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.try_send(self.property).is_ok());
        subscribers.len()
    }
}

impl<T> Debug for ObservableSlot<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ObservableSlot")
            .field("property", &self.property)
            .field("is_set", &self.value.is_some())
            .field("subscribers", &self.subscribers.read().len())
            .finish()
    }
}
