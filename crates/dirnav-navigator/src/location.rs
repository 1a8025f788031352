//! Location state — the single observable slot holding the browsed location.
//!
//! One writer (the navigator), many readers:
//! - Subscribers are notified synchronously on every `set`, including when
//!   the new value equals the old one.
//! - [`LocationHandle`]s read the current value from any thread and queue
//!   change requests. Requests never mutate the slot directly; the owner
//!   drains them after the current change has finished, which keeps a
//!   subscriber that reacts to a change from recursing into another one.
use crossbeam_channel::{Receiver, Sender, TrySendError};
use dirnav_core::model::Location;
use parking_lot::RwLock;
use std::sync::Arc;

/// Maximum number of location change requests that may queue up between drains.
pub const COMMAND_CHANNEL_CAPACITY: usize = 256;

/// The current location, readable from any thread.
pub type SharedLocation = Arc<RwLock<Location>>;

/// Commands sent to the owner of a [`LocationState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationCommand {
    /// Change the location once the current change has finished.
    Set(Location),
}

/// Identifies a subscription for [`LocationState::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Location)>;

pub struct LocationState {
    value: Location,
    shared: SharedLocation,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    command_tx: Sender<LocationCommand>,
    command_rx: Receiver<LocationCommand>,
}

impl LocationState {
    /// Create the slot. No notification is sent for the initial value.
    pub fn new(initial: Location) -> Self {
        let (command_tx, command_rx) = crossbeam_channel::bounded(COMMAND_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(RwLock::new(initial.clone())),
            value: initial,
            subscribers: Vec::new(),
            next_subscription: 0,
            command_tx,
            command_rx,
        }
    }

    pub fn get(&self) -> &Location {
        &self.value
    }

    /// Store `value` and notify every subscriber, in subscription order.
    pub fn set(&mut self, value: Location) {
        *self.shared.write() = value.clone();
        self.value = value;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.value);
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Location) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn handle(&self) -> LocationHandle {
        LocationHandle {
            shared: self.shared.clone(),
            command_tx: self.command_tx.clone(),
        }
    }

    /// Drain every queued request and return the newest one.
    ///
    /// Older queued requests are superseded and dropped.
    pub fn take_pending(&self) -> Option<Location> {
        let mut newest = None;
        while let Ok(LocationCommand::Set(location)) = self.command_rx.try_recv() {
            newest = Some(location);
        }
        newest
    }

    pub fn has_pending(&self) -> bool {
        !self.command_rx.is_empty()
    }
}

/// Cloneable read handle to a [`LocationState`].
#[derive(Clone)]
pub struct LocationHandle {
    shared: SharedLocation,
    command_tx: Sender<LocationCommand>,
}

impl LocationHandle {
    /// The current location.
    pub fn get(&self) -> Location {
        self.shared.read().clone()
    }

    /// Queue a location change.
    ///
    /// Returns `false` if the owner is gone or the queue is full.
    pub fn request(&self, location: impl Into<Location>) -> bool {
        match self.command_tx.try_send(LocationCommand::Set(location.into())) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Location request queue is full; dropping request");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

impl std::fmt::Debug for LocationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationHandle")
            .field("current", &*self.shared.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_set_notifies_even_when_unchanged() {
        let mut state = LocationState::new(Location::Drives);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        state.subscribe(move |loc| sink.borrow_mut().push(loc.clone()));

        state.set(Location::from("a"));
        state.set(Location::from("a"));

        assert_eq!(*seen.borrow(), vec![Location::from("a"), Location::from("a")]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut state = LocationState::new(Location::Drives);
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = state.subscribe(move |_| *sink.borrow_mut() += 1);

        state.set(Location::from("a"));
        assert!(state.unsubscribe(id));
        assert!(!state.unsubscribe(id));
        state.set(Location::from("b"));

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_handle_reads_current_value() {
        let mut state = LocationState::new(Location::Drives);
        let handle = state.handle();
        assert_eq!(handle.get(), Location::Drives);
        state.set(Location::from("x"));
        assert_eq!(handle.get(), Location::from("x"));
    }

    #[test]
    fn test_handle_reads_from_other_thread() {
        let mut state = LocationState::new(Location::Drives);
        state.set(Location::from("elsewhere"));
        let handle = state.handle();
        let seen = std::thread::spawn(move || handle.get()).join().unwrap();
        assert_eq!(seen, Location::from("elsewhere"));
    }

    #[test]
    fn test_requests_collapse_to_newest() {
        let state = LocationState::new(Location::Drives);
        let handle = state.handle();
        assert!(!state.has_pending());
        assert!(handle.request("one"));
        assert!(handle.request("two"));
        assert!(state.has_pending());

        assert_eq!(state.take_pending(), Some(Location::from("two")));
        assert_eq!(state.take_pending(), None);
        // Requests do not touch the slot itself.
        assert_eq!(*state.get(), Location::Drives);
    }

    #[test]
    fn test_request_after_owner_dropped() {
        let state = LocationState::new(Location::Drives);
        let handle = state.handle();
        drop(state);
        assert!(!handle.request("late"));
    }
}
