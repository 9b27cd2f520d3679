//! # formbind-signals
//!
//! Signal dispatcher for the formbind library. Provides a decoupled event
//! system allowing components to emit and observe notifications without
//! direct dependencies: element value changes, submit interception, and
//! binder diagnostics all fan out through [`Signal`].
//!
//! All form work happens synchronously inside an external event
//! notification, so the dispatcher is single-threaded: receivers are
//! plain `Rc` closures rather than thread-safe handles.
//!
//! ## Usage
//!
//! ```
//! use formbind_signals::Signal;
//! use std::rc::Rc;
//!
//! let signal: Signal<String> = Signal::new();
//!
//! signal.connect("logger", Rc::new(|msg: &String| {
//!     println!("received: {msg}");
//! }));
//!
//! signal.emit(&"hello".to_string());
//! assert_eq!(signal.receiver_count(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// The type signature for a signal receiver callback.
///
/// Receivers accept a shared reference to the signal payload. Interior
/// mutability (`Cell`/`RefCell` captures) is the expected way for a
/// receiver to record what it observed.
pub type SignalReceiver<T> = Rc<dyn Fn(&T)>;

/// A signal that can be connected to and emitted.
///
/// Each signal carries a payload type `T`. Receivers are called in the
/// order they were connected. The receiver list is snapshotted before
/// dispatch, so a receiver may connect or disconnect receivers (on this
/// or any other signal) while an emit is in flight.
pub struct Signal<T> {
    receivers: RefCell<Vec<(String, SignalReceiver<T>)>>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Signal<T> {
    /// Creates a new signal with no connected receivers.
    pub const fn new() -> Self {
        Self {
            receivers: RefCell::new(Vec::new()),
        }
    }

    /// Connects a receiver to this signal.
    ///
    /// The `receiver_id` identifies the receiver for later
    /// disconnection. If a receiver with the same ID is already
    /// connected, it is replaced in place.
    pub fn connect(&self, receiver_id: impl Into<String>, callback: SignalReceiver<T>) {
        let id = receiver_id.into();
        let mut receivers = self.receivers.borrow_mut();

        if let Some(entry) = receivers.iter_mut().find(|(rid, _)| *rid == id) {
            entry.1 = callback;
        } else {
            receivers.push((id, callback));
        }
    }

    /// Disconnects the receiver with the given ID.
    ///
    /// Returns `true` if a receiver was found and removed.
    pub fn disconnect(&self, receiver_id: &str) -> bool {
        let mut receivers = self.receivers.borrow_mut();
        let len_before = receivers.len();
        receivers.retain(|(id, _)| id != receiver_id);
        receivers.len() < len_before
    }

    /// Emits the signal to all connected receivers, in connection order.
    ///
    /// The receiver list is cloned out before any receiver runs;
    /// connects and disconnects performed by a receiver take effect from
    /// the next emit.
    pub fn emit(&self, payload: &T) {
        let snapshot: Vec<SignalReceiver<T>> = self
            .receivers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(payload);
        }
    }

    /// Returns the number of connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_connect_and_emit() {
        let signal: Signal<i32> = Signal::new();
        let seen = Rc::new(Cell::new(0));

        let seen_clone = Rc::clone(&seen);
        signal.connect("capture", Rc::new(move |n: &i32| seen_clone.set(*n)));

        signal.emit(&42);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn test_receivers_called_in_connection_order() {
        let signal: Signal<()> = Signal::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for id in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            signal.connect(id, Rc::new(move |(): &()| order.borrow_mut().push(id)));
        }

        signal.emit(&());
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_same_id_replaces_receiver() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0));

        let first = Rc::clone(&hits);
        signal.connect("handler", Rc::new(move |(): &()| first.set(first.get() + 1)));
        let second = Rc::clone(&hits);
        signal.connect("handler", Rc::new(move |(): &()| second.set(second.get() + 10)));

        signal.emit(&());
        assert_eq!(signal.receiver_count(), 1);
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn test_disconnect() {
        let signal: Signal<()> = Signal::new();
        signal.connect("handler", Rc::new(|(): &()| {}));

        assert!(signal.disconnect("handler"));
        assert!(!signal.disconnect("handler"));
        assert_eq!(signal.receiver_count(), 0);
    }

    #[test]
    fn test_receiver_may_disconnect_during_emit() {
        let signal: Rc<Signal<()>> = Rc::new(Signal::new());
        let hits = Rc::new(Cell::new(0));

        let signal_clone = Rc::clone(&signal);
        let hits_clone = Rc::clone(&hits);
        signal.connect(
            "once",
            Rc::new(move |(): &()| {
                hits_clone.set(hits_clone.get() + 1);
                signal_clone.disconnect("once");
            }),
        );

        signal.emit(&());
        signal.emit(&());
        assert_eq!(hits.get(), 1);
    }
}
