//! # tie-rs-signals
//!
//! Change-notification hub for the tie-rs form engine. A [`ChangeHub`] lets
//! a component register an observer for a *named field* and later cancel
//! exactly that registration via its [`ObserverHandle`]. Dispatching a change
//! for a field invokes only the observers registered for that field, in
//! registration order.
//!
//! This replaces document-wide event delegation: every observer is tied to
//! one field and is explicitly disconnected when the field is re-bound or
//! removed, so repeated rebinding never accumulates handlers.
//!
//! ## Usage
//!
//! ```
//! use tie_rs_signals::ChangeHub;
//! use std::sync::Arc;
//!
//! let hub: ChangeHub<String> = ChangeHub::new();
//!
//! let handle = hub.connect("email", Arc::new(|value: &String| {
//!     println!("email changed to {value}");
//! }));
//!
//! assert_eq!(hub.notify("email", &"a@b.com".to_string()), 1);
//! assert_eq!(hub.notify("other", &"ignored".to_string()), 0);
//!
//! hub.disconnect(handle);
//! assert_eq!(hub.notify("email", &"a@b.com".to_string()), 0);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// The type signature for a change observer callback.
///
/// Observers receive a reference to the change payload. They must be
/// `Send + Sync` so a hub can be shared across task boundaries.
pub type ChangeObserver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// An opaque handle identifying one observer registration.
///
/// Returned by [`ChangeHub::connect`]; pass it to [`ChangeHub::disconnect`]
/// to cancel the registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

struct ObserverEntry<T> {
    id: u64,
    field: String,
    callback: ChangeObserver<T>,
}

/// A hub dispatching change payloads of type `T` to per-field observers.
///
/// Observers for the same field are invoked in registration order.
pub struct ChangeHub<T> {
    observers: RwLock<Vec<ObserverEntry<T>>>,
    next_id: AtomicU64,
}

impl<T> Default for ChangeHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChangeHub<T> {
    /// Creates a hub with no registered observers.
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers an observer for the given field name.
    ///
    /// Multiple observers may watch the same field; each registration gets
    /// its own handle.
    pub fn connect(&self, field: impl Into<String>, callback: ChangeObserver<T>) -> ObserverHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut observers = self.observers.write().expect("change hub lock poisoned");
        observers.push(ObserverEntry {
            id,
            field: field.into(),
            callback,
        });
        ObserverHandle(id)
    }

    /// Cancels the registration identified by `handle`.
    ///
    /// Returns `true` if an observer was found and removed.
    pub fn disconnect(&self, handle: ObserverHandle) -> bool {
        let mut observers = self.observers.write().expect("change hub lock poisoned");
        let len_before = observers.len();
        observers.retain(|entry| entry.id != handle.0);
        observers.len() < len_before
    }

    /// Removes every observer registered for the given field.
    ///
    /// Returns the number of observers removed. Used when a field leaves the
    /// surface so its observers do not outlive it.
    pub fn disconnect_field(&self, field: &str) -> usize {
        let mut observers = self.observers.write().expect("change hub lock poisoned");
        let len_before = observers.len();
        observers.retain(|entry| entry.field != field);
        len_before - observers.len()
    }

    /// Dispatches a change payload to every observer of `field`.
    ///
    /// Returns the number of observers invoked.
    pub fn notify(&self, field: &str, payload: &T) -> usize {
        let observers = self.observers.read().expect("change hub lock poisoned");
        let mut invoked = 0;
        for entry in observers.iter().filter(|entry| entry.field == field) {
            (entry.callback)(payload);
            invoked += 1;
        }
        invoked
    }

    /// Returns the total number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.read().expect("change hub lock poisoned").len()
    }

    /// Returns the number of observers registered for one field.
    pub fn observers_for(&self, field: &str) -> usize {
        self.observers
            .read()
            .expect("change hub lock poisoned")
            .iter()
            .filter(|entry| entry.field == field)
            .count()
    }
}
