//! Minimal observable value container.
//!
//! Mirrors the subscribe/set/update contract of the viewer widget's state
//! stores: a subscriber receives all future values starting with the current
//! one, and `set` synchronously notifies every listener.

use std::sync::{Arc, Mutex, Weak};

type Listener<T> = Box<dyn Fn(&T) + Send>;

struct Inner<T> {
    value: T,
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
}

/// A value container with synchronous change notification.
///
/// Clones share the same underlying value and listener set.
pub struct Store<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Store<T> {
    /// Create a store holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Replace the current value and notify all listeners.
    pub fn set(&self, value: T) {
        let mut inner = self.lock();
        inner.value = value;
        for (_, listener) in &inner.listeners {
            listener(&inner.value);
        }
    }

    /// Derive the next value from the current one, then notify.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let mut inner = self.lock();
        inner.value = f(&inner.value);
        for (_, listener) in &inner.listeners {
            listener(&inner.value);
        }
    }

    /// Register a listener. It is invoked immediately with the current
    /// value, then again on every `set`/`update` until the returned
    /// [`Subscription`] is dropped.
    ///
    /// Listeners run under the store lock: a listener must not call back
    /// into the store it observes.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + 'static) -> Subscription<T> {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        listener(&inner.value);
        inner.listeners.push((id, Box::new(listener)));
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Read the current value without subscribing.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.lock().value.clone()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        // Listeners run under this lock and must not panic back into it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug + Clone> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("value", &self.get()).finish()
    }
}

/// Handle for a registered listener; dropping it unregisters.
pub struct Subscription<T> {
    id: u64,
    inner: Weak<Mutex<Inner<T>>>,
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            if let Ok(mut inner) = inner.lock() {
                inner.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
