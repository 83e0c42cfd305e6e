use std::{
    fmt,
    sync::{Arc, Mutex, Weak},
};

use slab::Slab;

use crate::{Cancellable, Publisher};

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// A [`Publisher`] that passes every value given to [`send`][Self::send] on
/// to its current subscribers.
///
/// `Subject` can be cloned; all clones share the same subscribers.
pub struct Subject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

struct SubjectState<T> {
    subscribers: Slab<Callback<T>>,
    completed: bool,
}

impl<T> Subject<T> {
    /// Create a new `Subject` without any subscribers.
    pub fn new() -> Self {
        let state = SubjectState { subscribers: Slab::new(), completed: false };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Send a value to all current subscribers.
    ///
    /// Returns the number of subscribers the value was delivered to. After
    /// [`complete`][Self::complete] was called, this does nothing and returns
    /// `0`.
    pub fn send(&self, value: T) -> usize
    where
        T: Clone,
    {
        // Callbacks may send, subscribe or cancel themselves, so they must be
        // invoked without the lock held.
        let subscribers: Vec<_> = {
            let state = self.state.lock().unwrap();
            if state.completed {
                return 0;
            }
            state.subscribers.iter().map(|(_, callback)| callback.clone()).collect()
        };

        let num_subscribers = subscribers.len();
        #[cfg(feature = "tracing")]
        tracing::debug!("Sending value to {num_subscribers} subscribers");

        for callback in subscribers {
            callback(value.clone());
        }

        num_subscribers
    }

    /// Complete the subject.
    ///
    /// All subscribers are dropped, and further values given to
    /// [`send`][Self::send] are discarded. New subscriptions don't receive
    /// anything.
    pub fn complete(&self) {
        let _subscribers = {
            let mut state = self.state.lock().unwrap();
            state.completed = true;
            std::mem::take(&mut state.subscribers)
        };
    }

    /// Whether [`complete`][Self::complete] was called.
    pub fn is_completed(&self) -> bool {
        self.state.lock().unwrap().completed
    }

    /// Get the number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().unwrap().subscribers.len()
    }
}

impl<T: 'static> Publisher for Subject<T> {
    type Output = T;
    type Subscription = SubjectSubscription<T>;

    fn subscribe<F>(&self, on_value: F) -> Self::Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let mut state = self.state.lock().unwrap();
        let key = (!state.completed).then(|| state.subscribers.insert(Arc::new(on_value)));
        SubjectSubscription { state: Arc::downgrade(&self.state), key }
    }
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self { state: self.state.clone() }
    }
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("Subject")
            .field("subscriber_count", &state.subscribers.len())
            .field("completed", &state.completed)
            .finish()
    }
}

/// A subscription to a [`Subject`].
///
/// The callback is removed from the subject when this is cancelled or
/// dropped.
#[must_use]
pub struct SubjectSubscription<T> {
    state: Weak<Mutex<SubjectState<T>>>,
    /// `None` once cancelled, or if the subject was already completed.
    key: Option<usize>,
}

impl<T> Cancellable for SubjectSubscription<T> {
    fn cancel(&mut self) {
        let Some(key) = self.key.take() else { return };
        let Some(state) = self.state.upgrade() else { return };

        let _callback = state.lock().unwrap().subscribers.try_remove(key);
    }
}

impl<T> Drop for SubjectSubscription<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<T> fmt::Debug for SubjectSubscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubjectSubscription").field("key", &self.key).finish_non_exhaustive()
    }
}
