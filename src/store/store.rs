//! Shared store holding one duck's state.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::action::Action;
use super::reducer::Reducer;

/// Callback invoked after every dispatched action has been reduced.
pub type Listener<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Thread-safe store with a single lock around the state.
///
/// Every dispatch is one critical section. Listeners run after the lock is
/// released, so they may read the store or dispatch again.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

struct StoreInner<R: Reducer> {
    state: Mutex<R::State>,
    listeners: RwLock<Vec<Listener<R::Action>>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self::new(R::State::default())
    }
}

impl<R: Reducer> Store<R> {
    /// Create a store from an initial state.
    pub fn new(initial: R::State) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(initial),
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Get a clone of the current state.
    pub fn get_state(&self) -> R::State {
        self.inner.state.lock().clone()
    }

    /// Read part of the state without cloning all of it.
    pub fn select<T>(&self, selector: impl FnOnce(&R::State) -> T) -> T {
        selector(&self.inner.state.lock())
    }

    /// Reduce an action into the state and notify listeners.
    pub fn dispatch(&self, action: R::Action) {
        self.reduce_with(|_| ((), Some(action)));
    }

    /// Inspect the state and optionally dispatch, atomically.
    ///
    /// `decide` runs under the store lock. If it returns an action, the action
    /// is reduced before the lock is released, so no other dispatch can slip
    /// in between the check and the transition.
    pub fn reduce_with<T>(
        &self,
        decide: impl FnOnce(&R::State) -> (T, Option<R::Action>),
    ) -> T {
        let (out, notify) = {
            let mut guard = self.inner.state.lock();
            let (out, action) = decide(&guard);
            let notify = action.map(|action| {
                tracing::trace!(action = action.type_name(), "dispatch");
                let copy = if self.inner.listeners.read().is_empty() {
                    None
                } else {
                    Some(action.clone())
                };
                let state = std::mem::take(&mut *guard);
                *guard = R::reduce(state, action);
                copy
            });
            (out, notify.flatten())
        };

        if let Some(action) = notify {
            let listeners = self.inner.listeners.read().clone();
            for listener in &listeners {
                listener(&action);
            }
        }

        out
    }

    /// Register a listener called with every action after it is reduced.
    pub fn subscribe(&self, listener: impl Fn(&R::Action) + Send + Sync + 'static) {
        self.inner.listeners.write().push(Arc::new(listener));
    }

    /// Replace the whole state, e.g. when hydrating from a server snapshot.
    pub fn replace_state(&self, state: R::State) {
        *self.inner.state.lock() = state;
    }
}
