use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Subscriber registry shared between a store and its subscriptions.
struct Subscribers<T> {
    entries: RwLock<Vec<(u64, Subscriber<T>)>>,
    next_id: AtomicU64,
}

impl<T> Subscribers<T> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    fn insert(&self, subscriber: Subscriber<T>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, subscriber));
        id
    }

    /// Clone the current subscriber list so callbacks run with no lock held.
    fn snapshot(&self) -> Vec<Subscriber<T>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect()
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Type-erased removal so `Subscription` does not carry the store's value type.
trait Detach: Send + Sync {
    fn detach(&self, id: u64) -> bool;
}

impl<T: 'static> Detach for Subscribers<T> {
    fn detach(&self, id: u64) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }
}

/// A single-value observable container.
///
/// Cloning a `Store` yields another handle to the same value and subscriber
/// set. Every subscriber is called synchronously: once with the current value
/// when it subscribes, then once per `set`, `update` or `modify`.
///
/// Each notification pass works on a snapshot of the subscriber list taken
/// when the pass starts, with no lock held. Subscribers added during a pass
/// are skipped by that pass; subscribers removed during a pass are still
/// called by it. A subscriber that panics is logged and skipped, and the
/// remaining subscribers are still notified.
///
/// # Examples
///
/// ```
/// use satchel::Store;
/// use std::sync::{Arc, Mutex};
///
/// let store = Store::new(0);
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let subscription = store.subscribe({
///     let seen = Arc::clone(&seen);
///     move |value| seen.lock().unwrap().push(*value)
/// });
///
/// store.set(1);
/// store.update(|n| n + 1);
/// subscription.unsubscribe();
/// store.set(3);
///
/// assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
/// assert_eq!(store.get(), 3);
/// ```
pub struct Store<T> {
    state: Arc<RwLock<T>>,
    subscribers: Arc<Subscribers<T>>,
}

impl<T: Clone + 'static> Store<T> {
    /// Create a new store with the given initial value.
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            subscribers: Arc::new(Subscribers::new()),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Read the current value without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = value;
        self.notify();
    }

    /// Replace the value with `f(previous)` and notify subscribers.
    ///
    /// `f` runs while the store is locked, so it must not call back into
    /// this store.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let next = f(&state);
            *state = next;
        }
        self.notify();
    }

    /// Mutate the value in place and notify subscribers.
    ///
    /// Same locking rule as [`Store::update`].
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state);
        }
        self.notify();
    }

    /// Register `callback` and call it once with the current value before
    /// returning.
    ///
    /// The callback stays registered until [`Subscription::unsubscribe`] is
    /// called. Dropping the returned handle does not unsubscribe; use
    /// [`Subscription::guard`] for scoped subscriptions.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Subscriber<T> = Arc::new(callback);
        let id = self.subscribers.insert(Arc::clone(&callback));

        let value = self.get();
        deliver(callback.as_ref(), &value);

        let subscribers: Weak<dyn Detach> = Arc::downgrade(&self.subscribers) as Weak<dyn Detach>;
        Subscription { id, subscribers }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Notify all subscribers of the current value.
    fn notify(&self) {
        let value = self.get();
        let snapshot = self.subscribers.snapshot();
        tracing::trace!(subscribers = snapshot.len(), "notifying store subscribers");
        for subscriber in &snapshot {
            deliver(subscriber.as_ref(), &value);
        }
    }
}

/// Call one subscriber, containing any panic it raises.
fn deliver<T>(subscriber: &(dyn Fn(&T) + Send + Sync), value: &T) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| subscriber(value))) {
        tracing::error!(
            panic = panic_message(payload.as_ref()),
            "store subscriber panicked; continuing with remaining subscribers"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: Clone + Default + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Store")
            .field("value", &*state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Handle returned by [`Store::subscribe`].
///
/// Calling [`unsubscribe`](Subscription::unsubscribe) more than once is a
/// no-op, as is calling it after the store has been dropped.
pub struct Subscription {
    id: u64,
    subscribers: Weak<dyn Detach>,
}

impl Subscription {
    /// Remove the callback from the store's subscriber set.
    ///
    /// Returns `true` only on the call that actually removed it.
    pub fn unsubscribe(&self) -> bool {
        match self.subscribers.upgrade() {
            Some(subscribers) => subscribers.detach(self.id),
            None => false,
        }
    }

    /// Turn this handle into a guard that unsubscribes when dropped.
    pub fn guard(self) -> SubscriptionGuard {
        SubscriptionGuard { subscription: self }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// RAII guard for store subscriptions.
#[derive(Debug)]
#[must_use = "dropping the guard unsubscribes immediately"]
pub struct SubscriptionGuard {
    subscription: Subscription,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
