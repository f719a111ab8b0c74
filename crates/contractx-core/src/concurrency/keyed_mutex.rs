//! Per-key mutual exclusion
//!
//! Each key owns a binary async mutex. Blocking and async callers share the
//! same table, so a thread in [`KeyedMutex::wait`] and a task in
//! [`KeyedMutex::wait_async`] exclude each other on the same key. Waiters on
//! one key are served in arrival order; different keys never contend.
//!
//! A slot counts its holder plus registered waiters and is dropped from the
//! table when that count reaches zero. Registration and removal both happen
//! under the table lock, so a caller about to wait can never lose its slot
//! to a concurrent removal.
//!
//! Exclusion is process-local only.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

struct Slot {
    lock: Arc<AsyncMutex<()>>,
    held: Option<OwnedMutexGuard<()>>,
    users: usize,
}

/// Table of per-key locks
pub struct KeyedMutex<K> {
    slots: Mutex<HashMap<K, Slot>>,
}

impl<K> Default for KeyedMutex<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> KeyedMutex<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<K, Slot>> {
        // The table holds no invariant a panicking holder could break halfway.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, key: &K) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots();
        let slot = slots.entry(key.clone()).or_insert_with(|| Slot {
            lock: Arc::new(AsyncMutex::new(())),
            held: None,
            users: 0,
        });
        slot.users += 1;
        slot.lock.clone()
    }

    fn unregister(slots: &mut HashMap<K, Slot>, key: &K) {
        if let Some(slot) = slots.get_mut(key) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                slots.remove(key);
            }
        }
    }

    fn store_held(&self, key: &K, guard: OwnedMutexGuard<()>) {
        if let Some(slot) = self.slots().get_mut(key) {
            slot.held = Some(guard);
        }
    }

    /// Block the current thread until `key` is acquired
    ///
    /// Must not be called from inside an async task; use
    /// [`wait_async`](Self::wait_async) there.
    pub fn wait(&self, key: &K) {
        let lock = self.register(key);
        let guard = futures::executor::block_on(lock.lock_owned());
        self.store_held(key, guard);
    }

    /// Suspend until `key` is acquired
    ///
    /// Dropping the future before it completes withdraws the registration.
    pub async fn wait_async(&self, key: &K) {
        let lock = self.register(key);
        let registration = Registration {
            owner: self,
            key,
            armed: true,
        };
        let guard = lock.lock_owned().await;
        registration.complete();
        self.store_held(key, guard);
    }

    /// Release `key` if it is held; otherwise do nothing
    pub fn release(&self, key: &K) {
        let released = {
            let mut slots = self.slots();
            let Some(slot) = slots.get_mut(key) else {
                return;
            };
            let Some(guard) = slot.held.take() else {
                return;
            };
            Self::unregister(&mut slots, key);
            guard
        };
        // Wakes the next waiter once the table lock is gone.
        drop(released);
    }

    /// Acquire `key` for the lifetime of the returned scope
    pub fn lock(&self, key: K) -> KeyLock<'_, K> {
        self.wait(&key);
        KeyLock { owner: self, key }
    }

    /// Async form of [`lock`](Self::lock)
    pub async fn lock_async(&self, key: K) -> KeyLock<'_, K> {
        self.wait_async(&key).await;
        KeyLock { owner: self, key }
    }

    /// Check whether `key` is currently held
    pub fn is_held(&self, key: &K) -> bool {
        self.slots()
            .get(key)
            .map(|slot| slot.held.is_some())
            .unwrap_or(false)
    }

    /// Number of keys with a holder or waiter
    pub fn tracked_keys(&self) -> usize {
        self.slots().len()
    }
}

/// Withdraws a waiter's registration if its wait is abandoned
struct Registration<'a, K>
where
    K: Eq + Hash + Clone,
{
    owner: &'a KeyedMutex<K>,
    key: &'a K,
    armed: bool,
}

impl<K> Registration<'_, K>
where
    K: Eq + Hash + Clone,
{
    fn complete(mut self) {
        self.armed = false;
    }
}

impl<K> Drop for Registration<'_, K>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        if self.armed {
            let mut slots = self.owner.slots();
            KeyedMutex::unregister(&mut slots, self.key);
        }
    }
}

/// Scoped hold on a key, released on drop
pub struct KeyLock<'a, K>
where
    K: Eq + Hash + Clone,
{
    owner: &'a KeyedMutex<K>,
    key: K,
}

impl<K> KeyLock<'_, K>
where
    K: Eq + Hash + Clone,
{
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K> Drop for KeyLock<'_, K>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        self.owner.release(&self.key);
    }
}
