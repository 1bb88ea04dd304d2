// src/pipeline/queue.rs
//! OperationQueue - unbounded blocking FIFO shared by producers and one consumer.
//!
//! Threading model:
//! - Any number of threads may `push`; pushing never blocks beyond the lock.
//! - One consumer calls `pull`, which parks on a condvar while the queue is empty.
//! - The mutex guards only the deque; waits re-check emptiness, so spurious
//!   wakeups and a push landing before the wait are both handled.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub struct OperationQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> Default for OperationQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OperationQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Appends to the tail and wakes a waiting consumer.
    pub fn push(&self, item: T) {
        let mut items = self.lock();
        items.push_back(item);
        drop(items);
        self.available.notify_one();
    }

    /// Appends every item in order under a single lock acquisition, so no
    /// other producer's item lands between them.
    pub fn push_all<I>(&self, batch: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut items = self.lock();
        let before = items.len();
        items.extend(batch);
        let added = items.len() > before;
        drop(items);
        if added {
            self.available.notify_one();
        }
    }

    /// Removes and returns the head, blocking until one exists.
    pub fn pull(&self) -> T {
        let mut items = self.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }
            items = self
                .available
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like `pull`, but gives up after `timeout`.
    pub fn pull_timeout(&self, timeout: Duration) -> Option<T> {
        let items = self.lock();
        let (mut items, _) = self
            .available
            .wait_timeout_while(items, timeout, |items| items.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        items.pop_front()
    }

    /// Removes the head if there is one, never blocking.
    pub fn try_pull(&self) -> Option<T> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the deque half-modified,
    // so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
