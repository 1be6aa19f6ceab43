//! # Request Coalescer
//!
//! Merges concurrent lookups for the same key into one locator call.
//!
//! The first caller for a key opens a [`PendingResolution`] and is the only
//! one that starts the producer. Every later caller for that key is appended
//! to the waiter list instead. When the producer finishes,
//! [`release`](RequestCoalescer::release) removes the pending entry and hands
//! a clone of the same outcome to each waiter in arrival order. The next
//! request for the key opens a new window.
//!
//! Waiters are `oneshot` senders. A waiter whose receiver was dropped (its
//! caller gave up) is skipped on release; the producer is never cancelled on
//! its behalf.

use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::oneshot;

/// One caller waiting on an in-flight resolution.
pub type Waiter<V, E> = oneshot::Sender<Result<V, E>>;

/// An outstanding producer call and everyone waiting on it.
#[derive(Debug)]
pub struct PendingResolution<V, E> {
    waiters: Vec<Waiter<V, E>>,
    generation_to_produce: u64,
}

impl<V, E> PendingResolution<V, E> {
    pub fn waiter_count(&self) -> usize {
        self.waiters.len()
    }

    /// Generation the cache entry will carry once this resolution lands.
    pub fn generation_to_produce(&self) -> u64 {
        self.generation_to_produce
    }
}

/// How a caller entered the coalescing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// Opened the window and started the producer.
    Started,
    /// Attached to an in-flight producer; `waiters` includes this caller.
    Joined { waiters: usize },
}

#[derive(Debug)]
pub struct RequestCoalescer<K, V, E> {
    pending: HashMap<K, PendingResolution<V, E>>,
}

impl<K, V, E> Default for RequestCoalescer<K, V, E> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<K, V, E> RequestCoalescer<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    E: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `waiter` for `key`, calling `producer` only if no resolution
    /// for `key` is already in flight.
    ///
    /// The existence check and the insertion happen under the same `&mut self`
    /// borrow, so there is never more than one pending resolution per key.
    pub fn resolve_once<F>(
        &mut self,
        key: K,
        waiter: Waiter<V, E>,
        generation_to_produce: u64,
        producer: F,
    ) -> Join
    where
        F: FnOnce(K),
    {
        if let Some(pending) = self.pending.get_mut(&key) {
            pending.waiters.push(waiter);
            return Join::Joined {
                waiters: pending.waiters.len(),
            };
        }

        self.pending.insert(
            key.clone(),
            PendingResolution {
                waiters: vec![waiter],
                generation_to_produce,
            },
        );
        producer(key);
        Join::Started
    }

    /// Closes the window for `key` and delivers `outcome` to every waiter, in
    /// FIFO order. Returns how many waiters were still listening.
    pub fn release(&mut self, key: &K, outcome: Result<V, E>) -> usize {
        let Some(pending) = self.pending.remove(key) else {
            return 0;
        };
        pending
            .waiters
            .into_iter()
            .map(|waiter| waiter.send(outcome.clone()).is_ok())
            .filter(|delivered| *delivered)
            .count()
    }

    pub fn get(&self, key: &K) -> Option<&PendingResolution<V, E>> {
        self.pending.get(key)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Keys with a producer still in flight.
    pub fn pending_keys(&self) -> Vec<K> {
        self.pending.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    type Coalescer = RequestCoalescer<&'static str, u32, String>;

    #[tokio::test]
    async fn test_single_producer_per_key() {
        let mut coalescer = Coalescer::new();
        let mut started = Vec::new();

        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        let (tx3, rx3) = oneshot::channel();

        assert_eq!(
            coalescer.resolve_once("A", tx1, 1, |k| started.push(k)),
            Join::Started
        );
        assert_eq!(
            coalescer.resolve_once("A", tx2, 1, |k| started.push(k)),
            Join::Joined { waiters: 2 }
        );
        assert_eq!(
            coalescer.resolve_once("B", tx3, 1, |k| started.push(k)),
            Join::Started
        );
        assert_eq!(started, vec!["A", "B"]);
        assert_eq!(coalescer.get(&"A").unwrap().waiter_count(), 2);

        assert_eq!(coalescer.release(&"A", Ok(7)), 2);
        assert_eq!(rx1.await.unwrap(), Ok(7));
        assert_eq!(rx2.await.unwrap(), Ok(7));
        assert!(!coalescer.is_pending(&"A"));
        assert!(coalescer.is_pending(&"B"));

        coalescer.release(&"B", Err("down".to_string()));
        assert_eq!(rx3.await.unwrap(), Err("down".to_string()));
        assert_eq!(coalescer.pending_count(), 0);
    }

    /// Waiters are parked in reverse order of arrival, so only a FIFO release
    /// wakes them in arrival order.
    #[tokio::test]
    async fn test_waiters_are_released_in_arrival_order() {
        let mut coalescer = Coalescer::new();
        let woken = Arc::new(Mutex::new(Vec::new()));
        let (ready_tx, mut ready_rx) = mpsc::unbounded_channel();

        let mut receivers = Vec::new();
        for arrival in 0..5 {
            let (tx, rx) = oneshot::channel();
            coalescer.resolve_once("A", tx, 1, |_| {});
            receivers.push((arrival, rx));
        }
        assert_eq!(coalescer.pending_keys(), vec!["A"]);

        let mut handles = Vec::new();
        for (arrival, rx) in receivers.into_iter().rev() {
            let woken = woken.clone();
            let ready_tx = ready_tx.clone();
            handles.push(tokio::spawn(async move {
                ready_tx.send(()).unwrap();
                let outcome = rx.await.unwrap();
                woken.lock().unwrap().push(arrival);
                outcome
            }));
        }
        for _ in 0..5 {
            ready_rx.recv().await.unwrap();
        }

        assert_eq!(coalescer.release(&"A", Ok(3)), 5);
        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(3));
        }
        assert_eq!(*woken.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert!(coalescer.pending_keys().is_empty());
    }

    #[tokio::test]
    async fn test_abandoned_waiter_does_not_block_others() {
        let mut coalescer = Coalescer::new();

        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        coalescer.resolve_once("A", tx1, 1, |_| {});
        coalescer.resolve_once("A", tx2, 1, |_| {});

        drop(rx1);
        assert_eq!(coalescer.release(&"A", Ok(1)), 1);
        assert_eq!(rx2.await.unwrap(), Ok(1));
    }

    #[test]
    fn test_window_reopens_after_release() {
        let mut coalescer = Coalescer::new();
        let mut starts = 0;

        let (tx, _rx) = oneshot::channel();
        coalescer.resolve_once("A", tx, 1, |_| starts += 1);
        coalescer.release(&"A", Ok(1));

        let (tx, _rx) = oneshot::channel();
        let join = coalescer.resolve_once("A", tx, 2, |_| starts += 1);
        assert_eq!(join, Join::Started);
        assert_eq!(starts, 2);
        assert_eq!(coalescer.get(&"A").unwrap().generation_to_produce(), 2);
        assert_eq!(coalescer.release(&"missing", Ok(0)), 0);
    }
}
