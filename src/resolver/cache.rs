//! # Resolution Cache
//!
//! Last-known locator answer per [`ResolutionKey`], tagged with a generation.
//!
//! Entries are never expired by time and never removed by invalidation: an
//! invalid entry keeps its value for diagnostics but is skipped by lookups.
//! The cache is unbounded.
//!
//! ## Generations
//!
//! Every [`put`](ResolutionCache::put) bumps the entry's generation and returns
//! it. Failure reports carry the generation they were observed on, and
//! [`invalidate`](ResolutionCache::invalidate) only applies when that
//! generation is still current, so a late report about a superseded answer
//! cannot knock out a freshly refreshed one.
//!
//! The cache is a plain owned structure; the resolver actor is its only owner
//! and serializes all access.

use crate::model::{EndpointReference, ResolutionKey};
use serde::Serialize;
use std::collections::HashMap;

/// Whether an entry may be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryState {
    Valid,
    Invalid,
}

/// A cached locator answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry {
    pub key: ResolutionKey,
    pub value: EndpointReference,
    pub generation: u64,
    pub valid: bool,
}

impl CacheEntry {
    pub fn state(&self) -> EntryState {
        if self.valid {
            EntryState::Valid
        } else {
            EntryState::Invalid
        }
    }
}

/// Result of an invalidation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InvalidationOutcome {
    /// The current generation was marked invalid.
    Applied,
    /// The report named a superseded generation; nothing changed.
    Stale { current: u64 },
    /// Already invalid at that generation.
    AlreadyInvalid,
    /// Nothing cached under the key.
    Missing,
}

#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<ResolutionKey, CacheEntry>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry, valid or not. No side effects.
    pub fn get(&self, key: &ResolutionKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Returns the value only if the entry is present and valid.
    pub fn lookup(&self, key: &ResolutionKey) -> Option<&CacheEntry> {
        self.entries.get(key).filter(|entry| entry.valid)
    }

    /// Generation of the current entry, or 0 if there is none.
    pub fn generation(&self, key: &ResolutionKey) -> u64 {
        self.entries.get(key).map_or(0, |entry| entry.generation)
    }

    /// Stores a fresh answer, bumping the generation and marking it valid.
    pub fn put(&mut self, key: ResolutionKey, value: EndpointReference) -> u64 {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry {
                key,
                value: value.clone(),
                generation: 0,
                valid: false,
            });
        entry.value = value;
        entry.generation += 1;
        entry.valid = true;
        entry.generation
    }

    /// Marks the entry invalid if `generation` is still the current one.
    pub fn invalidate(&mut self, key: &ResolutionKey, generation: u64) -> InvalidationOutcome {
        match self.entries.get_mut(key) {
            None => InvalidationOutcome::Missing,
            Some(entry) if entry.generation != generation => InvalidationOutcome::Stale {
                current: entry.generation,
            },
            Some(entry) if !entry.valid => InvalidationOutcome::AlreadyInvalid,
            Some(entry) => {
                entry.valid = false;
                InvalidationOutcome::Applied
            }
        }
    }

    /// Marks every entry invalid, keeping values and generations.
    pub fn invalidate_all(&mut self) -> usize {
        let mut count = 0;
        for entry in self.entries.values_mut().filter(|entry| entry.valid) {
            entry.valid = false;
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Endpoint;

    fn reference(port: u16) -> EndpointReference {
        EndpointReference::direct(vec![Endpoint::tcp("localhost", port)])
    }

    #[test]
    fn test_put_bumps_generation() {
        let mut cache = ResolutionCache::new();
        let key = ResolutionKey::adapter("A");

        assert!(cache.get(&key).is_none());
        assert_eq!(cache.put(key.clone(), reference(1)), 1);
        assert_eq!(cache.put(key.clone(), reference(2)), 2);

        let entry = cache.lookup(&key).unwrap();
        assert_eq!(entry.value, reference(2));
        assert_eq!(entry.generation, 2);
        assert_eq!(entry.state(), EntryState::Valid);
    }

    #[test]
    fn test_invalidate_current_generation() {
        let mut cache = ResolutionCache::new();
        let key = ResolutionKey::adapter("A");
        let generation = cache.put(key.clone(), reference(1));

        assert_eq!(cache.invalidate(&key, generation), InvalidationOutcome::Applied);
        assert!(cache.lookup(&key).is_none());

        // Retained for diagnostics.
        let entry = cache.get(&key).unwrap();
        assert_eq!(entry.state(), EntryState::Invalid);
        assert_eq!(entry.value, reference(1));

        assert_eq!(
            cache.invalidate(&key, generation),
            InvalidationOutcome::AlreadyInvalid
        );
    }

    #[test]
    fn test_stale_invalidation_is_ignored() {
        let mut cache = ResolutionCache::new();
        let key = ResolutionKey::adapter("A");
        let old = cache.put(key.clone(), reference(1));
        cache.invalidate(&key, old);
        let new = cache.put(key.clone(), reference(2));

        assert_eq!(
            cache.invalidate(&key, old),
            InvalidationOutcome::Stale { current: new }
        );
        assert_eq!(cache.lookup(&key).unwrap().value, reference(2));
    }

    #[test]
    fn test_invalidate_missing_and_all() {
        let mut cache = ResolutionCache::new();
        assert_eq!(
            cache.invalidate(&ResolutionKey::adapter("nope"), 1),
            InvalidationOutcome::Missing
        );

        cache.put(ResolutionKey::adapter("A"), reference(1));
        cache.put(ResolutionKey::adapter("B"), reference(2));
        assert_eq!(cache.invalidate_all(), 2);
        assert_eq!(cache.invalidate_all(), 0);
        assert_eq!(cache.len(), 2);

        // Generations survive a reset.
        assert_eq!(cache.put(ResolutionKey::adapter("A"), reference(3)), 2);
    }
}
