//! # Resolver Actor
//!
//! The server half of the resolver. One tokio task owns the
//! [`ResolutionCache`] and the [`RequestCoalescer`] and processes
//! [`ResolverRequest`]s one at a time, so no lock guards either map: a cache
//! check, a coalescer join and an invalidation can never interleave.
//!
//! Locator calls run in their own spawned tasks. When one finishes it sends a
//! [`Completion`] back on an internal channel, and the actor stores the answer
//! and releases every waiter. The actor itself never awaits the locator.

use super::cache::{InvalidationOutcome, ResolutionCache};
use super::client::ResolverClient;
use super::coalescer::{Join, RequestCoalescer};
use super::error::ResolutionError;
use super::message::{Completion, Resolved, ResolverRequest, ResolverStats};
use crate::lifecycle::ResolverConfig;
use crate::locator::{LocatorError, LocatorPeer};
use crate::model::ResolutionKey;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub struct ResolverActor<P: LocatorPeer> {
    receiver: mpsc::Receiver<ResolverRequest>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completion_sender: mpsc::UnboundedSender<Completion>,
    peer: Arc<P>,
    cache: ResolutionCache,
    coalescer: RequestCoalescer<ResolutionKey, Resolved, ResolutionError>,
    stats: ResolverStats,
}

impl<P: LocatorPeer> ResolverActor<P> {
    /// Creates the actor and the client that talks to it. The actor does
    /// nothing until [`run`](Self::run) is spawned.
    pub fn new(peer: P, config: &ResolverConfig) -> (Self, ResolverClient) {
        let (sender, receiver) = mpsc::channel(config.buffer_size.max(1));
        let (completion_sender, completions) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            completions,
            completion_sender,
            peer: Arc::new(peer),
            cache: ResolutionCache::new(),
            coalescer: RequestCoalescer::new(),
            stats: ResolverStats::default(),
        };
        let client = ResolverClient::new(sender, config.resolve_indirect);
        (actor, client)
    }

    /// Processes requests until every client has been dropped.
    ///
    /// Resolutions still in flight at that point are allowed to finish so
    /// their waiters are released rather than dropped.
    pub async fn run(mut self) {
        info!("Resolver started");

        loop {
            tokio::select! {
                biased;
                Some(completion) = self.completions.recv() => self.complete(completion),
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
            }
        }

        while self.coalescer.pending_count() > 0 {
            match self.completions.recv().await {
                Some(completion) => self.complete(completion),
                None => break,
            }
        }

        info!(entries = self.cache.len(), "Shutdown");
    }

    fn handle(&mut self, msg: ResolverRequest) {
        match msg {
            ResolverRequest::Resolve { key, respond_to } => {
                if let Err(reason) = key.validate() {
                    warn!(%key, %reason, "Rejected key");
                    let _ = respond_to.send(Err(ResolutionError::InvalidKey(reason)));
                    return;
                }

                if let Some(entry) = self.cache.lookup(&key) {
                    self.stats.cache_hits += 1;
                    debug!(%key, generation = entry.generation, "Cache hit");
                    let resolved = Resolved {
                        key: key.clone(),
                        value: entry.value.clone(),
                        generation: entry.generation,
                        cached: true,
                        via: None,
                    };
                    let _ = respond_to.send(Ok(resolved));
                    return;
                }

                self.stats.cache_misses += 1;
                let generation_to_produce = self.cache.generation(&key) + 1;
                let peer = self.peer.clone();
                let completions = self.completion_sender.clone();
                let join = self.coalescer.resolve_once(
                    key.clone(),
                    respond_to,
                    generation_to_produce,
                    |key| spawn_lookup(peer, completions, key),
                );

                match join {
                    Join::Started => {
                        self.stats.locator_requests += 1;
                        debug!(%key, generation_to_produce, "Locator request started");
                    }
                    Join::Joined { waiters } => {
                        self.stats.coalesced_waiters += 1;
                        debug!(%key, waiters, "Joined pending resolution");
                    }
                }
            }
            ResolverRequest::Invalidate {
                key,
                generation,
                respond_to,
            } => {
                let outcome = self.cache.invalidate(&key, generation);
                match outcome {
                    InvalidationOutcome::Applied => {
                        self.stats.invalidations_applied += 1;
                        info!(%key, generation, "Invalidated");
                    }
                    InvalidationOutcome::Stale { current } => {
                        self.stats.invalidations_ignored += 1;
                        debug!(%key, generation, current, "Stale invalidation ignored");
                    }
                    InvalidationOutcome::AlreadyInvalid | InvalidationOutcome::Missing => {
                        self.stats.invalidations_ignored += 1;
                        debug!(%key, generation, ?outcome, "Invalidation ignored");
                    }
                }
                let _ = respond_to.send(Ok(outcome));
            }
            ResolverRequest::InvalidateAll { respond_to } => {
                let count = self.cache.invalidate_all();
                self.stats.invalidations_applied += count as u64;
                info!(count, "Invalidated all entries");
                let _ = respond_to.send(Ok(count));
            }
            ResolverRequest::Inspect { key, respond_to } => {
                let entry = self.cache.get(&key).cloned();
                debug!(%key, found = entry.is_some(), "Inspect");
                let _ = respond_to.send(Ok(entry));
            }
            ResolverRequest::Stats { respond_to } => {
                let stats = ResolverStats {
                    entries: self.cache.len(),
                    pending: self.coalescer.pending_count(),
                    ..self.stats.clone()
                };
                let _ = respond_to.send(Ok(stats));
            }
        }
    }

    fn complete(&mut self, completion: Completion) {
        let Completion { key, outcome } = completion;

        let result = match outcome {
            Ok(value) if value.is_empty() => {
                warn!(%key, "Locator answered with no endpoints");
                Err(ResolutionError::NotFound(format!(
                    "{} resolved to no endpoints",
                    key
                )))
            }
            Ok(value) => {
                let generation = self.cache.put(key.clone(), value.clone());
                info!(%key, generation, %value, size = self.cache.len(), "Cached");
                Ok(Resolved {
                    key: key.clone(),
                    value,
                    generation,
                    cached: false,
                    via: None,
                })
            }
            Err(e) => {
                warn!(%key, error = %e, "Locator request failed");
                Err(ResolutionError::from(e))
            }
        };

        let delivered = self.coalescer.release(&key, result);
        debug!(%key, delivered, "Released waiters");
    }
}

/// Runs one locator call in its own task and reports the outcome.
///
/// The call is wrapped in a second task so that a panicking peer still
/// produces a completion; otherwise its waiters would never be released.
fn spawn_lookup<P: LocatorPeer>(
    peer: Arc<P>,
    completions: mpsc::UnboundedSender<Completion>,
    key: ResolutionKey,
) {
    tokio::spawn(async move {
        let lookup = tokio::spawn({
            let key = key.clone();
            async move { peer.find(&key).await }
        });

        let outcome = match lookup.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(%key, error = %e, "Locator task failed");
                Err(LocatorError::Unavailable(format!("locator task failed: {}", e)))
            }
        };

        let _ = completions.send(Completion { key, outcome });
    });
}
