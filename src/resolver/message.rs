//! Messages exchanged between [`ResolverClient`](super::ResolverClient) and
//! [`ResolverActor`](super::ResolverActor).

use super::cache::{CacheEntry, InvalidationOutcome};
use super::error::ResolutionError;
use crate::locator::LocatorError;
use crate::model::{EndpointReference, ResolutionKey};
use serde::Serialize;
use tokio::sync::oneshot;

/// One-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, ResolutionError>>;

/// A successful resolution.
///
/// `key` and `generation` identify the cache entry the endpoints came from;
/// transports pass both back to
/// [`on_endpoint_failure`](super::ResolverClient::on_endpoint_failure) when
/// the endpoints turn out to be stale. For an object published through an
/// adapter, `key` is the adapter key and `via` names the object entry that
/// pointed at it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub key: ResolutionKey,
    pub value: EndpointReference,
    pub generation: u64,
    /// True when the answer came from the cache without a locator call.
    pub cached: bool,
    /// Object key and generation of the indirect answer that was followed.
    pub via: Option<(ResolutionKey, u64)>,
}

/// Counters kept by the actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub locator_requests: u64,
    pub coalesced_waiters: u64,
    pub invalidations_applied: u64,
    pub invalidations_ignored: u64,
    pub entries: usize,
    pub pending: usize,
}

#[derive(Debug)]
pub enum ResolverRequest {
    Resolve {
        key: ResolutionKey,
        respond_to: Response<Resolved>,
    },
    Invalidate {
        key: ResolutionKey,
        generation: u64,
        respond_to: Response<InvalidationOutcome>,
    },
    InvalidateAll {
        respond_to: Response<usize>,
    },
    Inspect {
        key: ResolutionKey,
        respond_to: Response<Option<CacheEntry>>,
    },
    Stats {
        respond_to: Response<ResolverStats>,
    },
}

/// Reported back to the actor by a finished producer task.
#[derive(Debug)]
pub struct Completion {
    pub key: ResolutionKey,
    pub outcome: Result<EndpointReference, LocatorError>,
}
