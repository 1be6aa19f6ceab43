//! # Resolver
//!
//! Client-side resolution of indirect references: a cache of previous locator
//! answers, coalescing of concurrent lookups for the same key, and
//! generation-pinned invalidation when endpoints prove stale.
//!
//! ## Control Flow
//!
//! ```text
//! caller ─ resolve(key) ─► ResolverActor ─ cache valid? ─► answer
//!                               │ no
//!                               ▼
//!                      RequestCoalescer ─ first joiner? ─► LocatorPeer (own task)
//!                               ▲                                 │
//!                               └──────── Completion ◄────────────┘
//!                      cache.put ─► every waiter gets the same outcome
//!
//! transport ─ on_endpoint_failure(key, generation) ─► cache.invalidate
//! ```
//!
//! ## Per-key States
//!
//! `NoEntry` → resolve ok → `Valid(g)` → failure at `g` → `Invalid(g)` →
//! resolve ok → `Valid(g + 1)`. `Invalid` behaves like `NoEntry` for lookups
//! but keeps the last value for [`ResolverClient::inspect`].
//!
//! ## Key Types
//!
//! - [`ResolverActor`]: owns all state; spawn [`ResolverActor::run`].
//! - [`ResolverClient`]: what callers hold.
//! - [`Invalidator`]: what the transport layer holds.

pub mod actor;
pub mod cache;
pub mod client;
pub mod coalescer;
pub mod error;
pub mod invalidator;
pub mod message;

pub use actor::ResolverActor;
pub use cache::{CacheEntry, EntryState, InvalidationOutcome, ResolutionCache};
pub use client::ResolverClient;
pub use coalescer::{Join, PendingResolution, RequestCoalescer};
pub use error::ResolutionError;
pub use invalidator::Invalidator;
pub use message::{Resolved, ResolverRequest, ResolverStats, Response};
