//! # Locator Resolver
//!
//! > **Client-side resolution of indirect object references.**
//!
//! In an object-RPC system, a remote object can be addressed by a logical
//! pair (object identity, adapter id) instead of a fixed endpoint. A separate
//! locator service knows which endpoints currently host each adapter; the
//! answer changes whenever servers restart or move. This crate is the layer
//! between callers and that locator.
//!
//! ## Guarantees
//!
//! - **Caching**: a valid answer is served without asking the locator again.
//! - **Coalescing**: concurrent callers for the same key share one locator
//!   call and all observe the same outcome.
//! - **Precise invalidation**: failure reports are pinned to the cache
//!   generation they were observed on; a stale report never evicts a fresh
//!   answer.
//! - **Honest errors**: "not found" (terminal) and "unavailable" (retryable)
//!   are kept apart, and neither is ever cached.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`resolver`])
//! - **Role**: the [`ResolverActor`](resolver::ResolverActor) owns the cache
//!   and the in-flight lookups; callers hold a
//!   [`ResolverClient`](resolver::ResolverClient).
//!
//! ### 2. The Boundary ([`locator`])
//! - **Role**: the [`LocatorPeer`](locator::LocatorPeer) trait, an in-memory
//!   [`LocatorRegistry`](locator::LocatorRegistry) backed peer, and a
//!   [`MockLocator`](locator::mock::MockLocator) for tests.
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! - **Role**: [`LocatorSystem`](lifecycle::LocatorSystem) starts and stops a
//!   resolver; [`ResolverConfig`](lifecycle::ResolverConfig) and
//!   [`setup_tracing`](lifecycle::setup_tracing) cover configuration and logs.
//!
//! ### 4. The Values ([`model`])
//! - **Role**: [`ResolutionKey`](model::ResolutionKey) and
//!   [`EndpointReference`](model::EndpointReference).
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod lifecycle;
pub mod locator;
pub mod model;
pub mod resolver;
