//! # Locator Peer
//!
//! The request/response boundary to the remote locator service. The resolver
//! treats the locator as a black box: it may be slow, it may fail, and it may
//! answer that a target does not exist.
//!
//! ## Implementations
//!
//! - [`RegistryLocator`]: answers from an in-memory [`LocatorRegistry`]. Used by
//!   the demo binary and the integration tests.
//! - [`mock::MockLocator`]: expectation-based test double.
//!
//! Real deployments implement [`LocatorPeer`] over their RPC transport.

pub mod mock;
pub mod registry;

pub use registry::*;

use crate::model::{EndpointReference, Identity, ResolutionKey};
use async_trait::async_trait;
use thiserror::Error;

/// Failure answers from the locator.
///
/// The two variants imply opposite policies and must never be conflated:
/// `NotFound` is terminal, `Unavailable` may be retried by the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocatorError {
    /// The logical target is not registered with the locator.
    #[error("not registered with the locator: {0}")]
    NotFound(String),

    /// The locator itself could not be reached or refused to answer.
    #[error("locator unavailable: {0}")]
    Unavailable(String),
}

/// Client side of the locator service.
///
/// The resolver guarantees at most one concurrent call per key, but calls for
/// different keys may overlap, so implementations must be `Sync`.
#[async_trait]
pub trait LocatorPeer: Send + Sync + 'static {
    /// Looks up the endpoints currently hosting an adapter.
    async fn find_adapter(&self, adapter_id: &str) -> Result<EndpointReference, LocatorError>;

    /// Looks up a well-known object. The answer may be indirect.
    async fn find_object(&self, identity: &Identity) -> Result<EndpointReference, LocatorError>;

    /// Dispatches on the key variant.
    async fn find(&self, key: &ResolutionKey) -> Result<EndpointReference, LocatorError> {
        match key {
            ResolutionKey::AdapterId(adapter_id) => self.find_adapter(adapter_id).await,
            ResolutionKey::ObjectIdentity(identity) => self.find_object(identity).await,
        }
    }
}
