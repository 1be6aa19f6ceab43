//! In-memory locator registry.
//!
//! Servers register the endpoints of their adapters (and optionally
//! well-known objects) with a [`LocatorRegistry`]; a [`RegistryLocator`]
//! answers lookups from it. Together they stand in for the remote locator
//! service in the demo and in tests.

use super::{LocatorError, LocatorPeer};
use crate::model::{Endpoint, EndpointReference, Identity};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

#[derive(Default)]
struct RegistryState {
    adapters: HashMap<String, EndpointReference>,
    objects: HashMap<Identity, EndpointReference>,
}

/// Shared adapter/object table. Cloning shares the same table.
#[derive(Clone, Default)]
pub struct LocatorRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl LocatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or moves) an adapter to the given endpoints.
    pub fn set_adapter_endpoints(&self, adapter_id: impl Into<String>, endpoints: Vec<Endpoint>) {
        let adapter_id = adapter_id.into();
        debug!(%adapter_id, count = endpoints.len(), "Adapter registered");
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state
            .adapters
            .insert(adapter_id, EndpointReference::direct(endpoints));
    }

    pub fn remove_adapter(&self, adapter_id: &str) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.adapters.remove(adapter_id).is_some()
    }

    /// Registers a well-known object. Pass [`EndpointReference::indirect`] to
    /// publish the object through its adapter.
    pub fn add_object(&self, identity: Identity, reference: EndpointReference) {
        debug!(%identity, %reference, "Object registered");
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.objects.insert(identity, reference);
    }

    pub fn remove_object(&self, identity: &Identity) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.objects.remove(identity).is_some()
    }

    pub fn find_adapter(&self, adapter_id: &str) -> Option<EndpointReference> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.adapters.get(adapter_id).cloned()
    }

    pub fn find_object(&self, identity: &Identity) -> Option<EndpointReference> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.objects.get(identity).cloned()
    }
}

struct Counters {
    requests: AtomicU64,
    unavailable: AtomicBool,
}

/// A [`LocatorPeer`] answering from a [`LocatorRegistry`].
///
/// Counts every request it serves, which is how tests observe coalescing.
/// Cloning shares the registry and the counters.
#[derive(Clone)]
pub struct RegistryLocator {
    registry: LocatorRegistry,
    counters: Arc<Counters>,
    response_delay: Option<Duration>,
}

impl RegistryLocator {
    pub fn new(registry: LocatorRegistry) -> Self {
        Self {
            registry,
            counters: Arc::new(Counters {
                requests: AtomicU64::new(0),
                unavailable: AtomicBool::new(false),
            }),
            response_delay: None,
        }
    }

    /// Delays every answer, so that concurrent lookups overlap in tests.
    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = Some(delay);
        self
    }

    pub fn registry(&self) -> &LocatorRegistry {
        &self.registry
    }

    /// Number of lookups served so far, successful or not.
    pub fn request_count(&self) -> u64 {
        self.counters.requests.load(Ordering::SeqCst)
    }

    /// While set, every lookup fails with [`LocatorError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.counters.unavailable.store(unavailable, Ordering::SeqCst);
    }

    async fn begin_request(&self) -> Result<(), LocatorError> {
        self.counters.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.response_delay {
            tokio::time::sleep(delay).await;
        }
        if self.counters.unavailable.load(Ordering::SeqCst) {
            return Err(LocatorError::Unavailable("locator is not reachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LocatorPeer for RegistryLocator {
    async fn find_adapter(&self, adapter_id: &str) -> Result<EndpointReference, LocatorError> {
        self.begin_request().await?;
        self.registry
            .find_adapter(adapter_id)
            .ok_or_else(|| LocatorError::NotFound(format!("adapter `{}`", adapter_id)))
    }

    async fn find_object(&self, identity: &Identity) -> Result<EndpointReference, LocatorError> {
        self.begin_request().await?;
        self.registry
            .find_object(identity)
            .ok_or_else(|| LocatorError::NotFound(format!("object `{}`", identity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registry_locator_answers_and_counts() {
        let registry = LocatorRegistry::new();
        registry.set_adapter_endpoints("TestAdapter", vec![Endpoint::tcp("localhost", 12010)]);
        registry.add_object(Identity::new("test"), EndpointReference::indirect("TestAdapter"));

        let locator = RegistryLocator::new(registry.clone());

        let adapter = locator.find_adapter("TestAdapter").await.unwrap();
        assert_eq!(adapter.endpoints, vec![Endpoint::tcp("localhost", 12010)]);

        let object = locator.find_object(&Identity::new("test")).await.unwrap();
        assert!(object.is_indirect());

        let missing = locator.find_adapter("UnknownAdapter").await;
        assert!(matches!(missing, Err(LocatorError::NotFound(_))));

        assert_eq!(locator.request_count(), 3);
    }

    #[tokio::test]
    async fn test_unavailable_switch() {
        let registry = LocatorRegistry::new();
        registry.set_adapter_endpoints("A", vec![Endpoint::tcp("localhost", 1)]);
        let locator = RegistryLocator::new(registry);

        locator.set_unavailable(true);
        let result = locator.find_adapter("A").await;
        assert!(matches!(result, Err(LocatorError::Unavailable(_))));

        locator.set_unavailable(false);
        assert!(locator.find_adapter("A").await.is_ok());
    }

    #[test]
    fn test_registry_moves_and_removes() {
        let registry = LocatorRegistry::new();
        registry.set_adapter_endpoints("A", vec![Endpoint::tcp("host1", 1)]);
        registry.set_adapter_endpoints("A", vec![Endpoint::tcp("host2", 2)]);
        assert_eq!(
            registry.find_adapter("A").unwrap().endpoints,
            vec![Endpoint::tcp("host2", 2)]
        );

        assert!(registry.remove_adapter("A"));
        assert!(!registry.remove_adapter("A"));
        assert!(registry.find_adapter("A").is_none());
    }
}
