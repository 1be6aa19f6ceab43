//! Demo: resolve an adapter and an indirect object against an in-memory
//! locator, move the adapter, report the stale endpoints, and resolve again.

use locator_resolver::lifecycle::{setup_tracing, LocatorSystem, ResolverConfig};
use locator_resolver::locator::{LocatorRegistry, RegistryLocator};
use locator_resolver::model::{Endpoint, EndpointReference, Identity, ResolutionKey};
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let registry = LocatorRegistry::new();
    registry.set_adapter_endpoints("TestAdapter", vec![Endpoint::tcp("localhost", 12010)]);
    registry.add_object(Identity::new("hello"), EndpointReference::indirect("TestAdapter"));

    let locator = RegistryLocator::new(registry.clone());
    let system = LocatorSystem::with_config(locator.clone(), ResolverConfig::from_env());
    let invalidator = system.invalidator();

    let span = tracing::info_span!("cold_lookups");
    let first = async {
        // Both callers race on a cold cache and share the locator calls.
        let (a, b) = tokio::join!(
            system.resolver.resolve_object(Identity::new("hello")),
            system
                .resolver
                .resolve_with_generation(ResolutionKey::object(Identity::new("hello"))),
        );
        let endpoints = a.map_err(|e| e.to_string())?;
        info!(%endpoints, "Resolved hello");
        b.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(requests = locator.request_count(), "Locator requests after cold lookups");

    // The server restarts somewhere else; the old endpoints now refuse connections.
    registry.set_adapter_endpoints("TestAdapter", vec![Endpoint::tcp("localhost", 12011)]);

    let span = tracing::info_span!("after_move");
    async {
        let cached = system
            .resolver
            .resolve_adapter("TestAdapter")
            .await
            .map_err(|e| e.to_string())?;
        info!(%cached, "Still serving the cached answer");

        invalidator
            .report(&first)
            .await
            .map_err(|e| e.to_string())?;

        let fresh = system
            .resolver
            .resolve_with_generation(ResolutionKey::adapter("TestAdapter"))
            .await
            .map_err(|e| e.to_string())?;
        info!(endpoints = %fresh.value, generation = fresh.generation, "Re-resolved");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let stats = system.resolver.stats().await.map_err(|e| e.to_string())?;
    info!(?stats, "Resolver stats");

    drop(invalidator);
    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
