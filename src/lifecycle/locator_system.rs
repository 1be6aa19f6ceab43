use super::config::ResolverConfig;
use crate::locator::LocatorPeer;
use crate::resolver::{Invalidator, ResolverActor, ResolverClient};
use tracing::{error, info};

/// Owns a running resolver: the actor task plus the client handed to callers.
///
/// Each `LocatorSystem` has its own cache, so tests can build as many
/// isolated instances as they like.
///
/// # Example
///
/// ```ignore
/// let system = LocatorSystem::new(RegistryLocator::new(registry));
///
/// let endpoints = system.resolver.resolve_adapter("TestAdapter").await?;
/// let invalidator = system.invalidator();
///
/// drop(invalidator);
/// system.shutdown().await?;
/// ```
pub struct LocatorSystem {
    /// Client for resolving keys.
    pub resolver: ResolverClient,

    /// Task handle of the resolver actor (used for graceful shutdown).
    handle: tokio::task::JoinHandle<()>,
}

impl LocatorSystem {
    /// Starts a resolver with the default configuration.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn new<P: LocatorPeer>(peer: P) -> Self {
        Self::with_config(peer, ResolverConfig::default())
    }

    pub fn with_config<P: LocatorPeer>(peer: P, config: ResolverConfig) -> Self {
        info!(?config, "Starting locator system");
        let (actor, resolver) = ResolverActor::new(peer, &config);
        let handle = tokio::spawn(actor.run());
        Self { resolver, handle }
    }

    /// A handle for the transport layer to report stale endpoints.
    pub fn invalidator(&self) -> Invalidator {
        Invalidator::new(self.resolver.clone())
    }

    /// Closes the resolver and waits for the actor to finish.
    ///
    /// The actor only stops once *every* client is gone, so drop cloned
    /// clients and invalidators first. Returns an error if the actor task
    /// panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down locator system...");

        drop(self.resolver);

        if let Err(e) = self.handle.await {
            error!("Resolver task failed: {:?}", e);
            return Err(format!("Resolver task failed: {:?}", e));
        }

        info!("Locator system shutdown complete.");
        Ok(())
    }
}
