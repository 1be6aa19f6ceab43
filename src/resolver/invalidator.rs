//! Failure feedback from the transport layer.

use super::cache::InvalidationOutcome;
use super::client::ResolverClient;
use super::error::ResolutionError;
use super::message::Resolved;
use crate::model::ResolutionKey;
use tracing::{debug, info, instrument};

/// The narrow handle given to the transport layer.
///
/// A transport that fails to reach a resolved endpoint in a way that points
/// at stale location data (connection refused, object no longer hosted)
/// reports it here, pinned to the generation it dialed. Transient network
/// noise should not be reported.
#[derive(Clone)]
pub struct Invalidator {
    client: ResolverClient,
}

impl Invalidator {
    pub fn new(client: ResolverClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn on_endpoint_failure(
        &self,
        key: ResolutionKey,
        generation: u64,
    ) -> Result<InvalidationOutcome, ResolutionError> {
        let outcome = self.client.on_endpoint_failure(key, generation).await?;
        if outcome == InvalidationOutcome::Applied {
            info!("Stale endpoints discarded");
        }
        Ok(outcome)
    }

    /// Reports a failure on a whole [`Resolved`] answer.
    ///
    /// When the endpoints were reached through an adapter, the object entry
    /// that named the adapter is invalidated as well, pinned to its own
    /// generation, so an object that moved to another adapter is looked up
    /// again. Returns the outcome for `resolved.key`.
    pub async fn report(&self, resolved: &Resolved) -> Result<InvalidationOutcome, ResolutionError> {
        let outcome = self
            .on_endpoint_failure(resolved.key.clone(), resolved.generation)
            .await?;
        if let Some((object, generation)) = &resolved.via {
            let object_outcome = self
                .on_endpoint_failure(object.clone(), *generation)
                .await?;
            debug!(%object, ?object_outcome, "Indirect entry reported");
        }
        Ok(outcome)
    }
}
