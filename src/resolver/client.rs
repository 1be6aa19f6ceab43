//! The caller-facing handle to the resolver actor.

use super::cache::{CacheEntry, InvalidationOutcome};
use super::error::ResolutionError;
use super::message::{Resolved, ResolverRequest, ResolverStats, Response};
use crate::model::{EndpointReference, Identity, ResolutionKey};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// A cheap, cloneable handle to a running [`ResolverActor`](super::ResolverActor).
///
/// Dropping a caller's future while it waits on a coalesced lookup only
/// abandons that caller; the shared locator call carries on for everyone else.
#[derive(Clone)]
pub struct ResolverClient {
    sender: mpsc::Sender<ResolverRequest>,
    resolve_indirect: bool,
}

impl ResolverClient {
    pub fn new(sender: mpsc::Sender<ResolverRequest>, resolve_indirect: bool) -> Self {
        Self {
            sender,
            resolve_indirect,
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> ResolverRequest,
    ) -> Result<T, ResolutionError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ResolutionError::ResolverClosed)?;
        response.await.map_err(|_| ResolutionError::ResolverDropped)?
    }

    /// Resolves `key` to the endpoints currently hosting it.
    pub async fn resolve(&self, key: ResolutionKey) -> Result<EndpointReference, ResolutionError> {
        self.resolve_with_generation(key)
            .await
            .map(|resolved| resolved.value)
    }

    pub async fn resolve_adapter(
        &self,
        adapter_id: impl Into<String>,
    ) -> Result<EndpointReference, ResolutionError> {
        self.resolve(ResolutionKey::AdapterId(adapter_id.into()))
            .await
    }

    pub async fn resolve_object(
        &self,
        identity: Identity,
    ) -> Result<EndpointReference, ResolutionError> {
        self.resolve(ResolutionKey::ObjectIdentity(identity)).await
    }

    /// Resolves `key` and reports which cache entry and generation the
    /// endpoints came from.
    ///
    /// An object published through an adapter is followed one level: the
    /// adapter is resolved (and cached) in turn, and the returned
    /// [`Resolved`] names the adapter entry, with the object entry in `via`.
    #[instrument(skip(self))]
    pub async fn resolve_with_generation(
        &self,
        key: ResolutionKey,
    ) -> Result<Resolved, ResolutionError> {
        let resolved = self
            .request(|respond_to| ResolverRequest::Resolve {
                key: key.clone(),
                respond_to,
            })
            .await?;

        if !self.resolve_indirect || !resolved.value.is_indirect() {
            return Ok(resolved);
        }
        let Some(adapter_id) = resolved.value.adapter_id.clone() else {
            return Ok(resolved);
        };

        debug!(%adapter_id, "Following indirect reference");
        let through_adapter = self
            .request(|respond_to| ResolverRequest::Resolve {
                key: ResolutionKey::AdapterId(adapter_id.clone()),
                respond_to,
            })
            .await;

        match through_adapter {
            Ok(mut endpoints) => {
                endpoints.via = Some((key, resolved.generation));
                Ok(endpoints)
            }
            Err(ResolutionError::NotFound(_)) => Err(ResolutionError::NotFound(format!(
                "{} is published through unknown adapter `{}`",
                key, adapter_id
            ))),
            Err(e) => Err(e),
        }
    }

    /// Reports that endpoints obtained at `generation` proved stale.
    ///
    /// Only invalidates the entry if it still holds that generation; a report
    /// about a superseded answer is ignored.
    #[instrument(skip(self))]
    pub async fn on_endpoint_failure(
        &self,
        key: ResolutionKey,
        generation: u64,
    ) -> Result<InvalidationOutcome, ResolutionError> {
        self.request(|respond_to| ResolverRequest::Invalidate {
            key,
            generation,
            respond_to,
        })
        .await
    }

    /// Marks every cached entry invalid. Returns how many were valid.
    #[instrument(skip(self))]
    pub async fn invalidate_all(&self) -> Result<usize, ResolutionError> {
        self.request(|respond_to| ResolverRequest::InvalidateAll { respond_to })
            .await
    }

    /// Returns the cached entry for `key`, including an invalid one.
    pub async fn inspect(&self, key: ResolutionKey) -> Result<Option<CacheEntry>, ResolutionError> {
        self.request(|respond_to| ResolverRequest::Inspect { key, respond_to })
            .await
    }

    pub async fn stats(&self) -> Result<ResolverStats, ResolutionError> {
        self.request(|respond_to| ResolverRequest::Stats { respond_to })
            .await
    }
}
