//! Error types surfaced to resolver callers.

use crate::locator::LocatorError;
use thiserror::Error;

/// Errors returned by [`ResolverClient`](super::ResolverClient).
///
/// Every waiter on a coalesced lookup receives a clone of the same error, so
/// the type is `Clone`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// The target is unknown to the locator. Terminal; never cached.
    #[error("Resolution not found: {0}")]
    NotFound(String),

    /// The locator could not be reached. Not cached; callers may retry.
    #[error("Resolution unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be resolved at all (e.g. an empty adapter id).
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Resolver closed")]
    ResolverClosed,

    #[error("Resolver dropped response channel")]
    ResolverDropped,
}

impl ResolutionError {
    /// Only an unreachable locator is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolutionError::Unavailable(_))
    }
}

impl From<LocatorError> for ResolutionError {
    fn from(e: LocatorError) -> Self {
        match e {
            LocatorError::NotFound(target) => ResolutionError::NotFound(target),
            LocatorError::Unavailable(reason) => ResolutionError::Unavailable(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_errors_keep_their_policy() {
        let not_found: ResolutionError = LocatorError::NotFound("adapter `A`".into()).into();
        assert_eq!(not_found, ResolutionError::NotFound("adapter `A`".into()));
        assert!(!not_found.is_retryable());

        let unavailable: ResolutionError = LocatorError::Unavailable("timeout".into()).into();
        assert!(unavailable.is_retryable());
        assert!(!ResolutionError::ResolverClosed.is_retryable());
    }
}
