//! # Mock Locator
//!
//! An expectation-based [`LocatorPeer`] for testing the resolver without a
//! registry behind it.
//!
//! Each expected lookup is queued with a canned answer. Lookups are matched in
//! FIFO order; a lookup that does not match the next expectation (or arrives
//! when none is left) answers `Unavailable` and is recorded, so that
//! [`MockLocator::verify`] fails the test.
//!
//! | Scenario | Builder call |
//! |----------|--------------|
//! | Target found | `return_ok(reference)` |
//! | Target unknown | `return_not_found()` |
//! | Locator down | `return_unavailable(reason)` |
//!
//! ```rust,ignore
//! let mock = MockLocator::new();
//! mock.expect_find_adapter("TestAdapter").return_ok(reference);
//!
//! let system = LocatorSystem::new(mock.clone());
//! system.resolver.resolve_adapter("TestAdapter").await?;
//! mock.verify();
//! ```

use super::{LocatorError, LocatorPeer};
use crate::model::{EndpointReference, Identity};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Which lookup an expectation is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExpectedCall {
    FindAdapter(String),
    FindObject(Identity),
}

struct Expectation {
    call: ExpectedCall,
    response: Result<EndpointReference, LocatorError>,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    unexpected: Vec<String>,
    calls: usize,
}

/// Expectation-tracking locator double. Cloning shares the expectations.
#[derive(Clone, Default)]
pub struct MockLocator {
    state: Arc<Mutex<MockState>>,
    response_delay: Option<Duration>,
}

impl MockLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds every answer back for `delay`, keeping the coalescing window open.
    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = Some(delay);
        self
    }

    /// Expects a `find_adapter` lookup.
    pub fn expect_find_adapter(&self, adapter_id: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            call: ExpectedCall::FindAdapter(adapter_id.into()),
            state: self.state.clone(),
        }
    }

    /// Expects a `find_object` lookup.
    pub fn expect_find_object(&self, identity: Identity) -> ExpectationBuilder {
        ExpectationBuilder {
            call: ExpectedCall::FindObject(identity),
            state: self.state.clone(),
        }
    }

    /// Number of lookups received, matched or not.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    /// Panics unless every expectation was consumed and nothing unexpected arrived.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.unexpected.is_empty() {
            panic!("Unexpected locator requests: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn answer(&self, call: ExpectedCall) -> Result<EndpointReference, LocatorError> {
        let response = {
            let mut state = self.lock();
            state.calls += 1;
            let matched = state
                .expectations
                .front()
                .is_some_and(|next| next.call == call);
            if matched {
                state.expectations.pop_front().map(|e| e.response)
            } else {
                state.unexpected.push(format!("{:?}", call));
                None
            }
        };

        if let Some(delay) = self.response_delay {
            tokio::time::sleep(delay).await;
        }

        response.unwrap_or_else(|| {
            Err(LocatorError::Unavailable(format!(
                "unexpected locator request: {:?}",
                call
            )))
        })
    }
}

#[async_trait]
impl LocatorPeer for MockLocator {
    async fn find_adapter(&self, adapter_id: &str) -> Result<EndpointReference, LocatorError> {
        self.answer(ExpectedCall::FindAdapter(adapter_id.to_string()))
            .await
    }

    async fn find_object(&self, identity: &Identity) -> Result<EndpointReference, LocatorError> {
        self.answer(ExpectedCall::FindObject(identity.clone())).await
    }
}

/// Builder that completes an expectation with its canned answer.
pub struct ExpectationBuilder {
    call: ExpectedCall,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    pub fn return_ok(self, reference: EndpointReference) {
        self.push(Ok(reference));
    }

    pub fn return_not_found(self) {
        let target = match &self.call {
            ExpectedCall::FindAdapter(id) => format!("adapter `{}`", id),
            ExpectedCall::FindObject(identity) => format!("object `{}`", identity),
        };
        self.push(Err(LocatorError::NotFound(target)));
    }

    pub fn return_unavailable(self, reason: impl Into<String>) {
        self.push(Err(LocatorError::Unavailable(reason.into())));
    }

    fn push(self, response: Result<EndpointReference, LocatorError>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.expectations.push_back(Expectation {
            call: self.call,
            response,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Endpoint;

    #[tokio::test]
    async fn test_mock_locator_with_expectations() {
        let mock = MockLocator::new();
        let reference = EndpointReference::direct(vec![Endpoint::tcp("localhost", 12010)]);

        mock.expect_find_adapter("TestAdapter").return_ok(reference.clone());
        mock.expect_find_object(Identity::new("missing")).return_not_found();

        assert_eq!(mock.find_adapter("TestAdapter").await, Ok(reference));
        let missing = mock.find_object(&Identity::new("missing")).await;
        assert!(matches!(missing, Err(LocatorError::NotFound(_))));

        assert_eq!(mock.calls(), 2);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected locator requests")]
    async fn test_unexpected_request_fails_verify() {
        let mock = MockLocator::new();
        mock.expect_find_adapter("A").return_unavailable("down");

        let result = mock.find_adapter("B").await;
        assert!(matches!(result, Err(LocatorError::Unavailable(_))));

        mock.verify();
    }
}
