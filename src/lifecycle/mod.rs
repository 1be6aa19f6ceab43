//! Runtime wiring: configuration, tracing setup and the [`LocatorSystem`]
//! that starts and stops a resolver.

pub mod config;
pub mod locator_system;
pub mod tracing;

pub use self::config::*;
pub use self::locator_system::*;
pub use self::tracing::*;
