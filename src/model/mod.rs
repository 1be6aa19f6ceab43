//! Plain value types shared by the resolver, the locator peer and callers.

pub mod endpoint;
pub mod key;

pub use endpoint::*;
pub use key::*;
