//! Keys used to address an indirect reference.
//!
//! A remote object is named either by the adapter that hosts it or by its own
//! [`Identity`]. Both forms hash and compare structurally, so a
//! [`ResolutionKey`] can be used directly as the cache and coalescing key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a remote object: a name plus an optional category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub category: String,
}

impl Identity {
    /// Creates an identity with an empty category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: String::new(),
        }
    }

    /// Creates an identity inside the given category.
    pub fn with_category(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Renders `category/name`, or just `name` when the category is empty.
impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.category.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.category, self.name)
        }
    }
}

/// The logical name the resolver maps to concrete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionKey {
    /// Resolve every object hosted by an adapter.
    AdapterId(String),
    /// Resolve a single well-known object.
    ObjectIdentity(Identity),
}

impl ResolutionKey {
    pub fn adapter(id: impl Into<String>) -> Self {
        ResolutionKey::AdapterId(id.into())
    }

    pub fn object(identity: Identity) -> Self {
        ResolutionKey::ObjectIdentity(identity)
    }

    /// Checks the key is addressable; an empty adapter id or object name is not.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ResolutionKey::AdapterId(id) if id.is_empty() => {
                Err("adapter id must not be empty".to_string())
            }
            ResolutionKey::ObjectIdentity(identity) if identity.name.is_empty() => {
                Err(format!("object identity `{}` has an empty name", identity))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionKey::AdapterId(id) => write!(f, "adapter:{}", id),
            ResolutionKey::ObjectIdentity(identity) => write!(f, "object:{}", identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_compare_structurally() {
        let mut keys = HashSet::new();
        keys.insert(ResolutionKey::adapter("TestAdapter"));
        keys.insert(ResolutionKey::object(Identity::with_category("o1", "cat")));

        assert!(keys.contains(&ResolutionKey::AdapterId("TestAdapter".into())));
        assert!(keys.contains(&ResolutionKey::object(Identity::with_category("o1", "cat"))));
        // Same name in another category is a different object.
        assert!(!keys.contains(&ResolutionKey::object(Identity::new("o1"))));
    }

    #[test]
    fn test_display() {
        assert_eq!(ResolutionKey::adapter("A").to_string(), "adapter:A");
        assert_eq!(ResolutionKey::object(Identity::new("o1")).to_string(), "object:o1");
        assert_eq!(
            ResolutionKey::object(Identity::with_category("o1", "admin")).to_string(),
            "object:admin/o1"
        );
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        assert!(ResolutionKey::adapter("").validate().is_err());
        assert!(ResolutionKey::object(Identity::with_category("", "cat")).validate().is_err());
        assert!(ResolutionKey::adapter("A").validate().is_ok());
    }
}
