//! Resolver configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable overriding [`ResolverConfig::buffer_size`].
pub const BUFFER_SIZE_ENV: &str = "LOCATOR_RESOLVER_BUFFER_SIZE";

/// Environment variable overriding [`ResolverConfig::resolve_indirect`].
pub const RESOLVE_INDIRECT_ENV: &str = "LOCATOR_RESOLVER_INDIRECT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// How many requests may queue up in front of the resolver actor.
    pub buffer_size: usize,
    /// Follow objects published through an adapter to the adapter's endpoints.
    pub resolve_indirect: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            resolve_indirect: true,
        }
    }
}

impl ResolverConfig {
    /// Defaults overridden by the environment. Unparseable values are logged
    /// and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(BUFFER_SIZE_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => config.buffer_size = size,
                _ => warn!(var = BUFFER_SIZE_ENV, value = %raw, "Ignoring invalid buffer size"),
            }
        }

        if let Some(raw) = lookup(RESOLVE_INDIRECT_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.resolve_indirect = true,
                "0" | "false" | "no" | "off" => config.resolve_indirect = false,
                _ => warn!(var = RESOLVE_INDIRECT_ENV, value = %raw, "Ignoring invalid flag"),
            }
        }

        config
    }
}
