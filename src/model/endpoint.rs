//! Resolved locator answers.
//!
//! An [`EndpointReference`] is what the locator hands back for a key. It is
//! either *direct* (a list of concrete endpoints the transport can dial) or
//! *indirect* (only an adapter id, which must be resolved again).
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport protocol of a concrete endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    Tcp,
    Udp,
    Ssl,
    Ws,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transport::Tcp => "tcp",
            Transport::Udp => "udp",
            Transport::Ssl => "ssl",
            Transport::Ws => "ws",
        };
        f.write_str(name)
    }
}

/// A single network endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
    /// Connection timeout hint for the transport, in milliseconds.
    pub timeout_ms: Option<u32>,
}

impl Endpoint {
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self {
            transport: Transport::Tcp,
            host: host.into(),
            port,
            timeout_ms: None,
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -h {} -p {}", self.transport, self.host, self.port)?;
        if let Some(timeout) = self.timeout_ms {
            write!(f, " -t {}", timeout)?;
        }
        Ok(())
    }
}

/// Marshaling encoding the transport must use when talking to the endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodingVersion {
    pub major: u8,
    pub minor: u8,
}

impl Default for EncodingVersion {
    fn default() -> Self {
        Self { major: 1, minor: 1 }
    }
}

impl fmt::Display for EncodingVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// An immutable locator answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointReference {
    pub endpoints: Vec<Endpoint>,
    pub encoding: EncodingVersion,
    /// Set when the answer is expressed through an adapter.
    pub adapter_id: Option<String>,
}

impl EndpointReference {
    /// A direct reference to the given endpoints.
    pub fn direct(endpoints: Vec<Endpoint>) -> Self {
        Self {
            endpoints,
            encoding: EncodingVersion::default(),
            adapter_id: None,
        }
    }

    /// An indirect reference that only names the hosting adapter.
    pub fn indirect(adapter_id: impl Into<String>) -> Self {
        Self {
            endpoints: Vec::new(),
            encoding: EncodingVersion::default(),
            adapter_id: Some(adapter_id.into()),
        }
    }

    pub fn with_encoding(mut self, encoding: EncodingVersion) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn is_indirect(&self) -> bool {
        self.endpoints.is_empty() && self.adapter_id.is_some()
    }

    /// An answer with neither endpoints nor an adapter id locates nothing.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty() && self.adapter_id.is_none()
    }
}

impl fmt::Display for EndpointReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.endpoints.is_empty() {
            return match &self.adapter_id {
                Some(adapter) => write!(f, "@ {}", adapter),
                None => f.write_str("<empty>"),
            };
        }
        let rendered: Vec<String> = self.endpoints.iter().map(|e| e.to_string()).collect();
        f.write_str(&rendered.join(":"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_and_indirect() {
        let direct = EndpointReference::direct(vec![Endpoint::tcp("localhost", 12010)]);
        assert!(!direct.is_indirect());
        assert!(!direct.is_empty());

        let indirect = EndpointReference::indirect("TestAdapter");
        assert!(indirect.is_indirect());
        assert!(!indirect.is_empty());

        assert!(EndpointReference::direct(Vec::new()).is_empty());
    }

    #[test]
    fn test_encoding_is_part_of_the_answer() {
        let default = EndpointReference::direct(vec![Endpoint::tcp("localhost", 12010)]);
        assert_eq!(default.encoding.to_string(), "1.1");

        let legacy = default
            .clone()
            .with_encoding(EncodingVersion { major: 1, minor: 0 });
        assert_eq!(legacy.encoding.to_string(), "1.0");
        assert_eq!(legacy.endpoints, default.endpoints);
        assert_ne!(legacy, default);
    }

    #[test]
    fn test_display() {
        let reference = EndpointReference::direct(vec![
            Endpoint::tcp("10.0.0.1", 10000),
            Endpoint::tcp("10.0.0.2", 10000).with_timeout(500),
        ]);
        assert_eq!(
            reference.to_string(),
            "tcp -h 10.0.0.1 -p 10000:tcp -h 10.0.0.2 -p 10000 -t 500"
        );
        assert_eq!(EndpointReference::indirect("A").to_string(), "@ A");
    }
}
