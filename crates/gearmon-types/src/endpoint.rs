use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default gearmand admin port.
pub const DEFAULT_PORT: u16 = 4730;

/// A `host[:port]` endpoint of one queue server.
///
/// The port defaults to [`DEFAULT_PORT`] when the configured string omits it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Create an endpoint from an explicit host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    /// Parse a `"host"` or `"host:port"` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None => {
                if s.is_empty() {
                    return Err(EndpointParseError::EmptyHost);
                }
                Ok(Endpoint::new(s, DEFAULT_PORT))
            }
            Some((host, port_str)) => {
                if host.is_empty() {
                    return Err(EndpointParseError::EmptyHost);
                }
                let port: u16 = port_str
                    .parse()
                    .map_err(|_| EndpointParseError::InvalidPort(port_str.to_string()))?;
                Ok(Endpoint::new(host, port))
            }
        }
    }
}

/// Errors when parsing an [`Endpoint`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointParseError {
    #[error("empty host")]
    EmptyHost,
    #[error("invalid port number: {0:?}")]
    InvalidPort(String),
}
