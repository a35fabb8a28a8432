//! Device addresses

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AdbNetError;
use crate::storage::settings::DEFAULT_DEVICE_PORT;

/// A device candidate: host plus debug-bridge port.
///
/// Equality is exact host string and port; `192.168.1.5` and `192.168.001.005`
/// are different addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub host: String,
    pub port: u16,
}

impl Address {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn from_ipv4(ip: Ipv4Addr, port: u16) -> Self {
        Self::new(ip.to_string(), port)
    }

    /// Parse `host` or `host:port`, using `default_port` when the port is omitted.
    pub fn parse_with_port(input: &str, default_port: u16) -> Result<Self, AdbNetError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AdbNetError::ValidationError("address must not be empty".into()));
        }

        match input.rsplit_once(':') {
            Some((host, port)) => {
                if host.is_empty() {
                    return Err(AdbNetError::ValidationError(format!("missing host in {}", input)));
                }
                let port: u16 = port
                    .parse()
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or_else(|| AdbNetError::ValidationError(format!("invalid port in {}", input)))?;
                Ok(Self::new(host, port))
            }
            None => Ok(Self::new(input, default_port)),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Address {
    type Err = AdbNetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_port(s, DEFAULT_DEVICE_PORT)
    }
}
