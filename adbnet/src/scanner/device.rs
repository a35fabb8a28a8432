//! Device probe: reachability check plus the tool's `connect` handshake

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, warn};

use crate::exec::invocation;
use crate::exec::runner::{is_error_line, CommandRunner};
use crate::models::address::Address;
use crate::scanner::port::{PortProbe, PORT_TIMEOUT_MS};
use crate::storage::settings::ScanSettings;

/// Default upper bound on the handshake.
pub const HANDSHAKE_TIMEOUT_MS: u64 = 2000;

/// Decides whether a device answers at an address
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, address: &Address) -> bool;
}

#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// TCP connect deadline
    pub port_timeout: Duration,

    /// Deadline for the whole `connect` handshake, process exit included
    pub handshake_timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port_timeout: Duration::from_millis(PORT_TIMEOUT_MS),
            handshake_timeout: Duration::from_millis(HANDSHAKE_TIMEOUT_MS),
        }
    }
}

impl From<&ScanSettings> for ProbeOptions {
    fn from(settings: &ScanSettings) -> Self {
        Self {
            port_timeout: Duration::from_millis(settings.port_timeout_ms),
            handshake_timeout: Duration::from_millis(settings.handshake_timeout_ms),
        }
    }
}

/// Whether `connect` output acknowledges a device.
///
/// Matches both `connected to 10.0.0.5:5555` and `already connected to ...`.
pub fn is_acknowledged(output: &str) -> bool {
    output.contains("connected") || output.contains("already")
}

pub struct DeviceProbe {
    ports: Arc<dyn PortProbe>,
    runner: Arc<dyn CommandRunner>,
    options: ProbeOptions,
}

impl DeviceProbe {
    pub fn new(ports: Arc<dyn PortProbe>, runner: Arc<dyn CommandRunner>, options: ProbeOptions) -> Self {
        Self {
            ports,
            runner,
            options,
        }
    }

    /// Run the `connect` handshake against an address the caller already knows.
    ///
    /// The handshake's output is collected under a hard deadline; if it runs over,
    /// the stream is dropped, which kills the tool process.
    pub async fn connect(&self, address: &Address) -> bool {
        let command = match invocation::connect(address) {
            Ok(command) => command,
            Err(e) => {
                warn!("Refusing to connect to {}: {}", address, e);
                return false;
            }
        };

        let output = self.runner.run(&command).collect::<Vec<String>>();
        match tokio::time::timeout(self.options.handshake_timeout, output).await {
            Ok(lines) => {
                if let Some(error) = lines.iter().find(|l| is_error_line(l.as_str())) {
                    debug!("Handshake with {} failed: {}", address, error);
                    return false;
                }
                let output = lines.join("\n");
                let acknowledged = is_acknowledged(&output);
                debug!("Handshake with {}: {} ({:?})", address, acknowledged, output);
                acknowledged
            }
            Err(_) => {
                debug!("Handshake with {} timed out", address);
                false
            }
        }
    }
}

#[async_trait]
impl Prober for DeviceProbe {
    async fn probe(&self, address: &Address) -> bool {
        if !self
            .ports
            .is_open(&address.host, address.port, self.options.port_timeout)
            .await
        {
            return false;
        }
        debug!("{} is reachable, attempting handshake", address);
        self.connect(address).await
    }
}
