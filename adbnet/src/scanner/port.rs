//! TCP reachability probe

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::trace;

/// Default connect timeout for a single candidate.
pub const PORT_TIMEOUT_MS: u64 = 1000;

#[async_trait]
pub trait PortProbe: Send + Sync {
    /// True only if a TCP connection to `host:port` completes within `timeout`.
    async fn is_open(&self, host: &str, port: u16, timeout: Duration) -> bool;
}

/// Plain TCP connect; nothing is sent or read.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpPortProbe;

#[async_trait]
impl PortProbe for TcpPortProbe {
    async fn is_open(&self, host: &str, port: u16, timeout: Duration) -> bool {
        // Name resolution counts against the same deadline.
        match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => {
                drop(stream);
                true
            }
            Ok(Err(e)) => {
                trace!("{}:{} closed: {}", host, port, e);
                false
            }
            Err(_) => {
                trace!("{}:{} timed out", host, port);
                false
            }
        }
    }
}
