//! Local network scanner for debug-bridge devices.
//!
//! Candidates come from the /24 prefixes of the host's own IPv4 interfaces. Each
//! candidate gets a bounded TCP connect on the device port, and only reachable ones
//! are handed to the tool's `connect` handshake. Probes are pipelined with bounded
//! concurrency, but progress is reported strictly in address order.

pub mod device;
pub mod interfaces;
pub mod port;
pub mod subnet;

pub use device::{DeviceProbe, ProbeOptions, Prober};
pub use interfaces::{InterfaceSource, StaticInterfaces, SystemInterfaces};
pub use port::{PortProbe, TcpPortProbe};
pub use subnet::{ProgressStream, SubnetScanner};
