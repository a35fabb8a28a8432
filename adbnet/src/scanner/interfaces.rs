//! Local IPv4 interfaces and the /24 prefixes swept from them

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use pnet::datalink;
use pnet::ipnetwork::IpNetwork;
use tracing::debug;

/// Source of the host's own IPv4 addresses
pub trait InterfaceSource: Send + Sync {
    fn local_ipv4(&self) -> Vec<Ipv4Addr>;
}

/// Addresses of every interface that is up and not a loopback.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn local_ipv4(&self) -> Vec<Ipv4Addr> {
        let mut found = Vec::new();
        for iface in datalink::interfaces() {
            if !iface.is_up() || iface.is_loopback() {
                continue;
            }
            for ip in &iface.ips {
                if let IpNetwork::V4(net) = ip {
                    if !net.ip().is_loopback() {
                        debug!("Interface {} has {}", iface.name, net.ip());
                        found.push(net.ip());
                    }
                }
            }
        }
        found
    }
}

/// Fixed address list, used for `scan --from` and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticInterfaces(pub Vec<Ipv4Addr>);

impl InterfaceSource for StaticInterfaces {
    fn local_ipv4(&self) -> Vec<Ipv4Addr> {
        self.0.clone()
    }
}

/// Distinct /24 networks of `addrs`, in first-seen order.
pub fn prefixes(addrs: &[Ipv4Addr]) -> Vec<Ipv4Net> {
    let mut nets: Vec<Ipv4Net> = Vec::new();
    for addr in addrs {
        let Ok(net) = Ipv4Net::new(*addr, 24) else {
            continue;
        };
        let net = net.trunc();
        if !nets.contains(&net) {
            nets.push(net);
        }
    }
    nets
}

/// Suffixes 1 through 255 of a /24, ascending.
pub fn candidates(prefix: Ipv4Net) -> impl Iterator<Item = Ipv4Addr> {
    let base = u32::from(prefix.network());
    (1..=255u32).map(move |suffix| Ipv4Addr::from(base | suffix))
}
