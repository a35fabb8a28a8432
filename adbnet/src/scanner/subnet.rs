//! Subnet sweep with ordered progress reporting
//!
//! The sweep is a lazy [`ProgressStream`]. For each candidate it first reports the
//! candidate, then waits for that candidate's probe result. Up to `concurrency`
//! probes run ahead of the reporting position, but results are consumed in candidate
//! order, so the event sequence is the same as a sequential sweep.
//!
//! `fraction_complete` is global across all prefixes: the number of candidates
//! already probed divided by the total candidate count.

use std::net::Ipv4Addr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::FutureExt;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, info, warn};

use crate::models::address::Address;
use crate::models::progress::ScanProgress;
use crate::scanner::device::Prober;
use crate::scanner::interfaces::{self, InterfaceSource};

/// Progress events of one scan; the last one has `done == true`
pub type ProgressStream = BoxStream<'static, ScanProgress>;

/// Default number of probes in flight
pub const DEFAULT_CONCURRENCY: usize = 16;

#[derive(Clone)]
pub struct SubnetScanner {
    interfaces: Arc<dyn InterfaceSource>,
    prober: Arc<dyn Prober>,
    port: u16,
    concurrency: usize,
}

impl SubnetScanner {
    pub fn new(interfaces: Arc<dyn InterfaceSource>, prober: Arc<dyn Prober>, port: u16) -> Self {
        Self {
            interfaces,
            prober,
            port,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Start a fresh sweep. Nothing happens until the stream is polled; dropping it
    /// abandons the in-flight probes.
    pub fn scan(&self) -> ProgressStream {
        stream::unfold(ScanState::Pending(self.clone()), step).boxed()
    }

    fn plan(&self) -> Vec<Address> {
        let local: Vec<Ipv4Addr> = self.interfaces.local_ipv4();
        let prefixes = interfaces::prefixes(&local);
        info!(
            "Scanning {} prefix(es) on port {}: {:?}",
            prefixes.len(),
            self.port,
            prefixes
        );
        prefixes
            .into_iter()
            .flat_map(interfaces::candidates)
            .map(|ip| Address::from_ipv4(ip, self.port))
            .collect()
    }

    fn start(&self) -> Sweep {
        let candidates = self.plan();
        let prober = self.prober.clone();
        let results = stream::iter(candidates.clone())
            .map(move |address| {
                let prober = prober.clone();
                async move {
                    // A misbehaving probe counts as "no device" for its address only.
                    match AssertUnwindSafe(prober.probe(&address)).catch_unwind().await {
                        Ok(found) => found,
                        Err(_) => {
                            warn!("Probe of {} panicked", address);
                            false
                        }
                    }
                }
            })
            .buffered(self.concurrency)
            .boxed();

        Sweep {
            candidates,
            results,
            next: 0,
            awaiting: false,
            discovered: Vec::new(),
        }
    }
}

struct Sweep {
    candidates: Vec<Address>,
    results: BoxStream<'static, bool>,
    /// Index of the candidate reported next, or being probed when `awaiting`
    next: usize,
    awaiting: bool,
    discovered: Vec<Address>,
}

impl Sweep {
    fn fraction(&self) -> f32 {
        if self.candidates.is_empty() {
            return 1.0;
        }
        self.next as f32 / self.candidates.len() as f32
    }
}

enum ScanState {
    Pending(SubnetScanner),
    Sweeping(Sweep),
    Done,
}

async fn step(state: ScanState) -> Option<(ScanProgress, ScanState)> {
    let mut sweep = match state {
        ScanState::Pending(scanner) => scanner.start(),
        ScanState::Sweeping(sweep) => sweep,
        ScanState::Done => return None,
    };

    if sweep.awaiting {
        let found = sweep.results.next().await.unwrap_or(false);
        let address = &sweep.candidates[sweep.next];
        if found && !sweep.discovered.contains(address) {
            info!("Found device at {}", address);
            sweep.discovered.push(address.clone());
        } else {
            debug!("No device at {}", address);
        }
        sweep.next += 1;
        sweep.awaiting = false;
    }

    match sweep.candidates.get(sweep.next) {
        Some(address) => {
            let progress = ScanProgress::probing(address.clone(), sweep.fraction(), sweep.discovered.clone());
            sweep.awaiting = true;
            Some((progress, ScanState::Sweeping(sweep)))
        }
        None => {
            info!(
                "Scan complete: {} device(s) in {} candidate(s)",
                sweep.discovered.len(),
                sweep.candidates.len()
            );
            Some((ScanProgress::finished(sweep.discovered), ScanState::Done))
        }
    }
}
