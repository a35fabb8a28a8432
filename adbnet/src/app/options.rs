//! Application options

use crate::scanner::device::ProbeOptions;
use crate::scanner::subnet::DEFAULT_CONCURRENCY;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::{Settings, DEFAULT_DEVICE_PORT};

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub layout: StorageLayout,

    /// Port scanned and connected to when none is given
    pub device_port: u16,

    /// Probes in flight during a scan
    pub scan_concurrency: usize,

    pub probe: ProbeOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            layout: StorageLayout::default(),
            device_port: DEFAULT_DEVICE_PORT,
            scan_concurrency: DEFAULT_CONCURRENCY,
            probe: ProbeOptions::default(),
        }
    }
}

impl AppOptions {
    pub fn from_settings(layout: StorageLayout, settings: &Settings) -> Self {
        Self {
            layout,
            device_port: settings.device_port,
            scan_concurrency: settings.scan.concurrency,
            probe: ProbeOptions::from(&settings.scan),
        }
    }
}
