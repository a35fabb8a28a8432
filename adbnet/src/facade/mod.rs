//! Execution facade
//!
//! The one entry point presentation code talks to: scan for devices, connect to one,
//! list attached devices, and run named operations with their output streamed back.
//! User-supplied arguments are escaped here before anything reaches the runner.

pub mod listing;

use std::sync::Arc;

use futures::StreamExt;
use tracing::info;

use crate::exec::invocation;
use crate::exec::runner::{CommandRunner, LineStream};
use crate::models::address::Address;
use crate::models::device::AttachedDevice;
use crate::scanner::device::DeviceProbe;
use crate::scanner::subnet::{ProgressStream, SubnetScanner};

pub use listing::PathKind;

/// Operations with a fixed invocation shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    InputText { text: String },
    Push { source: String, target: String },
    Pull { source: String, target: String },
    ListPath { path: String },
    KeyEvent { code: u32 },
    Devices,
    Version,
    /// A full invocation passed through unchanged, e.g. a saved command
    Custom(String),
}

impl Operation {
    /// Invocation string. For `ListPath` this is the first of its two passes.
    pub fn invocation(&self) -> String {
        match self {
            Operation::InputText { text } => invocation::input_text(text),
            Operation::Push { source, target } => invocation::push(source, target),
            Operation::Pull { source, target } => invocation::pull(source, target),
            Operation::ListPath { path } => invocation::list_path(path),
            Operation::KeyEvent { code } => invocation::key_event(*code),
            Operation::Devices => invocation::devices(),
            Operation::Version => invocation::version(),
            Operation::Custom(command) => command.trim().to_string(),
        }
    }
}

pub struct ExecutionFacade {
    runner: Arc<dyn CommandRunner>,
    probe: Arc<DeviceProbe>,
    scanner: SubnetScanner,
}

impl ExecutionFacade {
    pub fn new(runner: Arc<dyn CommandRunner>, probe: Arc<DeviceProbe>, scanner: SubnetScanner) -> Self {
        Self {
            runner,
            probe,
            scanner,
        }
    }

    /// Sweep the local /24 networks. Each call is an independent scan.
    pub fn scan_for_devices(&self) -> ProgressStream {
        self.scanner.scan()
    }

    pub async fn connect(&self, address: &Address) -> bool {
        info!("Connecting to {}", address);
        self.probe.connect(address).await
    }

    pub fn run_named_operation(&self, operation: Operation) -> LineStream {
        match operation {
            Operation::ListPath { path } => {
                info!("Listing {}", path);
                listing::list_path(self.runner.clone(), &path)
            }
            other => {
                let command = other.invocation();
                info!("Running: {}", command);
                self.runner.run(&command)
            }
        }
    }

    /// Devices the tool currently knows about, in its reported order.
    pub async fn attached_devices(&self) -> Vec<AttachedDevice> {
        let lines: Vec<String> = self.runner.run(&invocation::devices()).collect().await;
        AttachedDevice::parse_list(&lines)
    }

    /// True if at least one attached device is online.
    pub async fn is_device_connected(&self) -> bool {
        self.attached_devices().await.iter().any(AttachedDevice::is_online)
    }
}
