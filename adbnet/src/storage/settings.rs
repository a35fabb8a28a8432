//! Settings file management

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AdbNetError;
use crate::exec::runner::ToolPath;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Name the invocation grammar uses for the debug-bridge tool
pub const DEFAULT_TOOL: &str = "adb";

/// TCP port devices listen on in wireless debugging mode
pub const DEFAULT_DEVICE_PORT: u16 = 5555;

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the debug-bridge executable; a bare name is looked up on `PATH`
    #[serde(default = "default_tool_path")]
    pub tool_path: String,

    /// Port probed and connected to on candidate devices
    #[serde(default = "default_device_port")]
    pub device_port: u16,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Network scan tuning
    #[serde(default)]
    pub scan: ScanSettings,
}

fn default_tool_path() -> String {
    DEFAULT_TOOL.to_string()
}

fn default_device_port() -> u16 {
    DEFAULT_DEVICE_PORT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool_path: default_tool_path(),
            device_port: default_device_port(),
            log_level: LogLevel::default(),
            scan: ScanSettings::default(),
        }
    }
}

/// Scan settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Probes kept in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// TCP connect timeout per candidate
    #[serde(default = "default_port_timeout_ms")]
    pub port_timeout_ms: u64,

    /// Upper bound on the `connect` handshake
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,
}

fn default_concurrency() -> usize {
    16
}

fn default_port_timeout_ms() -> u64 {
    1000
}

fn default_handshake_timeout_ms() -> u64 {
    2000
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            port_timeout_ms: default_port_timeout_ms(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file does not exist.
    pub async fn load(file: &File) -> Result<Self, AdbNetError> {
        match file.read_json_opt::<Settings>().await? {
            Some(settings) => {
                debug!("Loaded settings from {}", file.path().display());
                settings.validate()?;
                Ok(settings)
            }
            None => {
                debug!("No settings at {}, using defaults", file.path().display());
                Ok(Self::default())
            }
        }
    }

    pub async fn save(&self, file: &File) -> Result<(), AdbNetError> {
        self.validate()?;
        file.write_json(self).await?;
        info!("Settings saved to {}", file.path().display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AdbNetError> {
        if self.tool_path.trim().is_empty() {
            return Err(AdbNetError::ValidationError("tool_path must not be empty".into()));
        }
        if self.device_port == 0 {
            return Err(AdbNetError::ValidationError("device_port must be greater than 0".into()));
        }
        if self.scan.concurrency == 0 {
            return Err(AdbNetError::ValidationError("scan.concurrency must be greater than 0".into()));
        }
        if self.scan.port_timeout_ms == 0 || self.scan.handshake_timeout_ms == 0 {
            return Err(AdbNetError::ValidationError("scan timeouts must be greater than 0".into()));
        }
        Ok(())
    }
}

impl ToolPath for Settings {
    fn tool_path(&self) -> String {
        self.tool_path.clone()
    }
}

/// Settings shared between the composition root and the runner.
///
/// The runner reads the tool path on every invocation, so an update made through
/// [`SharedSettings::update`] applies to the next command.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn snapshot(&self) -> Settings {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut Settings)) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}

impl ToolPath for SharedSettings {
    fn tool_path(&self) -> String {
        self.snapshot().tool_path
    }
}
