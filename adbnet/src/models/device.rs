//! Devices attached to the local debug-bridge server

use serde::{Deserialize, Serialize};

const LIST_HEADER: &str = "List of devices attached";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedDevice {
    /// Serial, or `host:port` for network devices
    pub serial: String,

    /// `device`, `offline`, `unauthorized`, ...
    pub state: String,
}

impl AttachedDevice {
    pub fn is_online(&self) -> bool {
        self.state == "device"
    }

    /// Parse the output of `adb devices`.
    ///
    /// Daemon chatter before the header (`* daemon started successfully`) and
    /// blank lines are ignored.
    pub fn parse_list<S: AsRef<str>>(lines: &[S]) -> Vec<AttachedDevice> {
        lines
            .iter()
            .map(|l| l.as_ref().trim())
            .skip_while(|l| !l.starts_with(LIST_HEADER))
            .skip(1)
            .filter(|l| !l.is_empty() && !l.starts_with('*'))
            .filter_map(|l| {
                let mut parts = l.split_whitespace();
                let serial = parts.next()?;
                let state = parts.next()?;
                Some(AttachedDevice {
                    serial: serial.to_string(),
                    state: state.to_string(),
                })
            })
            .collect()
    }
}
