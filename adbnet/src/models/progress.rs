//! Scan progress events

use serde::{Deserialize, Serialize};

use crate::models::address::Address;

/// One event of a scan's progress stream.
///
/// A stream ends with exactly one event where `done` is true, `fraction_complete`
/// is 1.0 and `current_address` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Candidate about to be probed
    pub current_address: Option<Address>,

    /// Share of candidates already probed, in `[0, 1]`
    pub fraction_complete: f32,

    /// Devices found so far, in discovery order
    pub discovered: Vec<Address>,

    pub done: bool,
}

impl ScanProgress {
    pub fn probing(address: Address, fraction_complete: f32, discovered: Vec<Address>) -> Self {
        Self {
            current_address: Some(address),
            fraction_complete,
            discovered,
            done: false,
        }
    }

    pub fn finished(discovered: Vec<Address>) -> Self {
        Self {
            current_address: None,
            fraction_complete: 1.0,
            discovered,
            done: true,
        }
    }
}
