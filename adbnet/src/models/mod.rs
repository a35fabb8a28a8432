//! Data types shared by the scanner, the facade and the CLI

pub mod address;
pub mod device;
pub mod progress;
