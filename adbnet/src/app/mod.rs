//! Command-line composition root

pub mod cli;
pub mod options;
pub mod run;
