//! Command execution: invocation building and the streaming shell runner

pub mod invocation;
pub mod runner;

pub use runner::{CommandRunner, LineStream, ShellRunner, ToolPath};
