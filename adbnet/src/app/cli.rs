//! Command-line arguments

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logs::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "adbnet", version, about = "Find Android devices on the local network and drive them over adb")]
pub struct Cli {
    /// Storage directory (default: ~/.adbnet)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the saved setting
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log to stderr as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sweep the local /24 networks for devices in wireless debugging mode
    Scan {
        /// Sweep the /24 around this address instead of the local interfaces
        #[arg(long)]
        from: Option<Ipv4Addr>,

        /// Device port (default: saved setting)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Connect to a device at host[:port]
    Connect { address: String },
    /// List attached devices
    Devices,
    /// Type text on the device
    Text { text: String },
    /// Send a key event by name, id or numeric code
    Key { key: String },
    /// Copy a local file to the device
    Push { source: String, target: String },
    /// Copy a file from the device
    Pull { source: String, target: String },
    /// List a path on the device
    Ls { path: String },
    /// Run a raw invocation, e.g. `adbnet run adb shell getprop`
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// Manage saved commands
    Commands {
        #[command(subcommand)]
        action: CommandsAction,
    },
    /// Manage key events
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print version information as JSON
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CommandsAction {
    List,
    Add {
        command: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    Remove { id: String },
    /// Run a saved command by id
    Run { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeysAction {
    List,
    Add {
        name: String,
        code: u32,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Remove a custom key by id
    Remove { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    Show,
    /// Path to the adb executable
    SetTool { path: String },
    /// Port devices listen on
    SetPort { port: u16 },
}
