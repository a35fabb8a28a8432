//! Command dispatch and terminal rendering

use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::Arc;

use colored::Colorize;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::app::cli::{Command, CommandsAction, ConfigAction, KeysAction};
use crate::app::options::AppOptions;
use crate::errors::AdbNetError;
use crate::exec::runner::{is_error_line, CommandRunner, LineStream, ShellRunner};
use crate::facade::{ExecutionFacade, Operation};
use crate::models::address::Address;
use crate::scanner::device::DeviceProbe;
use crate::scanner::interfaces::{InterfaceSource, StaticInterfaces, SystemInterfaces};
use crate::scanner::port::TcpPortProbe;
use crate::scanner::subnet::SubnetScanner;
use crate::storage::commands::CommandStore;
use crate::storage::keys::KeyEventStore;
use crate::storage::settings::SharedSettings;
use crate::utils::version_info;

/// Resolution of the scan progress bar
const PROGRESS_SCALE: u64 = 1000;

/// Run one command until it completes or `shutdown_signal` resolves.
///
/// On shutdown the command's future is dropped, which drops any open output or
/// progress stream and with it the running process and in-flight probes.
pub async fn run(
    command: Command,
    options: AppOptions,
    settings: SharedSettings,
    shutdown_signal: impl Future<Output = ()>,
) -> Result<(), AdbNetError> {
    tokio::select! {
        result = execute(command, &options, &settings) => result,
        _ = shutdown_signal => {
            info!("Shutdown signal received, cancelling...");
            eprintln!("{}", "cancelled".yellow());
            Ok(())
        }
    }
}

/// Wire the runner, probes and scanner into a facade.
pub fn build_facade(
    options: &AppOptions,
    settings: &SharedSettings,
    scan_from: Option<Ipv4Addr>,
    port: u16,
) -> ExecutionFacade {
    let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner::new(Arc::new(settings.clone())));
    let probe = Arc::new(DeviceProbe::new(
        Arc::new(TcpPortProbe),
        runner.clone(),
        options.probe.clone(),
    ));
    let interfaces: Arc<dyn InterfaceSource> = match scan_from {
        Some(ip) => Arc::new(StaticInterfaces(vec![ip])),
        None => Arc::new(SystemInterfaces),
    };
    let scanner = SubnetScanner::new(interfaces, probe.clone(), port).with_concurrency(options.scan_concurrency);
    ExecutionFacade::new(runner, probe, scanner)
}

async fn execute(command: Command, options: &AppOptions, settings: &SharedSettings) -> Result<(), AdbNetError> {
    let layout = &options.layout;
    let facade = || build_facade(options, settings, None, options.device_port);

    match command {
        Command::Scan { from, port } => {
            let facade = build_facade(options, settings, from, port.unwrap_or(options.device_port));
            scan(&facade).await
        }
        Command::Connect { address } => {
            let address = Address::parse_with_port(&address, options.device_port)?;
            if facade().connect(&address).await {
                println!("{} {}", "connected".green().bold(), address);
                Ok(())
            } else {
                Err(AdbNetError::NetworkError(format!("could not connect to {}", address)))
            }
        }
        Command::Devices => devices(&facade()).await,
        Command::Text { text } => print_lines(facade().run_named_operation(Operation::InputText { text })).await,
        Command::Key { key } => {
            let store = KeyEventStore::load(layout.custom_keys_file()).await?;
            let key = store
                .find(&key)
                .ok_or_else(|| AdbNetError::NotFound(format!("key {}", key)))?;
            info!("Sending key {} ({})", key.name, key.key_code);
            print_lines(facade().run_named_operation(Operation::KeyEvent { code: key.key_code })).await
        }
        Command::Push { source, target } => {
            print_lines(facade().run_named_operation(Operation::Push { source, target })).await
        }
        Command::Pull { source, target } => {
            print_lines(facade().run_named_operation(Operation::Pull { source, target })).await
        }
        Command::Ls { path } => print_lines(facade().run_named_operation(Operation::ListPath { path })).await,
        Command::Run { command } => {
            print_lines(facade().run_named_operation(Operation::Custom(command.join(" ")))).await
        }
        Command::Commands { action } => {
            let mut store = CommandStore::load(layout.commands_file()).await?;
            match action {
                CommandsAction::List => {
                    for saved in store.all() {
                        println!("{}  {}", saved.id.dimmed(), saved.command.bold());
                        if !saved.description.is_empty() {
                            println!("    {}", saved.description);
                        }
                    }
                    Ok(())
                }
                CommandsAction::Add { command, description } => {
                    let saved = store.add(command, description).await?;
                    println!("{} {}", "saved".green(), saved.id);
                    Ok(())
                }
                CommandsAction::Remove { id } => {
                    if !store.remove(&id).await? {
                        return Err(AdbNetError::NotFound(format!("command {}", id)));
                    }
                    println!("{} {}", "removed".green(), id);
                    Ok(())
                }
                CommandsAction::Run { id } => {
                    let saved = store
                        .get(&id)
                        .ok_or_else(|| AdbNetError::NotFound(format!("command {}", id)))?;
                    print_lines(facade().run_named_operation(Operation::Custom(saved.command.clone()))).await
                }
            }
        }
        Command::Keys { action } => {
            let mut store = KeyEventStore::load(layout.custom_keys_file()).await?;
            match action {
                KeysAction::List => {
                    for key in store.all() {
                        let marker = if key.is_custom { "*" } else { " " };
                        println!("{:>4} {} {:<16} {}", key.key_code, marker, key.name.bold(), key.description);
                    }
                    Ok(())
                }
                KeysAction::Add { name, code, description } => {
                    let key = store.add_custom(name, code, description).await?;
                    println!("{} {}", "saved".green(), key.id);
                    Ok(())
                }
                KeysAction::Remove { id } => {
                    if !store.remove(&id).await? {
                        return Err(AdbNetError::NotFound(format!("custom key {}", id)));
                    }
                    println!("{} {}", "removed".green(), id);
                    Ok(())
                }
            }
        }
        Command::Config { action } => {
            let changed = !matches!(action, ConfigAction::Show);
            match action {
                ConfigAction::Show => {}
                ConfigAction::SetTool { path } => settings.update(|s| s.tool_path = path),
                ConfigAction::SetPort { port } => settings.update(|s| s.device_port = port),
            }
            let current = settings.snapshot();
            if changed {
                current.save(&layout.settings_file()).await?;
            }
            println!("{}", serde_json::to_string_pretty(&current)?);
            Ok(())
        }
        Command::Version => {
            println!("{}", serde_json::to_string_pretty(&version_info())?);
            Ok(())
        }
    }
}

async fn scan(facade: &ExecutionFacade) -> Result<(), AdbNetError> {
    let pb = ProgressBar::new(PROGRESS_SCALE);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {percent:>3}% {msg}")
            .map_err(|e| AdbNetError::Internal(e.to_string()))?
            .progress_chars("=>-"),
    );

    let mut progress = facade.scan_for_devices();
    let mut reported = 0;
    let mut found = Vec::new();
    while let Some(event) = progress.next().await {
        for address in event.discovered.iter().skip(reported) {
            pb.println(format!("{} {}", "found".green().bold(), address));
        }
        reported = event.discovered.len();
        pb.set_position((event.fraction_complete * PROGRESS_SCALE as f32) as u64);
        if let Some(address) = &event.current_address {
            pb.set_message(address.to_string());
        }
        if event.done {
            found = event.discovered;
        }
    }
    pb.finish_and_clear();

    if found.is_empty() {
        println!("{}", "no devices found".yellow());
    } else {
        println!("{} device(s) found:", found.len());
        for address in &found {
            println!("  {}", address);
        }
    }
    Ok(())
}

async fn devices(facade: &ExecutionFacade) -> Result<(), AdbNetError> {
    let devices = facade.attached_devices().await;
    if devices.is_empty() {
        println!("{}", "no devices attached".yellow());
        return Ok(());
    }
    for device in devices {
        let state = if device.is_online() {
            device.state.green()
        } else {
            device.state.red()
        };
        println!("{:<24} {}", device.serial, state);
    }
    Ok(())
}

/// Print command output as it arrives; the synthetic error line goes to stderr.
async fn print_lines(mut lines: LineStream) -> Result<(), AdbNetError> {
    while let Some(line) = lines.next().await {
        if is_error_line(&line) {
            eprintln!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}
