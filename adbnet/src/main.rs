//! adbnet - Entry Point

use clap::Parser;
use tracing::{info, warn};

use adbnet::app::cli::{Cli, Command};
use adbnet::app::options::AppOptions;
use adbnet::app::run::run;
use adbnet::logs::{init_logging, LogOptions};
use adbnet::storage::layout::StorageLayout;
use adbnet::storage::settings::{Settings, SharedSettings};
use adbnet::utils::version_info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Print version and exit
    if let Command::Version = cli.command {
        println!("{}", serde_json::to_string_pretty(&version_info())?);
        return Ok(());
    }

    let layout = cli.home.clone().map(StorageLayout::new).unwrap_or_default();
    layout.setup().await?;
    let settings = Settings::load(&layout.settings_file()).await?;

    // Initialize logging
    let log_options = LogOptions {
        log_level: cli.log_level.unwrap_or(settings.log_level),
        log_dir: Some(layout.logs_dir().path().to_path_buf()),
        json_format: cli.json_logs,
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let options = AppOptions::from_settings(layout, &settings);
    info!("Running {:?} with options: {:?}", cli.command, options);
    run(cli.command, options, SharedSettings::new(settings), await_shutdown_signal()).await?;
    Ok(())
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("SIGTERM received, shutting down...");
                        return;
                    }
                    result = tokio::signal::ctrl_c() => {
                        if result.is_ok() {
                            info!("Ctrl+C received, shutting down...");
                            return;
                        }
                    }
                }
            }
            Err(e) => warn!("Unable to listen for SIGTERM: {}", e),
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C received, shutting down..."),
        Err(e) => {
            warn!("Unable to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
