//! `netsketch-tui` — interactive terminal canvas for network sketches.
//!
//! Built on [ratatui](https://ratatui.rs). The canvas drives the same
//! [`InteractionController`](netsketch_core::InteractionController) as the
//! `netsketch` CLI, so selection, connect mode and port confirmation
//! behave identically on both front ends.
//!
//! Logs are written to a file (default `/tmp/netsketch-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod viewport;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Terminal canvas for sketching and reviewing network topologies.
#[derive(Parser, Debug)]
#[command(name = "netsketch-tui", version, about)]
struct Cli {
    /// Project file to open (created on first save if missing)
    #[arg(short = 'f', long, env = "NETSKETCH_PROJECT")]
    project: Option<PathBuf>,

    /// Log file path (defaults to /tmp/netsketch-tui.log)
    #[arg(long, default_value = "/tmp/netsketch-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may reach stdout/stderr while the
/// terminal is in raw mode. The returned guard flushes the log on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "netsketch_tui={log_level},netsketch_core={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("netsketch-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let cfg = netsketch_config::load_config_or_default();
    let path = netsketch_config::project_path(cli.project.as_deref(), &cfg);
    info!(project = %path.display(), "starting netsketch-tui");

    let mut app = App::new(cfg, path);
    app.open_project();
    app.run().await?;

    Ok(())
}
