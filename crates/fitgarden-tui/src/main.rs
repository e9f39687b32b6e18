//! `fitgarden-tui` — Terminal back-office for the FitGarden delivery kitchen.
//!
//! Built on [ratatui](https://ratatui.rs). The agenda screen lists the
//! day's bookings with a zone color strip and hosts the booking dialog;
//! the production screen derives the kitchen and route tallies from the
//! same snapshot. Screens are navigable via number keys (1-2).
//!
//! Logs are written to a file (default `/tmp/fitgarden-tui.log`) to avoid
//! corrupting the terminal UI. Backend calls run on detached tasks and
//! report back through the action channel; there is no background polling.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fitgarden_core::{AgendaService, BackendConfig, TlsVerification};

use crate::app::App;

/// Terminal back-office for FitGarden bookings.
#[derive(Parser, Debug)]
#[command(name = "fitgarden-tui", version, about)]
struct Cli {
    /// Backend URL (e.g., https://api.fitgarden.com.br)
    #[arg(short = 'b', long, env = "FITGARDEN_BACKEND")]
    backend: Option<String>,

    /// Access token
    #[arg(long, env = "FITGARDEN_TOKEN", hide_env = true)]
    token: Option<String>,

    /// Backend profile from the shared config file
    #[arg(short = 'p', long, env = "FITGARDEN_PROFILE")]
    profile: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(short = 'k', long, env = "FITGARDEN_INSECURE")]
    insecure: bool,

    /// Log file path (defaults to /tmp/fitgarden-tui.log)
    #[arg(long, default_value = "/tmp/fitgarden-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fitgarden_tui={log_level}")));

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("fitgarden-tui.log"));

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

/// Build a [`BackendConfig`] from CLI flags, if a URL was provided.
fn config_from_flags(cli: &Cli) -> Option<BackendConfig> {
    let url = cli.backend.as_deref()?.parse().ok()?;
    let tls = if cli.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };
    Some(BackendConfig {
        url,
        token: cli.token.clone().map(SecretString::from),
        tls,
        timeout: Duration::from_secs(30),
    })
}

/// Try loading a backend config from the shared config file.
fn config_from_file(cli: &Cli) -> Option<BackendConfig> {
    let cfg = fitgarden_config::load_config().ok()?;
    let profile_name = cli
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());
    let profile = cfg.profiles.get(&profile_name)?;
    fitgarden_config::profile_to_backend_config(profile, &profile_name).ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(
        backend = cli.backend.as_deref().unwrap_or("(not set)"),
        "starting fitgarden-tui"
    );

    // Priority: CLI flags > config file
    let backend_config = config_from_flags(&cli)
        .or_else(|| config_from_file(&cli))
        .ok_or_else(|| {
            eyre!(
                "no backend configured — pass --backend <url> or run `fitgarden config init` first"
            )
        })?;

    let api = Arc::new(
        backend_config
            .build_client()
            .map_err(|e| eyre!("{e}"))?,
    );
    let service = AgendaService::new(api);

    let mut app = App::new(service);
    app.run().await?;

    Ok(())
}
