//! MTMC client: entry point.
//!
//! Runs an interactive session against an MTMC emulator server, or sends a
//! single control request and exits.
//!
//! # Usage
//!
//! ```text
//! mtmc-client [OPTIONS] [COMMAND]
//!
//! Commands:
//!   run                interactive session (default)
//!   control <ACTION>   POST /control/<reset|pause|step>
//!   speed <HZ>         POST /speed
//!   mem-format         POST /memFormat
//!   init-config        write a default config file [--force to overwrite]
//!
//! Options:
//!   --server-url <URL>         server root [default: http://localhost:8081]
//!   --config <PATH>            config file [default: <config dir>/mtmc/client.toml]
//!   --frame-interval-ms <MS>   controller poll interval [default: 16]
//!   --log-level <FILTER>       fallback log filter when RUST_LOG is unset
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                 | Option                |
//! |--------------------------|-----------------------|
//! | `MTMC_SERVER_URL`        | `--server-url`        |
//! | `MTMC_CONFIG`            | `--config`            |
//! | `MTMC_FRAME_INTERVAL_MS` | `--frame-interval-ms` |
//! | `MTMC_LOG`               | `--log-level`         |
//!
//! Options left unset fall through to the config file, then to the built-in
//! defaults.
//!
//! # Architecture overview
//!
//! ```text
//! stdin ──► read_stdin ──► input_rx ─┐
//! /sse  ──► PushChannel ──► event_rx ─┼─► dispatch loop ──► ClientSession ──► HttpRequestSink ──► POST
//! frame timer ───────────────────────┘           │
//!                                                └──► TerminalRenderer ──► stdout
//! ```
//!
//! Every handler runs to completion on the dispatch loop, so the session is
//! never shared between tasks.

use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mtmc_core::{ControlAction, OutboundRequest};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mtmc_client::application::{ClientSession, LoggingHighlighter, VirtualGamepads};
use mtmc_client::domain::ClientConfig;
use mtmc_client::infrastructure::storage::config::{
    config_file_path, load_config, save_config, ConfigOverrides, FileConfig,
};
use mtmc_client::infrastructure::{
    build_http_client, read_stdin, EventRegistry, HttpRequestSink, PushChannel, TerminalRenderer,
};

/// Capacity of the push event queue.
const EVENT_QUEUE_DEPTH: usize = 256;
/// Capacity of the local input queue.
const INPUT_QUEUE_DEPTH: usize = 64;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Headless client for the MTMC emulator.
#[derive(Debug, Parser)]
#[command(
    name = "mtmc-client",
    about = "Terminal client for the MTMC emulator server",
    version
)]
struct Cli {
    /// Root URL of the MTMC server.
    #[arg(long, env = "MTMC_SERVER_URL")]
    server_url: Option<String>,

    /// Path of the TOML config file.
    #[arg(long, env = "MTMC_CONFIG")]
    config: Option<PathBuf>,

    /// Controller poll interval in milliseconds.
    #[arg(long, env = "MTMC_FRAME_INTERVAL_MS")]
    frame_interval_ms: Option<u64>,

    /// Log filter used when `RUST_LOG` is not set (e.g. `debug`).
    #[arg(long, env = "MTMC_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Interactive session (default).
    Run,
    /// Send an execution control action.
    Control {
        /// reset, pause, or step.
        action: ControlAction,
    },
    /// Set the emulator speed in instructions per second.
    Speed { hz: u32 },
    /// Toggle the memory panel number format.
    MemFormat,
    /// Write a config file with the built-in defaults to the `--config`
    /// path or the default location.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            server_url: self.server_url.clone(),
            frame_interval_ms: self.frame_interval_ms,
            log_level: self.log_level.clone(),
        }
    }

    /// Loads the config file and applies the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its
    /// mapping tables are invalid.
    fn into_client_config(self) -> anyhow::Result<(ClientConfig, Command)> {
        let file = load_config(self.config.as_deref()).context("failed to load config file")?;
        let config = file
            .into_client_config(&self.overrides())
            .context("invalid configuration")?;
        Ok((config, self.command.unwrap_or(Command::Run)))
    }
}

impl Command {
    /// The single request a one-shot command sends, or `None` for commands
    /// that send nothing.
    fn one_shot_request(&self) -> Option<OutboundRequest> {
        match self {
            Command::Run | Command::InitConfig { .. } => None,
            Command::Control { action } => Some(OutboundRequest::Control(*action)),
            Command::Speed { hz } => Some(OutboundRequest::Speed(*hz)),
            Command::MemFormat => Some(OutboundRequest::ToggleMemoryFormat),
        }
    }
}

/// Writes the default config to `path`, or to the platform default location.
/// Returns the path written.
///
/// # Errors
///
/// Fails if the file already exists and `force` is not set, if no default
/// location can be determined, or if the file cannot be written.
fn write_default_config(path: Option<&Path>, force: bool) -> anyhow::Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path().context("no default config location")?,
    };
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    save_config(&FileConfig::default(), &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Runs before the existing file is loaded, so a broken file can be reset.
    if let Some(Command::InitConfig { force }) = cli.command {
        let path = write_default_config(cli.config.as_deref(), force)?;
        println!("wrote {}", path.display());
        return Ok(());
    }
    let (config, command) = cli.into_client_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // RUST_LOG wins; otherwise the configured level.  Logs go to stderr so
    // stdout carries only the console.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = build_http_client().context("failed to build HTTP client")?;

    if let Some(request) = command.one_shot_request() {
        let sink = HttpRequestSink::new(client, config.server_url.clone());
        sink.send(&request)
            .await
            .with_context(|| format!("{} request failed", request.label()))?;
        info!(request = request.label(), "request accepted");
        return Ok(());
    }

    run_session(config, client).await
}

/// The interactive dispatch loop.
async fn run_session(config: ClientConfig, client: reqwest::Client) -> anyhow::Result<()> {
    info!(server = %config.server_url, "MTMC client starting");

    let channel = PushChannel::new(client.clone(), &config.sse_url(), EventRegistry::all())
        .context("invalid push endpoint")?;
    let sink = HttpRequestSink::new(client, config.server_url.clone());
    let mut session = ClientSession::new(
        config.surface_maps(),
        Box::new(sink),
        Box::new(LoggingHighlighter),
    );

    let (event_tx, mut event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let (input_tx, mut input_rx) = mpsc::channel(INPUT_QUEUE_DEPTH);

    let push_task = tokio::spawn(async move {
        if let Err(e) = channel.run(event_tx).await {
            error!(error = %e, "push channel could not start");
        }
    });
    tokio::spawn(read_stdin(input_tx));

    let mut pads = VirtualGamepads::default();
    let mut frames = tokio::time::interval(config.frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut renderer = TerminalRenderer::default();
    let mut stdout = std::io::stdout();
    renderer
        .render(session.console().render(), &mut stdout)
        .context("failed to write console")?;

    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => {
                if let Err(e) = session.apply_raw(&event.name, &event.data) {
                    warn!(event = %event.name, error = %e, "dropping malformed push event");
                }
            }
            input = input_rx.recv() => {
                let Some(input) = input else { break };
                if let ControlFlow::Break(()) = session.apply_input(input, &mut pads) {
                    break;
                }
            }
            _ = frames.tick() => session.on_frame(&mut pads),
            _ = &mut ctrl_c => {
                info!("received Ctrl+C; shutting down");
                break;
            }
        }
        renderer
            .render(session.console().render(), &mut stdout)
            .context("failed to write console")?;
    }

    push_task.abort();
    writeln!(stdout).context("failed to write console")?;
    info!("MTMC client stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
