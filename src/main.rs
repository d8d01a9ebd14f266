//! Path-encoded HTTP forwarding proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                 PATH PROXY                   │
//!                       │                                              │
//!   GET/POST            │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   /proxy/<url>  ──────┼─▶│  CORS  │──▶│ handlers │──▶│ destination│  │
//!                       │  │ + trace│   │ GET/POST │   │  resolver  │  │
//!                       │  └────────┘   └──────────┘   └─────┬──────┘  │
//!                       │                                    ▼         │
//!   status + body       │  ┌────────┐                  ┌────────────┐  │
//!   ◀───────────────────┼──│ relay  │◀─────────────────│ forwarder  │◀─┼──── <url>
//!                       │  └────────┘                  └────────────┘  │
//!                       │                                              │
//!                       │  lifecycle: start / shutdown / crash signal  │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::sync::mpsc;

use path_proxy::config::{load_config, ProxyConfig};
use path_proxy::lifecycle::wait_for_termination;
use path_proxy::observability::{logging, metrics};
use path_proxy::ProxyServer;

#[derive(Parser)]
#[command(name = "path-proxy")]
#[command(about = "Forward GET/POST requests to the URL encoded in the path", long_about = None)]
struct Cli {
    /// Server listening port (overrides the config file).
    #[arg(long)]
    port: Option<u16>,

    /// Log output file path; logs go to stderr when unset.
    #[arg(long = "log")]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error; dpanic, panic and fatal log as error).
    #[arg(short = 'l', long = "level")]
    level: Option<String>,

    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ProxyConfig::default(),
    };
    let config = match cli.port {
        Some(port) => config.with_port(port),
        None => config,
    };

    let level = cli.level.as_deref().unwrap_or(&config.observability.log_level);
    if let Err(e) = logging::init(level, cli.log_file.as_deref()) {
        eprintln!("failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        keep_alive = config.listener.keep_alive,
        header_policy = ?config.forwarding.header_policy,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut server = match ProxyServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Create upstream client failed");
            return ExitCode::FAILURE;
        }
    };

    let (crash_tx, mut crash_rx) = mpsc::channel(1);
    let keep_alive = server.config().listener.keep_alive;
    if let Err(e) = server.start(Some(crash_tx), keep_alive) {
        tracing::error!(error = %e, "Start proxy server failed");
        return ExitCode::FAILURE;
    }
    tracing::info!("Proxy server start successful");

    let exit = tokio::select! {
        signal = wait_for_termination() => match signal {
            Ok(name) => {
                tracing::debug!(signal = name, "Caught signal for exit");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Install signal handlers failed");
                ExitCode::FAILURE
            }
        },
        _ = crash_rx.recv() => {
            tracing::error!("Proxy server crashed, quitting");
            ExitCode::FAILURE
        }
    };

    if let Err(e) = server.shutdown().await {
        tracing::error!(error = %e, "Proxy server shutdown failed");
    }

    tracing::info!("Proxy quit");
    exit
}
