//! http-bridge: serve the diagnostic dump handler.
//!
//! ```text
//! http-bridge <host> <port> [--config <file>]
//! ```
//!
//! `GET /dump.txt` echoes request headers and parameters; every other path is
//! 404. The server runs until Ctrl+C and is stopped on every exit path.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use http_bridge::config::{load_config, ServerConfig};
use http_bridge::observability::{logging, metrics};
use http_bridge::{DumpHandler, HostAddress, HttpServer, IpPort};

#[derive(Parser)]
#[command(name = "http-bridge")]
#[command(about = "Embeddable HTTP server serving /dump.txt", long_about = None)]
struct Cli {
    /// Host name or IP address to bind
    host: String,

    /// Port to bind, 0 for any free port
    port: u16,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    config.lifecycle.stop_on_signal = true;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "http-bridge starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let host = HostAddress::with(&cli.host)?;
    let mut server = HttpServer::with_config(host, IpPort::from(cli.port), DumpHandler, &config)?;

    let served = server.start().and_then(|()| {
        if let Some(addr) = server.local_addr() {
            tracing::info!(address = %addr, "Listening, GET /dump.txt to inspect a request");
        }
        server.join()
    });
    if let Err(e) = &served {
        tracing::error!(error = %e, "Server failed");
    }

    if let Err(e) = server.stop() {
        tracing::warn!(error = %e, "Server stop failed");
    }

    tracing::info!("Shutdown complete");
    served.map_err(Into::into)
}
