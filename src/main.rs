//! Waypoint demo server.
//!
//! Loads a TOML config (or defaults), builds the demo engine and serves it
//! until Ctrl+C.
//!
//! ```text
//! waypoint --config waypoint.toml --bind 127.0.0.1:9999
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use waypoint::app::build_engine;
use waypoint::config::{load_config, validate_config, ConfigError, ServerConfig};
use waypoint::observability::{logging, metrics};
use waypoint::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "HTTP routing and middleware demo server", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);
    tracing::info!("waypoint v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        auth_enabled = config.auth.enabled,
        rate_limit_enabled = config.rate_limit.enabled,
        "Configuration loaded"
    );

    let metrics_handle = if config.observability.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder");
                None
            }
        }
    } else {
        None
    };

    let shutdown = Shutdown::new();
    let engine = build_engine(&config, &shutdown, metrics_handle);
    for (method, pattern) in engine.router().routes() {
        tracing::debug!(method = %method, pattern = %pattern, "Route");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    tokio::spawn(shutdown.clone().trigger_on_ctrl_c());

    let server = HttpServer::new(engine, config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
