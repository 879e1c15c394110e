//! Frappuccino café service.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌────────────────────────────────────────────────────┐
//!                   │                    FRAPPUCCINO                     │
//!                   │                                                    │
//!  Client Request   │  ┌─────────┐   ┌────────────┐   ┌──────────────┐   │
//!  ─────────────────┼─▶│  http   │──▶│  routing   │──▶│   handlers   │   │
//!                   │  │ server  │   │ matcher +  │   │ orders/menu/ │   │
//!                   │  └─────────┘   │ dispatcher │   │ inventory/   │   │
//!                   │       ▲        └─────┬──────┘   │ reports      │   │
//!                   │       │              │ no match └──────┬───────┘   │
//!  Client Response  │  ┌────┴─────┐        │                 ▼           │
//!  ◀────────────────┼──│ response │◀───────┘          ┌──────────────┐   │
//!                   │  │ (errors) │◀──────────────────│    store     │   │
//!                   │  └──────────┘                   │ (CafeStore)  │   │
//!                   │                                 └──────────────┘   │
//!                   │  config · observability · lifecycle                │
//!                   └────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use frappuccino::http::HttpServer;
use frappuccino::lifecycle::{signals, startup, Shutdown};
use frappuccino::observability;

#[derive(Parser)]
#[command(name = "frappuccino")]
#[command(about = "Café order, menu and inventory service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "FRAPPUCCINO_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = startup::load(args.config.as_deref())?;

    observability::logging::init(&config.observability);
    tracing::info!("frappuccino v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        popular_items_limit = config.reports.popular_items_limit,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = startup::open_store(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config.clone(), store.clone());
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));
    signals::supervise(&shutdown, signals::wait_for_signal(), server_task).await??;

    startup::persist_store(&config, &store);
    tracing::info!("Shutdown complete");
    Ok(())
}
