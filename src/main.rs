//! Entry point for the MOTD embed service.
//!
//! ```bash
//! motd-embed serve --port 8000
//! motd-embed render play.example.com
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use motd_embed::cli::{Cli, Command};
use motd_embed::server::{self, AppState};
use motd_embed::{render_embed, ExpiringCache, JavaPinger, StatusLookup};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let cache = ExpiringCache::new(cli.cache_config());
    let fetcher = Arc::new(JavaPinger::new(cli.fetch_timeout()));
    let lookup = StatusLookup::new(cache.clone(), fetcher);

    match &cli.command {
        Command::Serve { host, port } => {
            let addr = format!("{}:{}", host, port);
            let listener = TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {}", addr))?;
            let sweeper = cache.spawn_sweeper();

            info!(%addr, base_url = %cli.static_base_url, "MOTD embed service listening");

            let state = AppState::new(lookup, cli.static_base_url.as_str());
            server::serve(listener, state, shutdown_signal()).await?;

            if let Some(handle) = sweeper {
                handle.abort();
            }

            let stats = cache.stats();
            info!(
                hits = stats.hits,
                misses = stats.misses,
                evictions = stats.evictions,
                expirations = stats.expirations,
                size = stats.size,
                hit_rate = stats.hit_rate,
                "shut down"
            );
        }

        Command::Render { address } => {
            let snapshot = lookup.lookup(address).await?;
            println!("{}", render_embed(address, &snapshot, &cli.static_base_url));
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
