//! Command-line interface definitions.
//!
//! Every option can also be set through the environment variable named next
//! to it, which is how the service is normally configured in containers.

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::CacheConfig;

/// Minecraft server MOTD embed service.
#[derive(Parser, Debug)]
#[command(name = "motd-embed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum number of cached server statuses.
    #[arg(long, env = "CACHE_CAPACITY", default_value_t = 1000)]
    pub cache_capacity: usize,

    /// Seconds a cached status stays fresh.
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 30)]
    pub cache_ttl_secs: u64,

    /// Seconds between sweeps of expired cache entries. 0 disables the sweep.
    #[arg(long, env = "CACHE_SWEEP_SECS", default_value_t = 0)]
    pub cache_sweep_secs: u64,

    /// Bound on one status query, connect included.
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 5)]
    pub fetch_timeout_secs: u64,

    /// URL prefix of the stylesheet, background and fallback icon.
    #[arg(long, env = "STATIC_BASE_URL", default_value = "/static")]
    pub static_base_url: String,

    /// The command to execute.
    #[clap(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service.
    Serve {
        /// Interface to bind.
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on.
        #[arg(long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },

    /// Look up one server and print its embed page to stdout.
    Render {
        /// Server address, `host` or `host:port`.
        address: String,
    },
}

impl Cli {
    /// Cache settings from the command line.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .max_capacity(self.cache_capacity)
            .ttl(Duration::from_secs(self.cache_ttl_secs))
            .cleanup_interval(Duration::from_secs(self.cache_sweep_secs))
            .build()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
