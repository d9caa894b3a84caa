//! # MOTD Embed
//!
//! Renders the status message of a Minecraft server as an HTML badge.
//!
//! A request names a server as `host[:port]`. The address is checked before
//! anything touches the network: the port must not belong to a well-known
//! non-game service and the host must resolve to a public IP. Statuses are
//! kept in a bounded, expiring cache so that popular servers are not queried
//! on every request. The status message's `§` formatting codes are turned
//! into `mcformat-*` CSS classes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use motd_embed::{render_embed, CacheConfig, ExpiringCache, JavaPinger, StatusLookup};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), motd_embed::ResolveError> {
//! let cache = ExpiringCache::new(CacheConfig::default());
//! let lookup = StatusLookup::new(cache, Arc::new(JavaPinger::default()));
//!
//! let snapshot = lookup.lookup("play.example.com").await?;
//! let html = render_embed("play.example.com", &snapshot, "/static");
//! # Ok(())
//! # }
//! ```
//!
//! ## Formatting codes
//!
//! ```
//! use motd_embed::motd::parse;
//!
//! let html = parse("§6Gold§rPlain");
//! assert!(html.contains(r#"<span class="mcformat mcformat-gold">Gold</span>"#));
//! assert!(html.ends_with(r#"<span class="mcformat mcformat-reset">Plain</span>"#));
//! ```

pub mod address;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod favicon;
pub mod ip_filter;
pub mod lookup;
pub mod motd;
pub mod ping;
pub mod server;
pub mod stats;
pub mod status;
pub mod template;

pub(crate) mod entry;
pub(crate) mod storage;

pub use address::{resolve, ServerAddress};
pub use cache::ExpiringCache;
pub use config::CacheConfig;
pub use error::{FetchError, ResolveError};
pub use lookup::StatusLookup;
pub use motd::{parse, parse_tree, Description};
pub use ping::{JavaPinger, StatusFetcher};
pub use stats::StatsSnapshot;
pub use status::StatusSnapshot;
pub use template::render_embed;
