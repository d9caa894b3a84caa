//! Error types for address resolution and status fetching.
//!
//! Client-input failures ([`ResolveError`]) carry a descriptive message meant
//! to be shown to the caller. Upstream failures ([`FetchError`]) never reach a
//! caller; the lookup turns them into an offline snapshot.

use std::io;
use std::net::IpAddr;

use thiserror::Error;

/// Why a user-supplied `host[:port]` string was rejected.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The port suffix is not an integer or lies outside `1..=65535`.
    #[error("invalid port: '{0}'")]
    InvalidPort(String),

    /// The port belongs to a well-known non-game service.
    #[error("port {0} is not allowed for security reasons")]
    BlockedPort(u16),

    /// The host is neither an IP literal nor a name that resolves.
    #[error("cannot resolve hostname: '{0}'")]
    UnresolvableHost(String),

    /// The host resolved to a private, loopback, link-local, reserved or
    /// multicast address.
    #[error("access to private/internal IP addresses is not allowed")]
    PrivateAddress(IpAddr),
}

/// Failure while querying a game server for its status.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connecting, reading or writing failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The exchange did not finish within the configured timeout.
    #[error("status request timed out")]
    Timeout,

    /// The server answered with something that is not a status response.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The status payload was not valid JSON.
    #[error("malformed status JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for address resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// A specialized Result type for status fetching.
pub type FetchResult<T> = Result<T, FetchError>;
