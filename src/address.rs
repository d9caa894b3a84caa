//! Parsing and validation of user-supplied `host[:port]` strings.
//!
//! Validation happens once per request. The resolved IP is kept on the
//! [`ServerAddress`] so that callers can connect to exactly the address that
//! passed the checks instead of resolving the host a second time.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use tokio::net::lookup_host;
use tracing::info;

use crate::error::{ResolveError, ResolveResult};
use crate::ip_filter::is_non_public_ip;

/// Port used when the address has no `:port` suffix.
pub const DEFAULT_PORT: u16 = 25565;

/// Well-known service ports that are never probed: FTP, SSH, Telnet, SMTP,
/// HTTP(S), POP3, IMAP, MySQL, PostgreSQL, Redis and MongoDB.
pub const BLOCKED_PORTS: [u16; 13] = [
    20, 21, 22, 23, 25, 80, 443, 110, 143, 3306, 5432, 6379, 27017,
];

/// A validated game server address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    host: String,
    port: u16,
    ip: IpAddr,
}

impl ServerAddress {
    /// The host as the user wrote it (brackets stripped from IPv6 literals).
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The public IP the host resolved to when it was validated.
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Socket address of the validated IP and port.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }

    /// Normalized `host:port` string used as the cache key.
    pub fn cache_key(&self) -> String {
        self.to_string().to_ascii_lowercase()
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Split `raw` into host and port and apply the port rules.
///
/// The string is split on the last `:`. Without one the port defaults to
/// [`DEFAULT_PORT`]. No DNS lookup happens here.
pub fn parse_address(raw: &str) -> ResolveResult<(String, u16)> {
    let raw = raw.trim();

    let (host, port) = match raw.rsplit_once(':') {
        Some((host, port_str)) => {
            let port: i64 = port_str
                .trim()
                .parse()
                .map_err(|_| ResolveError::InvalidPort(port_str.to_string()))?;
            if !(1..=65535).contains(&port) {
                return Err(ResolveError::InvalidPort(port_str.to_string()));
            }
            (host, port as u16)
        }
        None => (raw, DEFAULT_PORT),
    };

    if BLOCKED_PORTS.contains(&port) {
        return Err(ResolveError::BlockedPort(port));
    }

    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    Ok((host.to_string(), port))
}

/// Parse and validate `raw`, resolving the host to a single public IP.
///
/// # Errors
/// - [`ResolveError::InvalidPort`] for a non-numeric or out-of-range port.
/// - [`ResolveError::BlockedPort`] for a port in [`BLOCKED_PORTS`].
/// - [`ResolveError::UnresolvableHost`] when the DNS lookup fails.
/// - [`ResolveError::PrivateAddress`] when the IP is not publicly routable.
pub async fn resolve(raw: &str) -> ResolveResult<ServerAddress> {
    let (host, port) = parse_address(raw).map_err(|e| {
        info!(address = raw, error = %e, "rejected server address");
        e
    })?;

    let ip = lookup_ip(&host, port).await?;
    if is_non_public_ip(ip) {
        info!(address = raw, %ip, "rejected non-public server address");
        return Err(ResolveError::PrivateAddress(ip));
    }

    Ok(ServerAddress { host, port, ip })
}

/// IP literals are used as-is; names get one forward lookup and the first
/// answer wins.
async fn lookup_ip(host: &str, port: u16) -> ResolveResult<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let unresolvable = || ResolveError::UnresolvableHost(host.to_string());
    if host.is_empty() {
        return Err(unresolvable());
    }

    let mut addrs = lookup_host((host, port)).await.map_err(|e| {
        info!(host, error = %e, "DNS lookup failed");
        unresolvable()
    })?;

    addrs.next().map(|addr| addr.ip()).ok_or_else(unresolvable)
}
