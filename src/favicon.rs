//! Validation of server-supplied favicon data URIs.
//!
//! Favicons come straight from an untrusted game server and end up in an
//! `<img src>` attribute, so only small base64 image data URIs are accepted.

use tracing::warn;

/// Longest favicon accepted, in characters (about 100 KB of decoded image).
pub const MAX_FAVICON_LEN: usize = 150_000;

/// Data URI prefixes of the accepted image types.
pub const ALLOWED_PREFIXES: [&str; 5] = [
    "data:image/png",
    "data:image/jpeg",
    "data:image/jpg",
    "data:image/gif",
    "data:image/webp",
];

/// Path of the placeholder icon, relative to the static base URL.
pub const FALLBACK_ICON: &str = "unknown_server.jpg";

/// Check that `favicon` is a safe base64 image data URI.
pub fn validate(favicon: &str) -> bool {
    if favicon.is_empty() {
        return false;
    }

    if !favicon.starts_with("data:") {
        warn!("favicon does not start with data: URI scheme");
        return false;
    }

    if !ALLOWED_PREFIXES.iter().any(|prefix| favicon.starts_with(prefix)) {
        warn!("favicon is not an allowed image type");
        return false;
    }

    if !favicon.contains("base64,") {
        warn!("favicon does not contain base64 marker");
        return false;
    }

    // Byte length bounds the character count from above.
    if favicon.len() > MAX_FAVICON_LEN && favicon.chars().count() > MAX_FAVICON_LEN {
        warn!(len = favicon.chars().count(), "favicon exceeds maximum size");
        return false;
    }

    true
}

/// The `src` to use for the server icon: the favicon when it validates,
/// otherwise the fallback image under `base_url`.
pub fn icon_source(favicon: Option<&str>, base_url: &str) -> String {
    match favicon {
        Some(icon) if validate(icon) => icon.to_string(),
        Some(_) => {
            warn!("invalid or unsafe favicon rejected, using fallback");
            format!("{}/{}", base_url, FALLBACK_ICON)
        }
        None => format!("{}/{}", base_url, FALLBACK_ICON),
    }
}
