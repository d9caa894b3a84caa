//! Server status snapshot.

use crate::motd::Description;

/// Description shown for servers that could not be reached.
pub const OFFLINE_DESCRIPTION: &str = "Server Offline";

/// Version shown when the server did not report one.
pub const UNKNOWN_VERSION: &str = "Unknown";

/// What a game server reported about itself at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub online: bool,
    pub description: Description,
    pub players_online: i64,
    pub players_max: i64,
    pub version_name: String,
    /// Favicon as the server sent it. Not validated.
    pub icon: Option<String>,
}

impl StatusSnapshot {
    /// Placeholder used when the server could not be queried.
    pub fn offline() -> Self {
        Self {
            online: false,
            description: Description::Text(OFFLINE_DESCRIPTION.to_string()),
            players_online: 0,
            players_max: 0,
            version_name: UNKNOWN_VERSION.to_string(),
            icon: None,
        }
    }
}
