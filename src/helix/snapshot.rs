use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::client::{normalize_login, HelixClient};
use crate::error::HelixError;
use crate::models::{LiveDetails, StreamSnapshot};

/// Advice for shared caches in front of the dashboard API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheControl {
    pub s_maxage: u32,
    pub stale_while_revalidate: u32,
}

/// Lets the UI poll freely without every poll reaching Helix.
pub const SNAPSHOT_CACHE_CONTROL: CacheControl = CacheControl {
    s_maxage: 15,
    stale_while_revalidate: 45,
};

impl fmt::Display for CacheControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "s-maxage={}, stale-while-revalidate={}",
            self.s_maxage, self.stale_while_revalidate
        )
    }
}

/// A snapshot plus the caching advice that goes with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub snapshot: StreamSnapshot,
    pub cache_control: CacheControl,
}

/// Entry point used by the HTTP layer to read a channel's live status.
pub struct SnapshotService {
    client: HelixClient,
}

impl SnapshotService {
    pub fn new(client: HelixClient) -> Self {
        Self { client }
    }

    /// Reads the current status of `channel_login`.
    ///
    /// Errors from the token or stream lookups are returned as-is; the caller
    /// decides how to present them. Nothing is retried.
    pub async fn get_snapshot(&self, channel_login: &str) -> Result<Snapshot, HelixError> {
        let login = normalize_login(channel_login)?;

        let snapshot = match self.client.fetch_stream(&login).await? {
            None => StreamSnapshot::offline(login),
            Some(record) => {
                let details = LiveDetails::from_stream(&record.stream, record.game_name);
                StreamSnapshot::live(login, details)
            }
        };

        info!(
            event_name = "snapshot.served",
            event_domain = "snapshot",
            channel = snapshot.channel_login.as_str(),
            live = snapshot.live,
            "stream snapshot built"
        );

        Ok(Snapshot {
            snapshot,
            cache_control: SNAPSHOT_CACHE_CONTROL,
        })
    }
}

/// Canned live snapshot for demo mode. Never touches the network.
pub fn demo_snapshot(channel_login: &str, now: DateTime<Utc>) -> Snapshot {
    let details = LiveDetails {
        title: "Chill & chat • setup • musique".to_string(),
        viewer_count: 324,
        started_at: now - Duration::minutes(42),
        game_name: Some("Just Chatting".to_string()),
        thumbnail_url: None,
    };
    Snapshot {
        snapshot: StreamSnapshot::live(channel_login, details),
        cache_control: SNAPSHOT_CACHE_CONTROL,
    }
}
