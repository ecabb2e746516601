use chrono::{DateTime, Utc};
use serde::Serialize;

use super::helix::HelixStream;

pub const THUMBNAIL_WIDTH: u32 = 640;
pub const THUMBNAIL_HEIGHT: u32 = 360;

/// Point-in-time view of a channel, as returned to the dashboard.
///
/// Offline snapshots only carry `live` and `user_login`; the live fields are
/// flattened in when present.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StreamSnapshot {
    pub live: bool,
    #[serde(rename = "user_login")]
    pub channel_login: String,
    #[serde(flatten)]
    pub details: Option<LiveDetails>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LiveDetails {
    pub title: String,
    pub viewer_count: u64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl StreamSnapshot {
    pub fn offline(channel_login: impl Into<String>) -> Self {
        Self {
            live: false,
            channel_login: channel_login.into(),
            details: None,
        }
    }

    pub fn live(channel_login: impl Into<String>, details: LiveDetails) -> Self {
        Self {
            live: true,
            channel_login: channel_login.into(),
            details: Some(details),
        }
    }
}

impl LiveDetails {
    pub fn from_stream(stream: &HelixStream, game_name: Option<String>) -> Self {
        Self {
            title: stream.title.clone(),
            viewer_count: stream.viewer_count,
            started_at: stream.started_at,
            game_name,
            thumbnail_url: stream.thumbnail_url.as_deref().map(sized_thumbnail),
        }
    }
}

/// Fills the `{width}`/`{height}` placeholders of a Helix thumbnail template.
pub fn sized_thumbnail(template: &str) -> String {
    template
        .replace("{width}", &THUMBNAIL_WIDTH.to_string())
        .replace("{height}", &THUMBNAIL_HEIGHT.to_string())
}
