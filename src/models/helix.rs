//! Wire schemas for the Twitch identity endpoint and the Helix API.
//!
//! Only the fields we read are modelled; anything else in the payload is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Lifetime assumed when the identity endpoint omits `expires_in`.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// Body of a successful client-credentials grant.
#[derive(Deserialize, Debug, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    DEFAULT_TOKEN_TTL_SECONDS
}

/// The `{ "data": [...] }` envelope every Helix collection endpoint uses.
#[derive(Deserialize, Debug, Clone)]
pub struct HelixData<T> {
    pub data: Vec<T>,
}

/// One entry of `GET /streams`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HelixStream {
    #[serde(default)]
    pub title: String,
    pub viewer_count: u64,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// One entry of `GET /games`.
#[derive(Deserialize, Debug, Clone)]
pub struct HelixGame {
    pub name: String,
}
