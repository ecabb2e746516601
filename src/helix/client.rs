use std::sync::Arc;

use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::credentials::CredentialCache;
use super::transport_error;
use crate::error::{HelixError, UpstreamFailure};
use crate::models::helix::{HelixData, HelixGame, HelixStream};

/// Longest login Twitch hands out.
const MAX_LOGIN_LEN: usize = 25;

/// A live stream as reported by Helix, with its game name when it could be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamStreamRecord {
    pub stream: HelixStream,
    pub game_name: Option<String>,
}

/// Trims and lowercases a channel login, rejecting empty or malformed ones.
pub fn normalize_login(channel_login: &str) -> Result<String, HelixError> {
    let login = channel_login.trim().to_lowercase();
    if login.is_empty() {
        return Err(HelixError::InvalidInput("missing user_login".into()));
    }
    if login.len() > MAX_LOGIN_LEN
        || !login
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(HelixError::InvalidInput(format!(
            "malformed user_login '{}'",
            channel_login
        )));
    }
    Ok(login)
}

/// Authenticated GETs against the Helix API.
pub struct HelixClient {
    http: reqwest::Client,
    api_url: String,
    credentials: Arc<CredentialCache>,
}

impl HelixClient {
    pub fn new(
        http: reqwest::Client,
        api_url: impl Into<String>,
        credentials: Arc<CredentialCache>,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            api_url,
            credentials,
        }
    }

    /// Looks up the live stream of `channel_login`.
    ///
    /// `Ok(None)` means the channel is offline. The game name is best-effort:
    /// an empty game id or a failed lookup leaves it out.
    pub async fn fetch_stream(
        &self,
        channel_login: &str,
    ) -> Result<Option<UpstreamStreamRecord>, HelixError> {
        let login = normalize_login(channel_login)?;
        let token = self.credentials.get_token().await?;

        let streams: HelixData<HelixStream> = self
            .get_json("/streams", &[("user_login", login.as_str())], &token)
            .await?;

        let Some(stream) = streams.data.into_iter().next() else {
            debug!(channel = login.as_str(), "channel is offline");
            return Ok(None);
        };

        let game_name = self.game_name(&stream.game_id, &token).await;
        Ok(Some(UpstreamStreamRecord { stream, game_name }))
    }

    async fn game_name(&self, game_id: &str, token: &str) -> Option<String> {
        if game_id.is_empty() {
            return None;
        }
        match self
            .get_json::<HelixData<HelixGame>>("/games", &[("id", game_id)], token)
            .await
        {
            Ok(games) => games.data.into_iter().next().map(|g| g.name),
            Err(e) => {
                warn!(
                    event_name = "helix.games.lookup.failed",
                    event_domain = "helix",
                    game_id,
                    "game lookup failed, omitting game name: {}",
                    e
                );
                None
            }
        }
    }

    /// One uncached GET, parsed into `T`. Anything but a 2xx with a body
    /// matching `T` is an `Upstream` error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        token: &str,
    ) -> Result<T, HelixError> {
        let url = format!("{}{}", self.api_url, endpoint);
        debug!("Sending Helix request to: {}", url);

        let classify = |failure: UpstreamFailure| HelixError::Upstream {
            endpoint: endpoint.to_string(),
            failure,
        };

        let response = self
            .http
            .get(&url)
            .query(query)
            .header("Client-Id", self.credentials.client_id())
            .bearer_auth(token)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| transport_error(e, endpoint, classify))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, endpoint, classify))?;

        if !status.is_success() {
            return Err(HelixError::upstream(endpoint, Some(status.as_u16()), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            HelixError::upstream(
                endpoint,
                Some(status.as_u16()),
                format!("unexpected response shape ({}): {}", e, body),
            )
        })
    }
}
