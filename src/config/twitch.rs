use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::HelixError;

/// Settings for talking to the Twitch identity endpoint and the Helix API.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct TwitchConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Channel queried when a request does not name one.
    #[serde(default)]
    pub default_channel: Option<String>,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

/// The application's client-credentials pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl TwitchConfig {
    /// Returns the client id/secret pair, or a configuration error naming what is missing.
    pub fn credentials(&self) -> Result<ClientCredentials, HelixError> {
        let client_id = non_empty(&self.client_id)
            .ok_or_else(|| HelixError::Configuration("twitch.client_id is not set".into()))?;
        let client_secret = non_empty(&self.client_secret)
            .ok_or_else(|| HelixError::Configuration("twitch.client_secret is not set".into()))?;
        Ok(ClientCredentials {
            client_id,
            client_secret,
        })
    }
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            default_channel: None,
            token_url: default_token_url(),
            api_url: default_api_url(),
            timeout_in_ms: default_timeout_in_ms(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn default_token_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_string()
}

fn default_api_url() -> String {
    "https://api.twitch.tv/helix".to_string()
}

fn default_timeout_in_ms() -> u64 {
    5000
}
