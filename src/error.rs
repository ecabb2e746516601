//! Error taxonomy for the Twitch Helix access layer.

use std::fmt;

use thiserror::Error;

/// What came back from an upstream endpoint that refused to cooperate.
///
/// `status` is `None` when no response was received at all (connection
/// refused, TLS failure, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
    pub status: Option<u16>,
    pub body: String,
}

impl UpstreamFailure {
    pub fn new(status: Option<u16>, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "status {}: {}", status, self.body),
            None => write!(f, "no response: {}", self.body),
        }
    }
}

#[derive(Debug, Error)]
pub enum HelixError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("token request failed, {0}")]
    CredentialFetch(UpstreamFailure),
    #[error("helix {endpoint} failed, {failure}")]
    Upstream {
        endpoint: String,
        failure: UpstreamFailure,
    },
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },
}

impl HelixError {
    pub fn upstream(endpoint: &str, status: Option<u16>, body: impl Into<String>) -> Self {
        HelixError::Upstream {
            endpoint: endpoint.to_string(),
            failure: UpstreamFailure::new(status, body),
        }
    }
}
