#[cfg(test)]
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use super::transport_error;
use crate::config::ClientCredentials;
use crate::error::{HelixError, UpstreamFailure};
use crate::models::helix::TokenResponse;
use crate::models::AppCredential;
use crate::utils::log_throttle::LogThrottle;

const CACHE_HIT_LOG_WINDOW: Duration = Duration::from_secs(30);
const TOKEN_ENDPOINT: &str = "oauth2/token";

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ManualClock {
    now_ms: AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let by_ms = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.now_ms.fetch_add(by_ms, Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Holds the app access token and refreshes it through the client-credentials
/// grant when it is missing or about to expire.
///
/// Concurrent refreshes are not de-duplicated: both requests go out and the
/// last one to finish wins. Tokens are interchangeable, so either is fine.
pub struct CredentialCache {
    http: reqwest::Client,
    token_url: String,
    credentials: ClientCredentials,
    clock: Arc<dyn Clock>,
    current: RwLock<Option<AppCredential>>,
    log_throttle: LogThrottle,
}

impl CredentialCache {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        credentials: ClientCredentials,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let token_url = token_url.into();
        info!(
            "Creating credential cache for client '{}' against '{}'",
            credentials.client_id, token_url
        );
        Self {
            http,
            token_url,
            credentials,
            clock,
            current: RwLock::new(None),
            log_throttle: LogThrottle::new(CACHE_HIT_LOG_WINDOW),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    /// The credential currently held, usable or not.
    pub fn current(&self) -> Option<AppCredential> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns a bearer token valid for at least another minute, requesting a
    /// new one only when the cached one is absent or too close to expiry.
    ///
    /// A failed request leaves the cache untouched.
    pub async fn get_token(&self) -> Result<String, HelixError> {
        let now = self.clock.now_ms();
        if let Some(credential) = self.current().filter(|c| c.is_usable(now)) {
            if let Some(suppressed_count) = self.log_throttle.should_emit("helix.token.cache.hit") {
                debug!(
                    event_name = "helix.token.cache.hit",
                    event_domain = "helix",
                    expires_in_ms = credential.expires_at_epoch_ms - now,
                    suppressed_count,
                    "app token served from cache"
                );
            }
            return Ok(credential.token);
        }

        let credential = self.request_credential().await?;
        info!(
            event_name = "helix.token.refreshed",
            event_domain = "helix",
            expires_at_epoch_ms = credential.expires_at_epoch_ms,
            "obtained a new app token"
        );
        let token = credential.token.clone();
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(credential);
        Ok(token)
    }

    async fn request_credential(&self) -> Result<AppCredential, HelixError> {
        debug!("Requesting app token from '{}'", self.token_url);

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| transport_error(e, TOKEN_ENDPOINT, HelixError::CredentialFetch))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, TOKEN_ENDPOINT, HelixError::CredentialFetch))?;

        if !status.is_success() {
            return Err(HelixError::CredentialFetch(UpstreamFailure::new(
                Some(status.as_u16()),
                body,
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            HelixError::CredentialFetch(UpstreamFailure::new(
                Some(status.as_u16()),
                format!("malformed token response ({}): {}", e, body),
            ))
        })?;
        if parsed.access_token.is_empty() {
            return Err(HelixError::CredentialFetch(UpstreamFailure::new(
                Some(status.as_u16()),
                format!("empty access_token: {}", body),
            )));
        }

        Ok(AppCredential::new(
            parsed.access_token,
            self.clock.now_ms(),
            parsed.expires_in,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const T0: i64 = 1_700_000_000_000;

    fn test_credentials() -> ClientCredentials {
        ClientCredentials {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
        }
    }

    fn cache_for(server: &Server, clock: Arc<ManualClock>) -> CredentialCache {
        CredentialCache::new(
            reqwest::Client::new(),
            format!("{}/oauth2/token", server.url()),
            test_credentials(),
            clock,
        )
    }

    fn cache_with_timeout(token_url: String, timeout: Duration) -> CredentialCache {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("client should build");
        CredentialCache::new(
            http,
            token_url,
            test_credentials(),
            Arc::new(ManualClock::new(T0)),
        )
    }

    fn token_body(token: &str, expires_in: u64) -> String {
        format!(
            r#"{{"access_token": "{}", "expires_in": {}, "token_type": "bearer"}}"#,
            token, expires_in
        )
    }

    #[tokio::test]
    async fn test_first_call_fetches_and_caches() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/oauth2/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("client_id".into(), "test-client".into()),
                Matcher::UrlEncoded("client_secret".into(), "test-secret".into()),
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(token_body("app-token", 3600))
            .expect(1)
            .create_async()
            .await;

        let cache = cache_for(&server, Arc::new(ManualClock::new(T0)));
        assert_eq!(cache.get_token().await.unwrap(), "app-token");

        m.assert_async().await;
        let cached = cache.current().expect("credential should be cached");
        assert_eq!(cached.expires_at_epoch_ms, T0 + 3_600_000);
    }

    #[tokio::test]
    async fn test_valid_token_is_reused_without_network() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(token_body("app-token", 3600))
            .expect(1)
            .create_async()
            .await;

        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_for(&server, clock.clone());
        cache.get_token().await.unwrap();

        // 58 minutes later the token still has two minutes left.
        clock.advance(Duration::from_secs(58 * 60));
        assert_eq!(cache.get_token().await.unwrap(), "app-token");
        assert_eq!(cache.get_token().await.unwrap(), "app-token");

        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_within_safety_margin_is_refreshed() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(token_body("first", 3600))
            .expect(1)
            .create_async()
            .await;

        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_for(&server, clock.clone());
        assert_eq!(cache.get_token().await.unwrap(), "first");
        first.assert_async().await;
        first.remove_async().await;

        let second = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(token_body("second", 3600))
            .expect(1)
            .create_async()
            .await;

        // 30 seconds before expiry: inside the 60 second margin.
        clock.set(T0 + 3_600_000 - 30_000);
        assert_eq!(cache.get_token().await.unwrap(), "second");
        second.assert_async().await;

        let cached = cache.current().unwrap();
        assert_eq!(cached.token, "second");
        assert_eq!(cached.expires_at_epoch_ms, T0 + 3_600_000 - 30_000 + 3_600_000);
    }

    #[tokio::test]
    async fn test_failure_is_reported_and_not_cached() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/oauth2/token")
            .with_status(400)
            .with_body(r#"{"status":400,"message":"invalid client secret"}"#)
            .expect(2)
            .create_async()
            .await;

        let cache = cache_for(&server, Arc::new(ManualClock::new(T0)));
        for _ in 0..2 {
            match cache.get_token().await {
                Err(HelixError::CredentialFetch(failure)) => {
                    assert_eq!(failure.status, Some(400));
                    assert!(failure.body.contains("invalid client secret"));
                }
                other => panic!("expected CredentialFetch, got {:?}", other),
            }
        }
        assert!(cache.current().is_none());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_credential_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(r#"{"token": "wrong-field"}"#)
            .create_async()
            .await;

        let cache = cache_for(&server, Arc::new(ManualClock::new(T0)));
        let result = cache.get_token().await;
        assert!(matches!(result, Err(HelixError::CredentialFetch(_))));
        assert!(cache.current().is_none());
    }

    #[tokio::test]
    async fn test_missing_expires_in_defaults_to_an_hour() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(r#"{"access_token": "app-token"}"#)
            .create_async()
            .await;

        let cache = cache_for(&server, Arc::new(ManualClock::new(T0)));
        cache.get_token().await.unwrap();
        assert_eq!(cache.current().unwrap().expires_at_epoch_ms, T0 + 3_600_000);
    }

    #[tokio::test]
    async fn test_silent_token_endpoint_times_out() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let cache = cache_with_timeout(
            format!("http://{}/oauth2/token", addr),
            Duration::from_millis(200),
        );
        match cache.get_token().await {
            Err(HelixError::Timeout { endpoint }) => assert_eq!(endpoint, "oauth2/token"),
            other => panic!("expected Timeout, got {:?}", other),
        }
        assert!(cache.current().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_token_endpoint_has_no_status() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let cache = cache_with_timeout(
            format!("http://{}/oauth2/token", addr),
            Duration::from_secs(5),
        );
        match cache.get_token().await {
            Err(HelixError::CredentialFetch(failure)) => assert_eq!(failure.status, None),
            other => panic!("expected CredentialFetch, got {:?}", other),
        }
    }
}
