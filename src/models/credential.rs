/// Credentials closer than this to expiry are treated as already expired.
pub const EXPIRY_SAFETY_MARGIN_MS: i64 = 60_000;

/// An app access token issued through the client-credentials grant.
///
/// Never mutated: a refresh builds a new one and replaces the old.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCredential {
    pub token: String,
    pub expires_at_epoch_ms: i64,
}

impl AppCredential {
    pub fn new(token: String, issued_at_epoch_ms: i64, ttl_seconds: u64) -> Self {
        let ttl_ms = i64::try_from(ttl_seconds)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        Self {
            token,
            expires_at_epoch_ms: issued_at_epoch_ms.saturating_add(ttl_ms),
        }
    }

    /// True when the token stays valid for more than the safety margin after `now_ms`.
    pub fn is_usable(&self, now_ms: i64) -> bool {
        self.expires_at_epoch_ms > now_ms.saturating_add(EXPIRY_SAFETY_MARGIN_MS)
    }
}
