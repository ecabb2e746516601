//! Read-only access to the Twitch Helix API.
//!
//! [`CredentialCache`] keeps an app access token fresh, [`HelixClient`] uses it
//! to look up streams and games, and [`SnapshotService`] turns the result into
//! the [`StreamSnapshot`](crate::models::StreamSnapshot) served to the dashboard.

pub mod client;
pub mod credentials;
pub mod snapshot;

pub use client::{normalize_login, HelixClient, UpstreamStreamRecord};
pub use credentials::{Clock, CredentialCache, SystemClock};
pub use snapshot::{demo_snapshot, CacheControl, Snapshot, SnapshotService, SNAPSHOT_CACHE_CONTROL};

use crate::error::{HelixError, UpstreamFailure};

/// Folds a transport error into the error class of the call that failed.
/// Timeouts get their own kind.
pub(crate) fn transport_error(
    err: reqwest::Error,
    endpoint: &str,
    classify: impl FnOnce(UpstreamFailure) -> HelixError,
) -> HelixError {
    if err.is_timeout() {
        HelixError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        classify(UpstreamFailure::new(
            err.status().map(|s| s.as_u16()),
            err.to_string(),
        ))
    }
}
