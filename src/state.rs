//! Shared application state.
//!
//! Contains the state that is shared across all request handlers.

use crate::config::ConfigV1;
use crate::helix::SnapshotService;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Live stream lookups. `None` when running in demo mode without Twitch credentials.
    pub snapshots: Option<Arc<SnapshotService>>,
}
