//! HTTP route definitions and handlers.
//!
//! Endpoints are grouped by concern: stream status, leaderboards and health checks.

mod health_routes;
mod leaderboard_routes;
mod stream_routes;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and attaches
/// the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(stream_routes::routes())
        .merge(leaderboard_routes::routes())
        .merge(health_routes::routes())
        .with_state(state)
}

/// A `mock` query parameter switches a route to canned data unless it is `0` or `false`.
fn is_mock(flag: Option<&str>) -> bool {
    match flag.map(|f| f.trim().to_ascii_lowercase()) {
        Some(f) => f != "0" && f != "false",
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::is_mock;

    #[test]
    fn mock_flag_values() {
        assert!(is_mock(Some("1")));
        assert!(is_mock(Some("")));
        assert!(is_mock(Some("true")));
        assert!(!is_mock(Some("0")));
        assert!(!is_mock(Some("False")));
        assert!(!is_mock(None));
    }
}
