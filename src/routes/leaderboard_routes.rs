//! Community leaderboard endpoint.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Deserialize;
use tracing::debug;

use super::is_mock;
use crate::models::leaderboard::Leaderboards;
use crate::state::AppState;

/// Registers leaderboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/leaderboards", get(leaderboards))
}

#[derive(Deserialize, Debug)]
struct LeaderboardQuery {
    mock: Option<String>,
    /// Case-insensitive substring of the viewer name.
    q: Option<String>,
    limit: Option<usize>,
}

/// Only demo data exists; without it the route is closed.
///
/// `mock=0` and `mock=false` count as "no mock" here, unlike a bare presence
/// check on the parameter.
async fn leaderboards(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardQuery>,
) -> Response {
    if !state.config.demo && !is_mock(params.mock.as_deref()) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    debug!(filter = ?params.q, limit = ?params.limit, "serving demo leaderboards");
    let ranked = Leaderboards::demo().ranked(params.q.as_deref(), params.limit);
    Json(ranked).into_response()
}
