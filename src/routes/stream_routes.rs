//! Live stream status endpoint.

use axum::extract::{Query, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Deserialize;

use super::is_mock;
use crate::helix::{demo_snapshot, normalize_login, Snapshot};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Channel name used for canned snapshots when the request names none.
const DEMO_CHANNEL: &str = "viewerhub";

/// Registers stream status routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/twitch/stream", get(stream_status))
}

#[derive(Deserialize, Debug)]
struct StreamQuery {
    user_login: Option<String>,
    mock: Option<String>,
}

fn snapshot_response(snapshot: Snapshot) -> Response {
    (
        [(CACHE_CONTROL, snapshot.cache_control.to_string())],
        Json(snapshot.snapshot),
    )
        .into_response()
}

/// Returns whether a channel is live, falling back to the configured default channel.
///
/// Credential and Helix failures are answered with an error body, never with
/// an offline snapshot.
async fn stream_status(
    State(state): State<AppState>,
    Query(params): Query<StreamQuery>,
) -> Result<Response, HTTPError> {
    let requested = params
        .user_login
        .as_deref()
        .map(str::trim)
        .filter(|login| !login.is_empty())
        .or(state.config.twitch.default_channel.as_deref());

    // Without credentials the service only exists in demo mode.
    let live = state
        .snapshots
        .as_ref()
        .filter(|_| !state.config.demo && !is_mock(params.mock.as_deref()));

    let Some(service) = live else {
        let login = requested
            .and_then(|l| normalize_login(l).ok())
            .unwrap_or_else(|| DEMO_CHANNEL.to_string());
        return Ok(snapshot_response(demo_snapshot(&login, Utc::now())));
    };

    let Some(login) = requested else {
        return Err(HTTPError::new(StatusCode::BAD_REQUEST, "missing user_login"));
    };

    let snapshot = service.get_snapshot(login).await?;
    Ok(snapshot_response(snapshot))
}
