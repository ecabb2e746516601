#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde_json::Value;
use viewerhub::config::{extract_config, ConfigV1};
use viewerhub::routes::create_router;
use viewerhub::startup::build_state;

/// Config pointing both Twitch endpoints at `upstream_url` (a mockito server).
pub fn config_yaml(upstream_url: &str, extra: &str) -> String {
    format!(
        r#"
version: "1.0.0"
bind_address: 127.0.0.1:8081
logging:
  level: "debug"
  format: "json"
twitch:
  client_id: "test-client"
  client_secret: "test-secret"
  token_url: "{upstream_url}/oauth2/token"
  api_url: "{upstream_url}"
  timeout_in_ms: 2000
{extra}
"#
    )
}

pub fn load_config(yaml: &str) -> ConfigV1 {
    extract_config(&Figment::new().merge(Yaml::string(yaml)))
        .expect("Failed to parse test config YAML")
}

pub fn build_app(config: ConfigV1) -> Router {
    let state = build_state(Arc::new(config)).expect("state should build");
    create_router(state)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
