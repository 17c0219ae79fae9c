//! Root and health endpoints.

use tiny_http::Request;

use super::super::types::{ApiState, HealthResponse};
use super::super::respond_json;

pub fn handle_root(state: &ApiState, request: Request) {
    respond_json(
        state,
        request,
        200,
        &serde_json::json!({ "message": "Habit tracker API" }),
    );
}

pub fn handle_health(state: &ApiState, request: Request) {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    respond_json(state, request, 200, &health);
}
