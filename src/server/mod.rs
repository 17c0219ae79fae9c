//! JSON/HTTP API for the habit tracker
//!
//! Serves on `host:port` from `[server]` (default 127.0.0.1:3000):
//! - `GET /api/health`
//! - `POST /api/auth/register`, `POST /api/auth/login`
//! - `/api/users/:id` (profile, photo, habits, dashboard, calendar)
//! - `/api/habits[/:id]` (CRUD, stats, complete/uncomplete)
//!
//! Requests are handled one at a time on the server thread.

mod handlers;
mod types;

pub use types::{ApiState, CompleteRequest, ErrorResponse, HealthResponse, PhotoRequest};

use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::anyhow;
use serde::Serialize;
use subtle::ConstantTimeEq;
use tiny_http::{Header, Request, Response, Server};
use tracing::{debug, error, info, warn};

use crate::tracker::TrackerError;

const AUTH_HEADER: &str = "X-Habit-Token";
const MAX_BODY_BYTES: usize = 1024 * 1024; // 1 MiB

/// Bound API server, not yet serving
pub struct ApiServer {
    server: Arc<Server>,
    state: ApiState,
}

/// Stops a running [`ApiServer`] from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    server: Arc<Server>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.server.unblock();
    }
}

impl ApiServer {
    /// Bind `addr` (`host:port`; port 0 picks a free port)
    pub fn bind(addr: &str, state: ApiState) -> anyhow::Result<Self> {
        let server =
            Server::http(addr).map_err(|e| anyhow!("Failed to bind API server on {addr}: {e}"))?;
        Ok(Self {
            server: Arc::new(server),
            state,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            server: Arc::clone(&self.server),
        }
    }

    /// Serve until [`ShutdownHandle::shutdown`] is called
    pub fn run(self) {
        let auth_enabled = !self.state.api_token.trim().is_empty();
        match self.local_addr() {
            Some(addr) => info!(
                "[habit-streak:http] Server listening on http://{} (auth: {})",
                addr,
                if auth_enabled { "enabled" } else { "disabled" }
            ),
            None => warn!("[habit-streak:http] Server listening on a non-IP socket"),
        }

        for request in self.server.incoming_requests() {
            handle_request(&self.state, request);
        }

        info!("[habit-streak:http] Server stopped");
    }

    /// Run on a background thread
    pub fn spawn(self) -> JoinHandle<()> {
        thread::spawn(move || self.run())
    }
}

fn handle_request(state: &ApiState, mut request: Request) {
    let method = request.method().to_string();
    let url = request.url().to_string();
    let (path, query) = split_url(&url);
    debug!("[habit-streak:http] {} {}", method, path);

    if method == "OPTIONS" {
        send(state, request, Response::empty(204u16));
        return;
    }

    if !is_authorized(&request, &state.api_token) {
        respond_json(state, request, 401, &serde_json::json!({ "error": "unauthorized" }));
        return;
    }

    let body = match read_request_body(&mut request) {
        Ok(body) => body,
        Err((status, code)) => {
            respond_json(state, request, status, &serde_json::json!({ "error": code }));
            return;
        }
    };

    route(state, &method, path, query, &body, request);
}

fn route(state: &ApiState, method: &str, path: &str, query: &str, body: &str, request: Request) {
    use handlers::{auth, completions, habits, misc, users};

    let segments = path_segments(path);
    match (method, segments.as_slice()) {
        ("GET", []) => misc::handle_root(state, request),
        ("GET", ["api", "health"]) => misc::handle_health(state, request),

        ("POST", ["api", "auth", "register"]) => auth::handle_register(state, body, request),
        ("POST", ["api", "auth", "login"]) => auth::handle_login(state, body, request),

        ("GET", ["api", "users", id]) => users::handle_get_user(state, id, request),
        ("PUT", ["api", "users", id, "photo"]) => users::handle_set_photo(state, id, body, request),
        ("GET", ["api", "users", id, "habits"]) => users::handle_user_habits(state, id, request),
        ("GET", ["api", "users", id, "dashboard"]) => users::handle_dashboard(state, id, request),
        ("GET", ["api", "users", id, "calendar"]) => {
            users::handle_calendar(state, id, query, request)
        }

        ("POST", ["api", "habits"]) => habits::handle_create(state, body, request),
        ("GET", ["api", "habits", id]) => habits::handle_get(state, id, request),
        ("PUT", ["api", "habits", id]) => habits::handle_update(state, id, body, request),
        ("DELETE", ["api", "habits", id]) => habits::handle_delete(state, id, request),
        ("GET", ["api", "habits", id, "stats"]) => habits::handle_stats(state, id, request),

        ("POST", ["api", "habits", id, "complete"]) => {
            completions::handle_complete(state, id, body, request)
        }
        ("DELETE", ["api", "habits", id, "complete", date]) => {
            completions::handle_uncomplete(state, id, date, request)
        }

        _ => respond_json(
            state,
            request,
            404,
            &serde_json::json!({ "error": "not_found", "details": format!("{method} {path}") }),
        ),
    }
}

/// Split a request URL into path and raw query string
fn split_url(url: &str) -> (&str, &str) {
    match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    }
}

/// Non-empty path segments (`/api/habits/3/` -> `["api", "habits", "3"]`)
fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Decoded value of `key` in a query string
fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| {
            urlencoding::decode(v)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| v.to_string())
        })
}

fn is_authorized(request: &Request, expected: &str) -> bool {
    let expected = expected.trim();
    if expected.is_empty() {
        return true;
    }

    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(AUTH_HEADER))
        .map(|h| token_matches(h.value.as_str(), expected))
        .unwrap_or(false)
}

/// Constant-time token comparison (length is not hidden)
fn token_matches(given: &str, expected: &str) -> bool {
    given.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn read_request_body(request: &mut Request) -> Result<String, (u16, &'static str)> {
    let mut body = String::new();
    let mut reader = request.as_reader().take((MAX_BODY_BYTES + 1) as u64);
    if let Err(e) = reader.read_to_string(&mut body) {
        error!("[habit-streak:http] Failed to read body: {}", e);
        return Err((400, "bad_request"));
    }

    if body.len() > MAX_BODY_BYTES {
        return Err((413, "payload_too_large"));
    }

    Ok(body)
}

/// Attach CORS headers and send
fn send<R: Read>(state: &ApiState, request: Request, mut response: Response<R>) {
    let cors = [
        ("Access-Control-Allow-Origin", state.allowed_origin.as_str()),
        ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
        ("Access-Control-Allow-Headers", "Content-Type, X-Habit-Token"),
    ];
    for (name, value) in cors {
        if let Some(h) = header(name, value) {
            response.add_header(h);
        }
    }

    if let Err(e) = request.respond(response) {
        debug!("[habit-streak:http] Failed to send response: {}", e);
    }
}

fn respond_json<T: Serialize>(state: &ApiState, request: Request, status_code: u16, value: &T) {
    let body =
        serde_json::to_string(value).unwrap_or_else(|_| "{\"error\":\"serialize\"}".to_string());
    let mut response = Response::from_string(body).with_status_code(status_code);
    if let Some(h) = header("Content-Type", "application/json") {
        response.add_header(h);
    }
    send(state, request, response);
}

fn respond_error(state: &ApiState, request: Request, err: &TrackerError) {
    let status = err.status_code();
    if status >= 500 {
        error!("[habit-streak:http] {}", err);
    } else {
        debug!("[habit-streak:http] Rejected: {}", err);
    }

    let body = ErrorResponse {
        error: err.code().to_string(),
        details: Some(err.to_string()),
    };
    respond_json(state, request, status, &body);
}

/// Respond with `value` on success, the mapped error otherwise
fn respond_result<T: Serialize>(
    state: &ApiState,
    request: Request,
    status_code: u16,
    result: Result<T, TrackerError>,
) {
    match result {
        Ok(value) => respond_json(state, request, status_code, &value),
        Err(err) => respond_error(state, request, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_url() {
        assert_eq!(split_url("/api/users/1/calendar?days=30"), ("/api/users/1/calendar", "days=30"));
        assert_eq!(split_url("/api/health"), ("/api/health", ""));
    }

    #[test]
    fn test_path_segments() {
        assert!(path_segments("/").is_empty());
        assert_eq!(path_segments("/api/habits/3/"), vec!["api", "habits", "3"]);
        assert_eq!(path_segments("//api//health"), vec!["api", "health"]);
    }

    #[test]
    fn test_token_matches() {
        assert!(token_matches("s3cret", "s3cret"));
        assert!(!token_matches("s3creT", "s3cret"));
        assert!(!token_matches("s3cre", "s3cret"));
        assert!(!token_matches("", "s3cret"));
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("days=30&x=1", "days").as_deref(), Some("30"));
        assert_eq!(query_param("x=1", "days"), None);
        assert_eq!(query_param("flag", "flag").as_deref(), Some(""));
        assert_eq!(
            query_param("date=2024-01-01T10%3A00%3A00Z", "date").as_deref(),
            Some("2024-01-01T10:00:00Z")
        );
    }
}
