//! Route handlers, one module per resource.

pub(super) mod auth;
pub(super) mod completions;
pub(super) mod habits;
pub(super) mod misc;
pub(super) mod users;

use serde::de::DeserializeOwned;
use tiny_http::Request;

use super::{respond_json, ApiState};

/// Parse a positive numeric id from a path segment
pub(crate) fn parse_id(raw: &str) -> Result<i64, &'static str> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or("bad_id")
}

/// Parse a path id, or answer 400 and return `None`
fn id_or_reject(state: &ApiState, raw: &str, request: Request) -> Option<(i64, Request)> {
    match parse_id(raw) {
        Ok(id) => Some((id, request)),
        Err(err) => {
            respond_json(
                state,
                request,
                400,
                &serde_json::json!({ "error": err, "details": format!("'{raw}' is not an id") }),
            );
            None
        }
    }
}

/// Parse a JSON body, or answer 400 and return `None`.
///
/// An empty body parses as `T::default()` when `empty_ok` is given.
fn body_or_reject<T: DeserializeOwned>(
    state: &ApiState,
    body: &str,
    empty_ok: Option<T>,
    request: Request,
) -> Option<(T, Request)> {
    if body.trim().is_empty() {
        if let Some(value) = empty_ok {
            return Some((value, request));
        }
    }

    match serde_json::from_str(body) {
        Ok(value) => Some((value, request)),
        Err(e) => {
            respond_json(
                state,
                request,
                400,
                &serde_json::json!({ "error": "invalid_json", "details": e.to_string() }),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Ok(42));
        assert_eq!(parse_id("0"), Err("bad_id"));
        assert_eq!(parse_id("-3"), Err("bad_id"));
        assert_eq!(parse_id("abc"), Err("bad_id"));
        assert_eq!(parse_id(""), Err("bad_id"));
    }
}
