//! HTTP client helpers for talking to a running habit API.

use anyhow::{Context, Result};

pub const AUTH_HEADER: &str = "X-Habit-Token";

fn format_http_error(code: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {code}");
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return format!("HTTP {code}: {body}");
    };

    let error = value
        .get("error")
        .and_then(|v| v.as_str())
        .unwrap_or("http_error");
    match value.get("details").and_then(|v| v.as_str()) {
        Some(details) => format!("HTTP {code} {error}: {details}"),
        None => format!("HTTP {code} {error}"),
    }
}

fn with_auth(mut req: ureq::Request, token: Option<&str>) -> ureq::Request {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        req = req.set(AUTH_HEADER, token);
    }
    req
}

fn read_json(result: Result<ureq::Response, ureq::Error>) -> Result<serde_json::Value> {
    let resp = result.map_err(|e| match e {
        ureq::Error::Status(code, resp) => {
            let body = resp.into_string().unwrap_or_default();
            anyhow::anyhow!(format_http_error(code, &body))
        }
        other => anyhow::anyhow!(other),
    })?;

    let body = resp.into_string().context("Failed to read response body")?;
    serde_json::from_str(&body).context("Failed to parse JSON response")
}

pub fn http_get_json(url: &str, token: Option<&str>) -> Result<serde_json::Value> {
    read_json(with_auth(ureq::get(url), token).call())
}

pub fn http_post_json(
    url: &str,
    token: Option<&str>,
    payload: &serde_json::Value,
) -> Result<serde_json::Value> {
    let body = serde_json::to_string(payload).context("Failed to serialize request JSON")?;
    let req = with_auth(ureq::post(url), token).set("Content-Type", "application/json");
    read_json(req.send_string(&body))
}
