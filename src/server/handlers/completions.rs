//! Marking and unmarking completion days.

use tiny_http::Request;

use super::super::types::{ApiState, CompleteRequest};
use super::super::respond_result;
use super::{body_or_reject, id_or_reject};

pub fn handle_complete(state: &ApiState, raw_id: &str, body: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };
    let Some((req, request)) =
        body_or_reject(state, body, Some(CompleteRequest::default()), request)
    else {
        return;
    };

    let result = state
        .tracker
        .complete(id, req.date.as_deref(), req.notes);
    respond_result(state, request, 200, result);
}

pub fn handle_uncomplete(state: &ApiState, raw_id: &str, raw_date: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };
    // Timestamps arrive percent-encoded (`%3A`)
    let date = urlencoding::decode(raw_date)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| raw_date.to_string());

    respond_result(state, request, 200, state.tracker.uncomplete(id, &date));
}
