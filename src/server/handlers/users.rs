//! Per-user endpoints: profile, photo, habit list, dashboard, calendar.

use tiny_http::Request;

use super::super::types::{ApiState, PhotoRequest};
use super::super::{query_param, respond_json, respond_result};
use super::{body_or_reject, id_or_reject};

/// Calendar window when `?days=` is absent
const DEFAULT_CALENDAR_DAYS: u32 = 365;

pub fn handle_get_user(state: &ApiState, raw_id: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };
    respond_result(state, request, 200, state.tracker.user(id));
}

pub fn handle_set_photo(state: &ApiState, raw_id: &str, body: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };
    let Some((req, request)) = body_or_reject::<PhotoRequest>(state, body, None, request) else {
        return;
    };
    respond_result(
        state,
        request,
        200,
        state.tracker.set_profile_photo(id, req.profile_photo),
    );
}

pub fn handle_user_habits(state: &ApiState, raw_id: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };
    respond_result(state, request, 200, state.tracker.habits(id));
}

pub fn handle_dashboard(state: &ApiState, raw_id: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };
    respond_result(state, request, 200, state.tracker.dashboard(id));
}

pub fn handle_calendar(state: &ApiState, raw_id: &str, query: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };

    let days = match query_param(query, "days") {
        None => DEFAULT_CALENDAR_DAYS,
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(days) => days,
            Err(_) => {
                respond_json(
                    state,
                    request,
                    400,
                    &serde_json::json!({ "error": "bad_days", "details": format!("'{raw}' is not a day count") }),
                );
                return;
            }
        },
    };

    respond_result(state, request, 200, state.tracker.calendar(id, days));
}
