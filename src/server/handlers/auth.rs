//! Registration and login.

use tiny_http::Request;

use super::super::types::ApiState;
use super::super::respond_result;
use super::body_or_reject;
use crate::domain::{Credentials, NewUser};

pub fn handle_register(state: &ApiState, body: &str, request: Request) {
    let Some((new_user, request)) = body_or_reject::<NewUser>(state, body, None, request) else {
        return;
    };
    respond_result(state, request, 201, state.tracker.register(new_user));
}

pub fn handle_login(state: &ApiState, body: &str, request: Request) {
    let Some((credentials, request)) = body_or_reject::<Credentials>(state, body, None, request)
    else {
        return;
    };
    respond_result(state, request, 200, state.tracker.login(credentials));
}
