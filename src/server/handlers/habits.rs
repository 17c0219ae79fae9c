//! Habit CRUD and stats.

use tiny_http::Request;

use super::super::types::ApiState;
use super::super::respond_result;
use super::{body_or_reject, id_or_reject};
use crate::domain::{HabitUpdate, NewHabit};

pub fn handle_create(state: &ApiState, body: &str, request: Request) {
    let Some((new_habit, request)) = body_or_reject::<NewHabit>(state, body, None, request) else {
        return;
    };
    respond_result(state, request, 201, state.tracker.create_habit(new_habit));
}

pub fn handle_get(state: &ApiState, raw_id: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };
    respond_result(state, request, 200, state.tracker.habit(id));
}

pub fn handle_update(state: &ApiState, raw_id: &str, body: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };
    let Some((update, request)) = body_or_reject::<HabitUpdate>(state, body, None, request) else {
        return;
    };
    respond_result(state, request, 200, state.tracker.update_habit(id, update));
}

pub fn handle_delete(state: &ApiState, raw_id: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };
    let result = state
        .tracker
        .delete_habit(id)
        .map(|()| serde_json::json!({ "status": "deleted", "id": id }));
    respond_result(state, request, 200, result);
}

pub fn handle_stats(state: &ApiState, raw_id: &str, request: Request) {
    let Some((id, request)) = id_or_reject(state, raw_id, request) else {
        return;
    };
    respond_result(state, request, 200, state.tracker.habit_stats(id));
}
