//! Request bodies and shared state for the habit API

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ServerSettings;
use crate::tracker::HabitTracker;

/// State shared by every request handler
#[derive(Clone)]
pub struct ApiState {
    pub tracker: Arc<HabitTracker>,
    /// Expected `X-Habit-Token`. Empty disables the check.
    pub api_token: String,
    /// Value of `Access-Control-Allow-Origin`
    pub allowed_origin: String,
}

impl ApiState {
    pub fn new(tracker: Arc<HabitTracker>, settings: &ServerSettings) -> Self {
        Self {
            tracker,
            api_token: settings.api_token.clone(),
            allowed_origin: settings.allowed_origin.clone(),
        }
    }
}

/// POST /api/habits/:id/complete
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteRequest {
    /// Day or timestamp; today when absent
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// PUT /api/users/:id/photo
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRequest {
    /// `null` clears the photo
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
