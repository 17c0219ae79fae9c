//! Tracker error type and its HTTP mapping

use crate::domain::ValidationError;
use crate::progress::{CompletionDay, ProgressError};

/// Error type for tracker operations
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: i64 },

    #[error("User already exists")]
    UserExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cannot complete {day}: it is after today ({today})")]
    FutureCompletion {
        day: CompletionDay,
        today: CompletionDay,
    },

    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrackerError {
    pub(crate) fn habit_not_found(id: i64) -> Self {
        Self::NotFound { what: "habit", id }
    }

    pub(crate) fn user_not_found(id: i64) -> Self {
        Self::NotFound { what: "user", id }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::UserExists
            | Self::InvalidCredentials
            | Self::Validation(_)
            | Self::FutureCompletion { .. }
            | Self::Progress(ProgressError::InvalidDateFormat { .. }) => 400,
            Self::Progress(ProgressError::InvalidAward { .. })
            | Self::Storage(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::UserExists => "user_exists",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Validation(_) => "invalid_input",
            Self::FutureCompletion { .. } => "future_completion",
            Self::Progress(ProgressError::InvalidDateFormat { .. }) => "invalid_date_format",
            Self::Progress(ProgressError::InvalidAward { .. }) => "invalid_award",
            Self::Storage(_) => "storage_error",
            Self::Internal(_) => "internal_error",
        }
    }
}
