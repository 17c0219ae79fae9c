//! Errors raised by the progress engine

/// Error type for date normalization and experience awards
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    /// The input could not be read as a calendar day or timestamp.
    /// Callers should reject the originating request.
    #[error("Invalid date format: {input:?}")]
    InvalidDateFormat { input: String },

    /// A negative award reached the ledger. This is a caller bug.
    #[error("Invalid award: {points} points (must be >= 0)")]
    InvalidAward { points: i64 },
}
