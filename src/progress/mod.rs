//! Progress engine: calendar days, streaks and experience levels
//!
//! Everything in here is pure. Callers pass in completion days and the
//! current day and get derived values back; persistence and clocks live
//! elsewhere.

mod day;
mod error;
mod levels;
mod streaks;

pub use day::{normalize, Clock, CompletionDay, FixedClock, SystemClock};
pub use error::ProgressError;
pub use levels::{
    award, level_for, level_title, ExperienceState, LevelProgress, XpRewards, XP_PER_LEVEL,
};
pub use streaks::{compute_streaks, StreakResult, StreakTier};
