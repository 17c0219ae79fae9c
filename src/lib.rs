//! habit-streak - Daily habits, streaks and experience levels
//!
//! Users track habits by marking calendar days complete. From the set of
//! completed days habit-streak derives:
//!
//! 1. **Streaks**: the current run of consecutive days (still alive if the
//!    last completion was today or yesterday) and the longest run ever.
//! 2. **Experience**: every newly completed day pays XP; `level` is always
//!    `experience / 100 + 1`.
//!
//! The pure engine lives in [`progress`]. [`tracker::HabitTracker`] ties it
//! to the SQLite [`store`], and [`server`] exposes it as a JSON API.

pub mod config;
pub mod domain;
pub mod progress;
pub mod server;
pub mod store;
pub mod tracker;

pub use domain::*;
pub use progress::{compute_streaks, normalize, CompletionDay, StreakResult};
pub use tracker::{CompletionOutcome, HabitTracker, TrackerError};
