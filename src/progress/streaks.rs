//! Streak computation
//!
//! Streaks are always rebuilt from the full completion set. Nothing here
//! reads a previously stored streak value.

use std::collections::BTreeSet;

use serde::Serialize;

use super::day::CompletionDay;

/// Current and longest run of consecutive completion days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResult {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Compute streaks for one habit.
///
/// The current streak only counts while the most recent completion is
/// `today` or the day before (one-day grace window). The longest streak
/// always reflects the whole history.
pub fn compute_streaks(days: &BTreeSet<CompletionDay>, today: CompletionDay) -> StreakResult {
    let mut newest_first = days.iter().rev().copied();
    let Some(most_recent) = newest_first.next() else {
        return StreakResult::default();
    };

    let mut longest = 0u32;
    let mut run = 1u32;
    // Length of the run containing the most recent day, once it has ended
    let mut recent_run: Option<u32> = None;
    let mut previous = most_recent;

    for day in newest_first {
        if day.days_until(previous) == 1 {
            run += 1;
        } else {
            longest = longest.max(run);
            recent_run.get_or_insert(run);
            run = 1;
        }
        previous = day;
    }

    // The oldest run has no predecessor to close it
    longest = longest.max(run);
    let recent_run = recent_run.unwrap_or(run);

    let gap = most_recent.days_until(today);
    let current = if gap == 0 || gap == 1 { recent_run } else { 0 };

    StreakResult {
        current_streak: current,
        longest_streak: longest,
    }
}

/// Display tier for a current streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StreakTier {
    /// No active streak
    Frozen,
    Spark,
    Warm,
    Hot,
    Blazing,
    Inferno,
}

impl StreakTier {
    pub fn for_streak(current: u32) -> Self {
        match current {
            0 => Self::Frozen,
            1..=2 => Self::Spark,
            3..=6 => Self::Warm,
            7..=13 => Self::Hot,
            14..=29 => Self::Blazing,
            _ => Self::Inferno,
        }
    }

    /// Number of flames shown next to the streak
    pub fn flames(&self) -> u8 {
        match self {
            Self::Frozen => 0,
            Self::Spark => 1,
            Self::Warm => 2,
            Self::Hot => 3,
            Self::Blazing => 4,
            Self::Inferno => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Frozen => "Frozen",
            Self::Spark => "Spark",
            Self::Warm => "Warm",
            Self::Hot => "Hot",
            Self::Blazing => "Blazing",
            Self::Inferno => "Inferno",
        }
    }
}
