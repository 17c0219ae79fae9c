//! XP and Level system
//!
//! Levels are a fixed function of experience: every 100 XP is one level,
//! starting at level 1.

use serde::{Deserialize, Serialize};

use super::error::ProgressError;

/// Experience needed to advance one level
pub const XP_PER_LEVEL: u64 = 100;

/// Level reached with the given experience
pub fn level_for(experience: u64) -> u64 {
    experience / XP_PER_LEVEL + 1
}

/// Title shown for a level
pub fn level_title(level: u64) -> &'static str {
    match level {
        0..=4 => "Beginner",
        5..=9 => "Apprentice",
        10..=19 => "Practitioner",
        20..=29 => "Expert",
        30..=49 => "Master",
        _ => "Legend",
    }
}

/// A user's experience and the level derived from it.
///
/// The level is never assigned on its own; it is recomputed whenever the
/// experience changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExperienceState {
    experience: u64,
    level: u64,
}

impl Default for ExperienceState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ExperienceState {
    pub fn new(experience: u64) -> Self {
        Self {
            experience,
            level: level_for(experience),
        }
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn title(&self) -> &'static str {
        level_title(self.level)
    }

    /// Progress through the current level
    pub fn progress(&self) -> LevelProgress {
        let level_floor = (self.level - 1) * XP_PER_LEVEL;
        let current = self.experience - level_floor;
        let percentage = (current as f64 / XP_PER_LEVEL as f64 * 100.0).min(100.0);
        LevelProgress {
            current,
            next: XP_PER_LEVEL,
            percentage,
        }
    }
}

/// XP earned inside the current level and the span of one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelProgress {
    pub current: u64,
    pub next: u64,
    pub percentage: f64,
}

/// Add `points` to `state`.
///
/// Returns the new state and whether the level went up. Negative awards
/// are rejected; what a level-up grants is the caller's business.
pub fn award(state: ExperienceState, points: i64) -> Result<(ExperienceState, bool), ProgressError> {
    let points = u64::try_from(points).map_err(|_| ProgressError::InvalidAward { points })?;
    let next = ExperienceState::new(state.experience.saturating_add(points));
    let leveled_up = next.level > state.level;
    Ok((next, leveled_up))
}

/// XP rewards for completing a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpRewards {
    /// Flat XP for each newly completed day
    #[serde(default = "default_completion_xp")]
    pub completion_xp: u32,

    /// Bonus XP per day of the current streak
    #[serde(default = "default_streak_bonus_per_day")]
    pub streak_bonus_per_day: u32,

    /// Upper bound on the streak bonus
    #[serde(default = "default_streak_bonus_cap")]
    pub streak_bonus_cap: u32,
}

fn default_completion_xp() -> u32 {
    10
}

fn default_streak_bonus_per_day() -> u32 {
    2
}

fn default_streak_bonus_cap() -> u32 {
    20
}

impl Default for XpRewards {
    fn default() -> Self {
        Self {
            completion_xp: default_completion_xp(),
            streak_bonus_per_day: default_streak_bonus_per_day(),
            streak_bonus_cap: default_streak_bonus_cap(),
        }
    }
}

impl XpRewards {
    /// Streak day 1 = 2 XP, day 2 = 4 XP, etc. (capped)
    pub fn streak_bonus(&self, streak_days: u32) -> u32 {
        streak_days
            .saturating_mul(self.streak_bonus_per_day)
            .min(self.streak_bonus_cap)
    }

    /// Total XP for one completion with the given current streak
    pub fn for_completion(&self, current_streak: u32) -> u32 {
        self.completion_xp
            .saturating_add(self.streak_bonus(current_streak))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(99), 1);
        assert_eq!(level_for(100), 2);
        assert_eq!(level_for(250), 3);
        assert_eq!(level_for(10_000), 101);
    }

    #[test]
    fn test_default_state_is_level_one() {
        let state = ExperienceState::default();
        assert_eq!(state.experience(), 0);
        assert_eq!(state.level(), 1);
    }

    #[test]
    fn test_award_crosses_level() {
        let (next, leveled_up) = award(ExperienceState::new(95), 10).unwrap();
        assert_eq!(next.experience(), 105);
        assert_eq!(next.level(), 2);
        assert!(leveled_up);
    }

    #[test]
    fn test_award_within_level() {
        let (next, leveled_up) = award(ExperienceState::new(10), 50).unwrap();
        assert_eq!(next, ExperienceState::new(60));
        assert!(!leveled_up);
    }

    #[test]
    fn test_zero_award_changes_nothing() {
        for xp in [0, 1, 99, 100, 12_345] {
            let state = ExperienceState::new(xp);
            assert_eq!(award(state, 0).unwrap(), (state, false));
        }
    }

    #[test]
    fn test_award_can_skip_levels() {
        let (next, leveled_up) = award(ExperienceState::new(50), 300).unwrap();
        assert_eq!(next.level(), 4);
        assert!(leveled_up);
    }

    #[test]
    fn test_negative_award_rejected() {
        let err = award(ExperienceState::new(50), -1).unwrap_err();
        assert_eq!(err, ProgressError::InvalidAward { points: -1 });
    }

    #[test]
    fn test_award_saturates() {
        let (next, _) = award(ExperienceState::new(u64::MAX - 5), 10).unwrap();
        assert_eq!(next.experience(), u64::MAX);
        assert_eq!(next.level(), level_for(u64::MAX));
    }

    #[test]
    fn test_level_titles() {
        assert_eq!(level_title(1), "Beginner");
        assert_eq!(level_title(5), "Apprentice");
        assert_eq!(level_title(19), "Practitioner");
        assert_eq!(level_title(20), "Expert");
        assert_eq!(level_title(49), "Master");
        assert_eq!(level_title(50), "Legend");
    }

    #[test]
    fn test_progress_within_level() {
        let progress = ExperienceState::new(275).progress();
        assert_eq!(progress.current, 75);
        assert_eq!(progress.next, 100);
        assert!((progress.percentage - 75.0).abs() < 0.01);

        assert_eq!(ExperienceState::new(0).progress().current, 0);
    }

    #[test]
    fn test_streak_bonus_capped() {
        let rewards = XpRewards::default();
        assert_eq!(rewards.streak_bonus(0), 0);
        assert_eq!(rewards.streak_bonus(1), 2);
        assert_eq!(rewards.streak_bonus(9), 18);
        assert_eq!(rewards.streak_bonus(50), 20);
        assert_eq!(rewards.for_completion(3), 16);
    }
}
