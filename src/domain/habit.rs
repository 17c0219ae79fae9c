//! Habits and their completion history

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::user::UserId;
use super::validation::{non_blank, require_hex_color, require_min_chars, ValidationError};
use crate::progress::{compute_streaks, CompletionDay, StreakResult, StreakTier};

/// Unique identifier for a habit
pub type HabitId = i64;

/// Color used when a habit is created without one
pub const DEFAULT_HABIT_COLOR: &str = "#3B82F6";

/// Creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewHabit {
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        require_min_chars("name", &name, 2)?;

        let color = non_blank(self.color).unwrap_or_else(|| DEFAULT_HABIT_COLOR.to_string());
        require_hex_color(&color)?;

        Ok(Self {
            user_id: self.user_id,
            name,
            description: non_blank(self.description),
            category: non_blank(self.category),
            color: Some(color),
        })
    }
}

/// Partial update payload; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl HabitUpdate {
    /// Apply the update to `habit`, validating every field that is set
    pub fn apply_to(&self, habit: &mut Habit) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            let name = name.trim();
            require_min_chars("name", name, 2)?;
            habit.name = name.to_string();
        }
        if let Some(color) = &self.color {
            let color = color.trim();
            require_hex_color(color)?;
            habit.color = color.to_string();
        }
        if self.description.is_some() {
            habit.description = non_blank(self.description.clone());
        }
        if self.category.is_some() {
            habit.category = non_blank(self.category.clone());
        }
        if let Some(active) = self.is_active {
            habit.is_active = active;
        }
        Ok(())
    }
}

/// A stored habit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub color: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// One completed day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub date: CompletionDay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A habit with its history and streaks recomputed for a given day
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitView {
    #[serde(flatten)]
    pub habit: Habit,
    /// Oldest first
    pub completions: Vec<CompletionEntry>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    pub completed_today: bool,
    pub streak_tier: StreakTier,
}

impl HabitView {
    pub fn build(habit: Habit, mut completions: Vec<CompletionEntry>, today: CompletionDay) -> Self {
        completions.sort_by_key(|c| c.date);
        completions.dedup_by_key(|c| c.date);

        let days: BTreeSet<CompletionDay> = completions.iter().map(|c| c.date).collect();
        let StreakResult {
            current_streak,
            longest_streak,
        } = compute_streaks(&days, today);

        Self {
            habit,
            total_completions: days.len() as u32,
            completed_today: days.contains(&today),
            completions,
            current_streak,
            longest_streak,
            streak_tier: StreakTier::for_streak(current_streak),
        }
    }

    pub fn streaks(&self) -> StreakResult {
        StreakResult {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
        }
    }
}
