//! Derived read models: per-habit stats, dashboard and calendar heatmap

use std::collections::BTreeMap;

use serde::Serialize;

use super::habit::{HabitId, HabitView};
use super::user::{User, UserProfile};
use crate::progress::CompletionDay;

/// How many habits the dashboard lists as recent
const RECENT_HABITS: usize = 5;

/// Completion statistics for one habit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    /// Calendar days from creation through today, inclusive
    pub total_days: u32,
    /// Percentage of those days with a completion (one decimal)
    pub completion_rate: f64,
}

impl HabitStats {
    pub fn from_view(view: &HabitView, today: CompletionDay) -> Self {
        let created = CompletionDay::from_timestamp_millis(view.habit.created_at).unwrap_or(today);
        let total_days = (created.days_until(today) + 1).max(1) as u32;
        let rate = (view.total_completions as f64 / total_days as f64 * 100.0).min(100.0);

        Self {
            current_streak: view.current_streak,
            longest_streak: view.longest_streak,
            total_completions: view.total_completions,
            total_days,
            completion_rate: (rate * 10.0).round() / 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentHabit {
    pub id: HabitId,
    pub name: String,
    pub current_streak: u32,
    pub color: String,
}

/// Overview of one user's habits
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: UserProfile,
    pub habits: usize,
    /// Active habits with a non-zero current streak
    pub active_streaks: usize,
    /// Sum of current streaks over active habits
    pub total_streaks: u64,
    pub today_completions: usize,
    pub recent_habits: Vec<RecentHabit>,
}

impl Dashboard {
    pub fn build(user: &User, views: &[HabitView]) -> Self {
        let active: Vec<&HabitView> = views.iter().filter(|v| v.habit.is_active).collect();

        let mut recent = active.clone();
        recent.sort_by(|a, b| {
            b.habit
                .created_at
                .cmp(&a.habit.created_at)
                .then(b.habit.id.cmp(&a.habit.id))
        });

        Self {
            user: user.profile(),
            habits: views.len(),
            active_streaks: active.iter().filter(|v| v.current_streak > 0).count(),
            total_streaks: active.iter().map(|v| u64::from(v.current_streak)).sum(),
            today_completions: views.iter().filter(|v| v.completed_today).count(),
            recent_habits: recent
                .into_iter()
                .take(RECENT_HABITS)
                .map(|v| RecentHabit {
                    id: v.habit.id,
                    name: v.habit.name.clone(),
                    current_streak: v.current_streak,
                    color: v.habit.color.clone(),
                })
                .collect(),
        }
    }
}

/// One cell of the completion heatmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: CompletionDay,
    /// Habits completed on this day
    pub completions: u32,
    /// 0 = none, 1..=3 = that many, 4 = four or more
    pub intensity: u8,
}

impl CalendarDay {
    /// Trailing `days` days ending at `today`, oldest first
    pub fn trailing(views: &[HabitView], today: CompletionDay, days: u32) -> Vec<Self> {
        let mut counts: BTreeMap<CompletionDay, u32> = BTreeMap::new();
        for view in views {
            for entry in &view.completions {
                *counts.entry(entry.date).or_default() += 1;
            }
        }

        let mut out = Vec::with_capacity(days as usize);
        let mut day = Some(today);
        for _ in 0..days {
            let Some(d) = day else { break };
            let completions = counts.get(&d).copied().unwrap_or(0);
            out.push(Self {
                date: d,
                completions,
                intensity: completions.min(4) as u8,
            });
            day = d.pred();
        }
        out.reverse();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::habit::{CompletionEntry, Habit};
    use crate::progress::{normalize, ExperienceState};

    const JAN_1_2024_MS: i64 = 1_704_067_200_000;
    const DAY_MS: i64 = 86_400_000;

    fn day(s: &str) -> CompletionDay {
        normalize(s).unwrap()
    }

    fn view(id: HabitId, created_at: i64, dates: &[&str], today: &str) -> HabitView {
        let habit = Habit {
            id,
            user_id: 1,
            name: format!("habit {id}"),
            description: None,
            category: None,
            color: "#10B981".into(),
            is_active: true,
            created_at,
        };
        let completions = dates
            .iter()
            .map(|d| CompletionEntry {
                date: day(d),
                notes: None,
            })
            .collect();
        HabitView::build(habit, completions, day(today))
    }

    fn user() -> User {
        User {
            id: 1,
            username: "ana".into(),
            email: "ana@example.com".into(),
            password_hash: String::new(),
            profile_photo: None,
            experience: ExperienceState::new(0),
            total_streaks: 0,
            created_at: JAN_1_2024_MS,
        }
    }

    #[test]
    fn test_stats_rate() {
        let v = view(1, JAN_1_2024_MS, &["2024-01-01", "2024-01-02", "2024-01-04"], "2024-01-04");
        let stats = HabitStats::from_view(&v, day("2024-01-04"));
        assert_eq!(stats.total_days, 4);
        assert_eq!(stats.total_completions, 3);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.completion_rate, 75.0);
    }

    #[test]
    fn test_stats_rate_rounds_and_caps() {
        let v = view(1, JAN_1_2024_MS, &["2024-01-01"], "2024-01-03");
        assert_eq!(HabitStats::from_view(&v, day("2024-01-03")).completion_rate, 33.3);

        // Backdated completions before creation
        let v = view(1, JAN_1_2024_MS, &["2023-12-30", "2023-12-31", "2024-01-01"], "2024-01-01");
        let stats = HabitStats::from_view(&v, day("2024-01-01"));
        assert_eq!(stats.total_days, 1);
        assert_eq!(stats.completion_rate, 100.0);
    }

    #[test]
    fn test_dashboard_counts() {
        let today = "2024-01-05";
        let idle = view(3, JAN_1_2024_MS + 2 * DAY_MS, &["2024-01-01"], today);
        let mut paused = view(4, JAN_1_2024_MS + 3 * DAY_MS, &["2024-01-05"], today);
        paused.habit.is_active = false;

        let views = vec![
            view(1, JAN_1_2024_MS, &["2024-01-04", "2024-01-05"], today),
            view(2, JAN_1_2024_MS + DAY_MS, &["2024-01-03", "2024-01-04"], today),
            idle,
            paused,
        ];
        let dash = Dashboard::build(&user(), &views);

        assert_eq!(dash.habits, 4);
        assert_eq!(dash.active_streaks, 2);
        assert_eq!(dash.total_streaks, 4);
        assert_eq!(dash.today_completions, 2);
        let recent: Vec<HabitId> = dash.recent_habits.iter().map(|h| h.id).collect();
        assert_eq!(recent, vec![3, 2, 1]);
    }

    #[test]
    fn test_calendar_trailing_window() {
        let today = "2024-01-05";
        let views = vec![
            view(1, JAN_1_2024_MS, &["2024-01-04", "2024-01-05"], today),
            view(2, JAN_1_2024_MS, &["2024-01-05", "2023-12-01"], today),
        ];
        let cal = CalendarDay::trailing(&views, day(today), 3);
        assert_eq!(cal.len(), 3);
        assert_eq!(cal[0].date, day("2024-01-03"));
        assert_eq!(cal[0].intensity, 0);
        assert_eq!(cal[1].completions, 1);
        assert_eq!(cal[2].completions, 2);
        assert_eq!(cal[2].intensity, 2);
    }
}
