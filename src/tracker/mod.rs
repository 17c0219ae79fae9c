//! Habit tracker - completion orchestration
//!
//! Glues the store to the progress engine. A completion event adds the day
//! to the habit's set, recomputes streaks from the full set, and awards
//! experience through the ledger, all inside one transaction.

mod auth;
mod error;

pub use auth::{hash_password, verify_password, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
pub use error::TrackerError;

use std::sync::Arc;

use anyhow::Context;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{
    CalendarDay, Credentials, Dashboard, Habit, HabitId, HabitStats, HabitUpdate, HabitView,
    NewHabit, NewUser, User, UserId, UserProfile, ValidationError,
};
use crate::progress::{award, normalize, Clock, CompletionDay, SystemClock, XpRewards};
use crate::store::{completions, habits, users, HabitDb};

/// Longest calendar window served in one request
pub const MAX_CALENDAR_DAYS: u32 = 3660;

/// Result of a completion event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub habit: HabitView,
    pub day: CompletionDay,
    /// False when the day was already completed
    pub newly_completed: bool,
    pub xp_awarded: u32,
    pub leveled_up: bool,
    pub user: UserProfile,
}

/// Entry point for every habit and user operation
#[derive(Clone)]
pub struct HabitTracker {
    db: HabitDb,
    clock: Arc<dyn Clock>,
    rewards: XpRewards,
    bcrypt_cost: u32,
}

impl HabitTracker {
    pub fn new(db: HabitDb, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            clock,
            rewards: XpRewards::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Open the configured database with the wall clock
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let path = config.storage.database_path();
        let db = HabitDb::open(&path)
            .with_context(|| format!("Failed to open habit store at {}", path.display()))?;
        Ok(Self::new(db, Arc::new(SystemClock))
            .with_rewards(config.rewards)
            .with_bcrypt_cost(config.auth.bcrypt_cost))
    }

    pub fn with_rewards(mut self, rewards: XpRewards) -> Self {
        self.rewards = rewards;
        self
    }

    /// Set the bcrypt work factor, clamped to what bcrypt accepts
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST);
        self
    }

    pub fn today(&self) -> CompletionDay {
        self.clock.today()
    }

    fn now_ms(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    // ========================================
    // USERS
    // ========================================

    pub fn register(&self, new_user: NewUser) -> Result<UserProfile, TrackerError> {
        let new_user = new_user.normalized()?;
        // Hash before taking the lock, bcrypt is slow on purpose
        let password_hash = hash_password(&new_user.password, self.bcrypt_cost)?;
        let now = self.now_ms();

        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        if users::user_exists(&tx, &new_user.username, &new_user.email)? {
            return Err(TrackerError::UserExists);
        }
        let id = users::insert_user(&tx, &new_user.username, &new_user.email, &password_hash, now)?;
        let user = load_user(&tx, id)?;
        tx.commit()?;

        info!("[habit-streak:tracker] Registered user #{} ({})", id, user.username);
        Ok(user.profile())
    }

    pub fn login(&self, credentials: Credentials) -> Result<UserProfile, TrackerError> {
        let email = credentials.email.trim().to_lowercase();
        let user = users::user_by_email(&self.db.conn(), &email)?
            .ok_or(TrackerError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            debug!("[habit-streak:tracker] Rejected login for user #{}", user.id);
            return Err(TrackerError::InvalidCredentials);
        }
        Ok(user.profile())
    }

    pub fn user(&self, id: UserId) -> Result<UserProfile, TrackerError> {
        Ok(load_user(&self.db.conn(), id)?.profile())
    }

    pub fn users(&self) -> Result<Vec<UserProfile>, TrackerError> {
        let users = users::list_users(&self.db.conn())?;
        Ok(users.iter().map(User::profile).collect())
    }

    /// Set or clear the profile photo URL
    pub fn set_profile_photo(
        &self,
        id: UserId,
        photo: Option<String>,
    ) -> Result<UserProfile, TrackerError> {
        let photo = photo.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
        if let Some(url) = &photo {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ValidationError::new("profilePhoto", "must be an http(s) URL").into());
            }
        }

        let conn = self.db.conn();
        if !users::set_profile_photo(&conn, id, photo.as_deref())? {
            return Err(TrackerError::user_not_found(id));
        }
        Ok(load_user(&conn, id)?.profile())
    }

    // ========================================
    // HABITS
    // ========================================

    pub fn habits(&self, user_id: UserId) -> Result<Vec<HabitView>, TrackerError> {
        let conn = self.db.conn();
        load_user(&conn, user_id)?;
        self.user_views(&conn, user_id)
    }

    pub fn habit(&self, id: HabitId) -> Result<HabitView, TrackerError> {
        let conn = self.db.conn();
        let habit = load_habit(&conn, id)?;
        self.view(&conn, habit)
    }

    pub fn create_habit(&self, new_habit: NewHabit) -> Result<HabitView, TrackerError> {
        let new_habit = new_habit.normalized()?;
        let now = self.now_ms();

        let conn = self.db.conn();
        load_user(&conn, new_habit.user_id)?;
        let id = habits::insert_habit(&conn, &new_habit, now)?;
        let habit = load_habit(&conn, id)?;

        info!(
            "[habit-streak:tracker] Created habit #{} '{}' for user #{}",
            id, habit.name, habit.user_id
        );
        self.view(&conn, habit)
    }

    pub fn update_habit(&self, id: HabitId, update: HabitUpdate) -> Result<HabitView, TrackerError> {
        let conn = self.db.conn();
        let mut habit = load_habit(&conn, id)?;
        update.apply_to(&mut habit)?;
        habits::update_habit(&conn, &habit)?;

        debug!("[habit-streak:tracker] Updated habit #{}", id);
        self.view(&conn, habit)
    }

    pub fn delete_habit(&self, id: HabitId) -> Result<(), TrackerError> {
        if !habits::delete_habit(&self.db.conn(), id)? {
            return Err(TrackerError::habit_not_found(id));
        }
        info!("[habit-streak:tracker] Deleted habit #{}", id);
        Ok(())
    }

    // ========================================
    // COMPLETIONS
    // ========================================

    /// Mark `habit_id` done for `date` (default: today).
    ///
    /// Completing a day twice is a successful no-op. Experience is paid at
    /// most once per (habit, day), even across uncomplete/complete cycles.
    pub fn complete(
        &self,
        habit_id: HabitId,
        date: Option<&str>,
        notes: Option<String>,
    ) -> Result<CompletionOutcome, TrackerError> {
        let today = self.today();
        let day = match date {
            Some(raw) => normalize(raw)?,
            None => today,
        };
        if day > today {
            return Err(TrackerError::FutureCompletion { day, today });
        }
        let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let now = self.now_ms();

        let mut conn = self.db.conn();
        let tx = conn.transaction()?;

        let habit = load_habit(&tx, habit_id)?;
        let newly_completed =
            completions::insert_completion(&tx, habit_id, day, notes.as_deref(), now)?;
        let view = self.view(&tx, habit)?;
        habits::cache_streaks(&tx, habit_id, view.streaks())?;

        let mut user = load_user(&tx, view.habit.user_id)?;
        let mut xp_awarded = 0;
        let mut leveled_up = false;

        if newly_completed {
            let points = self.rewards.for_completion(view.current_streak);
            if completions::record_award(&tx, habit_id, day, points, now)? {
                let (next, up) = award(user.experience, i64::from(points))?;
                user.experience = next;
                if up {
                    user.total_streaks += 1;
                }
                users::save_progress(&tx, user.id, user.experience, user.total_streaks)?;
                xp_awarded = points;
                leveled_up = up;
            }
        }

        tx.commit()?;

        if newly_completed {
            info!(
                "[habit-streak:tracker] Habit #{} completed for {} (streak {}, +{} XP{})",
                habit_id,
                day,
                view.current_streak,
                xp_awarded,
                if leveled_up { ", level up" } else { "" }
            );
        } else {
            debug!("[habit-streak:tracker] Habit #{} already completed for {}", habit_id, day);
        }

        Ok(CompletionOutcome {
            habit: view,
            day,
            newly_completed,
            xp_awarded,
            leveled_up,
            user: user.profile(),
        })
    }

    /// Remove the completion for `date`. Removing a day that was never
    /// completed is a no-op. Experience already paid is kept.
    pub fn uncomplete(&self, habit_id: HabitId, date: &str) -> Result<HabitView, TrackerError> {
        let day = normalize(date)?;

        let mut conn = self.db.conn();
        let tx = conn.transaction()?;

        let habit = load_habit(&tx, habit_id)?;
        let removed = completions::delete_completion(&tx, habit_id, day)?;
        let view = self.view(&tx, habit)?;
        habits::cache_streaks(&tx, habit_id, view.streaks())?;

        tx.commit()?;

        if removed {
            info!(
                "[habit-streak:tracker] Habit #{} uncompleted for {} (streak {})",
                habit_id, day, view.current_streak
            );
        }
        Ok(view)
    }

    // ========================================
    // READ MODELS
    // ========================================

    pub fn habit_stats(&self, id: HabitId) -> Result<HabitStats, TrackerError> {
        let view = self.habit(id)?;
        Ok(HabitStats::from_view(&view, self.today()))
    }

    pub fn dashboard(&self, user_id: UserId) -> Result<Dashboard, TrackerError> {
        let conn = self.db.conn();
        let user = load_user(&conn, user_id)?;
        let views = self.user_views(&conn, user_id)?;
        Ok(Dashboard::build(&user, &views))
    }

    /// Completion counts per day for the trailing `days` days
    pub fn calendar(&self, user_id: UserId, days: u32) -> Result<Vec<CalendarDay>, TrackerError> {
        let conn = self.db.conn();
        load_user(&conn, user_id)?;
        let views = self.user_views(&conn, user_id)?;
        Ok(CalendarDay::trailing(
            &views,
            self.today(),
            days.min(MAX_CALENDAR_DAYS),
        ))
    }

    fn view(&self, conn: &Connection, habit: Habit) -> Result<HabitView, TrackerError> {
        let entries = completions::completions_for_habit(conn, habit.id)?;
        Ok(HabitView::build(habit, entries, self.today()))
    }

    fn user_views(&self, conn: &Connection, user_id: UserId) -> Result<Vec<HabitView>, TrackerError> {
        habits::habits_for_user(conn, user_id)?
            .into_iter()
            .map(|habit| self.view(conn, habit))
            .collect()
    }
}

fn load_user(conn: &Connection, id: UserId) -> Result<User, TrackerError> {
    users::user_by_id(conn, id)?.ok_or_else(|| TrackerError::user_not_found(id))
}

fn load_habit(conn: &Connection, id: HabitId) -> Result<Habit, TrackerError> {
    habits::habit_by_id(conn, id)?.ok_or_else(|| TrackerError::habit_not_found(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> HabitTracker {
        HabitTracker::new(HabitDb::open_in_memory().unwrap(), Arc::new(SystemClock))
    }

    #[test]
    fn test_bcrypt_cost_is_clamped() {
        assert_eq!(tracker().with_bcrypt_cost(40).bcrypt_cost, MAX_BCRYPT_COST);
        assert_eq!(tracker().with_bcrypt_cost(1).bcrypt_cost, MIN_BCRYPT_COST);
        assert_eq!(tracker().with_bcrypt_cost(10).bcrypt_cost, 10);
    }

    #[test]
    fn test_config_cost_out_of_range_still_registers() {
        let mut config = Config::default();
        config.auth.bcrypt_cost = 0;
        let tracker = tracker().with_bcrypt_cost(config.auth.bcrypt_cost);
        let user = tracker
            .register(NewUser {
                username: "ana".into(),
                email: "ana@example.com".into(),
                password: "secret123".into(),
            })
            .unwrap();
        assert_eq!(user.level, 1);
    }
}
