//! Core domain types for habit-streak

mod habit;
mod summary;
mod user;
mod validation;

pub use habit::{CompletionEntry, Habit, HabitId, HabitUpdate, HabitView, NewHabit, DEFAULT_HABIT_COLOR};
pub use summary::{CalendarDay, Dashboard, HabitStats, RecentHabit};
pub use user::{Credentials, NewUser, User, UserId, UserProfile};
pub use validation::ValidationError;
