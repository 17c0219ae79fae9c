//! Persistence for users, habits and completions
//!
//! Stored in a SQLite database (`[storage] database_path`, by default
//! `~/.habit-streak/habits.db`).
//! The table modules expose free functions over `&Connection` so callers
//! can run several of them inside one transaction:
//!
//! ```ignore
//! let db = HabitDb::open(&config.storage.database_path())?;
//! let mut conn = db.conn();
//! let tx = conn.transaction()?;
//! completions::insert_completion(&tx, habit_id, day, None, now)?;
//! habits::cache_streaks(&tx, habit_id, streaks)?;
//! tx.commit()?;
//! ```

mod db;

pub mod completions;
pub mod habits;
pub mod users;

pub use db::HabitDb;
