//! Habit rows

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{Habit, HabitId, NewHabit, UserId, DEFAULT_HABIT_COLOR};
use crate::progress::StreakResult;

const HABIT_COLUMNS: &str = "id, user_id, name, description, category, color, is_active, created_at";

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        color: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert a validated habit and return its id
pub fn insert_habit(conn: &Connection, habit: &NewHabit, created_at: i64) -> rusqlite::Result<HabitId> {
    conn.execute(
        "INSERT INTO habits (user_id, name, description, category, color, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            habit.user_id,
            habit.name,
            habit.description,
            habit.category,
            habit.color.as_deref().unwrap_or(DEFAULT_HABIT_COLOR),
            created_at
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn habit_by_id(conn: &Connection, id: HabitId) -> rusqlite::Result<Option<Habit>> {
    conn.query_row(
        &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"),
        [id],
        habit_from_row,
    )
    .optional()
}

/// All habits of a user, oldest first
pub fn habits_for_user(conn: &Connection, user_id: UserId) -> rusqlite::Result<Vec<Habit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {HABIT_COLUMNS} FROM habits WHERE user_id = ?1 ORDER BY created_at, id"
    ))?;
    let habits = stmt
        .query_map([user_id], habit_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(habits)
}

/// Write the editable fields of `habit` back
pub fn update_habit(conn: &Connection, habit: &Habit) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE habits SET name = ?1, description = ?2, category = ?3, color = ?4, is_active = ?5
         WHERE id = ?6",
        params![
            habit.name,
            habit.description,
            habit.category,
            habit.color,
            habit.is_active,
            habit.id
        ],
    )?;
    Ok(changed > 0)
}

/// Delete a habit; its completions and awards cascade
pub fn delete_habit(conn: &Connection, id: HabitId) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM habits WHERE id = ?1", [id])?;
    Ok(changed > 0)
}

/// Store the last computed streaks next to the habit
pub fn cache_streaks(conn: &Connection, id: HabitId, streaks: StreakResult) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE habits SET current_streak = ?1, longest_streak = ?2 WHERE id = ?3",
        params![streaks.current_streak, streaks.longest_streak, id],
    )?;
    Ok(())
}
