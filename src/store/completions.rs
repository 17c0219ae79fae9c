//! Completion days and XP award bookkeeping

use rusqlite::types::Type;
use rusqlite::{params, Connection};

use crate::domain::{CompletionEntry, HabitId};
use crate::progress::{normalize, CompletionDay};

fn day_from_sql(idx: usize, raw: String) -> rusqlite::Result<CompletionDay> {
    normalize(&raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Record a completion. Returns false if the day was already completed.
pub fn insert_completion(
    conn: &Connection,
    habit_id: HabitId,
    day: CompletionDay,
    notes: Option<&str>,
    completed_at: i64,
) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO completions (habit_id, day, notes, completed_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![habit_id, day.to_string(), notes, completed_at],
    )?;
    Ok(inserted > 0)
}

/// Remove a completion. Returns false if the day was not completed.
pub fn delete_completion(
    conn: &Connection,
    habit_id: HabitId,
    day: CompletionDay,
) -> rusqlite::Result<bool> {
    let removed = conn.execute(
        "DELETE FROM completions WHERE habit_id = ?1 AND day = ?2",
        params![habit_id, day.to_string()],
    )?;
    Ok(removed > 0)
}

/// All completions of a habit, oldest first
pub fn completions_for_habit(
    conn: &Connection,
    habit_id: HabitId,
) -> rusqlite::Result<Vec<CompletionEntry>> {
    let mut stmt =
        conn.prepare("SELECT day, notes FROM completions WHERE habit_id = ?1 ORDER BY day")?;
    let entries = stmt
        .query_map([habit_id], |row| {
            Ok(CompletionEntry {
                date: day_from_sql(0, row.get(0)?)?,
                notes: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

/// Remember that `day` paid XP for this habit.
///
/// Returns false if it already had, in which case nothing may be awarded.
pub fn record_award(
    conn: &Connection,
    habit_id: HabitId,
    day: CompletionDay,
    points: u32,
    awarded_at: i64,
) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO xp_awards (habit_id, day, points, awarded_at) VALUES (?1, ?2, ?3, ?4)",
        params![habit_id, day.to_string(), points, awarded_at],
    )?;
    Ok(inserted > 0)
}
