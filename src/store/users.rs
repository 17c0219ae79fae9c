//! User rows

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{User, UserId};
use crate::progress::ExperienceState;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, profile_photo, experience, total_streaks, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let experience: i64 = row.get(5)?;
    let total_streaks: i64 = row.get(6)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        profile_photo: row.get(4)?,
        // The stored level column is ignored; it always follows experience
        experience: ExperienceState::new(u64::try_from(experience).unwrap_or(0)),
        total_streaks: u64::try_from(total_streaks).unwrap_or(0),
        created_at: row.get(7)?,
    })
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Insert a user and return its id. The email must already be normalized.
pub fn insert_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
    created_at: i64,
) -> rusqlite::Result<UserId> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![username, email, password_hash, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn user_by_id(conn: &Connection, id: UserId) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        [id],
        user_from_row,
    )
    .optional()
}

pub fn user_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
        [email],
        user_from_row,
    )
    .optional()
}

/// Whether the username or the email is already registered
pub fn user_exists(conn: &Connection, username: &str, email: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE username = ?1 OR email = ?2",
        [username, email],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

pub fn list_users(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
    let users = stmt
        .query_map([], user_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(users)
}

/// Persist experience, the level derived from it, and the bonus counter
pub fn save_progress(
    conn: &Connection,
    id: UserId,
    experience: ExperienceState,
    total_streaks: u64,
) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE users SET experience = ?1, level = ?2, total_streaks = ?3 WHERE id = ?4",
        params![
            to_sql_int(experience.experience()),
            to_sql_int(experience.level()),
            to_sql_int(total_streaks),
            id
        ],
    )?;
    Ok(())
}

/// Returns false if the user does not exist
pub fn set_profile_photo(
    conn: &Connection,
    id: UserId,
    photo: Option<&str>,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE users SET profile_photo = ?1 WHERE id = ?2",
        params![photo, id],
    )?;
    Ok(changed > 0)
}
