//! SQLite database connection and schema management
//!
//! Manages `~/.habit-streak/habits.db` with automatic schema migration.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

/// Schema version written to fresh databases
const CURRENT_VERSION: i64 = 1;

/// Shared handle to the habit database.
///
/// All access goes through one connection behind a mutex, so writes to the
/// same habit are serialized.
#[derive(Clone)]
pub struct HabitDb {
    conn: Arc<Mutex<Connection>>,
}

impl HabitDb {
    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open habit db: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        info!("[habit-streak:store] Opened {}", path.display());
        Self::from_connection(conn)
    }

    /// Private in-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory habit db")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Lock the connection.
    ///
    /// A panic while the lock was held cannot leave a half-applied write
    /// behind (open transactions roll back on drop), so poisoning is ignored.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to create habit schema")?;
        drop(conn);
        self.run_migrations()
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i64 = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )?;

        if version == 0 {
            // Fresh database, SCHEMA_SQL is already current
            conn.execute(
                "INSERT OR REPLACE INTO schema_version VALUES (?1)",
                [CURRENT_VERSION],
            )?;
            return Ok(());
        }

        if version > CURRENT_VERSION {
            warn!(
                "[habit-streak:store] Database schema v{} is newer than v{}",
                version, CURRENT_VERSION
            );
        }

        Ok(())
    }
}

/// SQL schema for the habit database
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    profile_photo TEXT,
    experience INTEGER NOT NULL DEFAULT 0,
    level INTEGER NOT NULL DEFAULT 1,
    total_streaks INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS habits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    category TEXT,
    color TEXT NOT NULL DEFAULT '#3B82F6',
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    -- Last computed streaks; recomputed on every completion change
    current_streak INTEGER NOT NULL DEFAULT 0,
    longest_streak INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_habit_user ON habits(user_id);

-- One row per completed (habit, day)
CREATE TABLE IF NOT EXISTS completions (
    habit_id INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    day TEXT NOT NULL,
    notes TEXT,
    completed_at INTEGER NOT NULL,
    PRIMARY KEY (habit_id, day)
);

-- (habit, day) pairs that already paid XP
CREATE TABLE IF NOT EXISTS xp_awards (
    habit_id INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    day TEXT NOT NULL,
    points INTEGER NOT NULL,
    awarded_at INTEGER NOT NULL,
    PRIMARY KEY (habit_id, day)
);

CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tables(db: &HabitDb) -> Vec<String> {
        let conn = db.conn();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn test_open_and_init() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("habits.db");
        let db = HabitDb::open(&db_path).unwrap();

        let tables = tables(&db);
        for expected in ["users", "habits", "completions", "xp_awards", "schema_version"] {
            assert!(tables.contains(&expected.to_string()), "missing {expected}");
        }

        let version: i64 = db
            .conn()
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("habits.db");
        {
            let db = HabitDb::open(&db_path).unwrap();
            db.conn()
                .execute(
                    "INSERT INTO users (username, email, password_hash, created_at)
                     VALUES ('ana', 'ana@example.com', 'x', 0)",
                    [],
                )
                .unwrap();
        }
        let db = HabitDb::open(&db_path).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_reopen_keeps_schema_version() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("habits.db");
        drop(HabitDb::open(&db_path).unwrap());

        let db = HabitDb::open(&db_path).unwrap();
        let versions: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_completion_day_is_unique_per_habit() {
        let db = HabitDb::open_in_memory().unwrap();
        let conn = db.conn();
        conn.execute_batch(
            "INSERT INTO users (id, username, email, password_hash, created_at)
                 VALUES (1, 'ana', 'ana@example.com', 'x', 0);
             INSERT INTO habits (id, user_id, name, created_at) VALUES (1, 1, 'Read', 0);
             INSERT INTO completions (habit_id, day, completed_at) VALUES (1, '2024-01-01', 0);",
        )
        .unwrap();

        let dup = conn.execute(
            "INSERT INTO completions (habit_id, day, completed_at) VALUES (1, '2024-01-01', 1)",
            [],
        );
        assert!(dup.is_err());
    }
}
