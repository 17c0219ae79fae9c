//! Init command implementation

use anyhow::{bail, Result};
use std::path::PathBuf;

use habit_streak::config::Config;

/// Default configuration content for `habit-streak init`
pub const DEFAULT_CONFIG: &str = r#"# habit-streak configuration
# ==========================
#
# Environment variables override this file:
#   PORT             -> server.port
#   FRONTEND_URL     -> server.allowed_origin
#   HABIT_STREAK_DB  -> storage.database_path

# ============================================================================
# SERVER - JSON API used by the web client
# ============================================================================
[server]
host = "127.0.0.1"
port = 3000
# Origin of the web client (CORS)
allowed_origin = "http://localhost:4200"
# Optional shared secret, sent as `X-Habit-Token`
# Leave empty to disable the check (local development)
api_token = ""

# ============================================================================
# STORAGE
# ============================================================================
[storage]
# Empty: ~/.habit-streak/habits.db
database_path = ""

# ============================================================================
# REWARDS - experience paid for each newly completed day
# ============================================================================
#
# XP = completion_xp + min(current_streak * streak_bonus_per_day, streak_bonus_cap)
# Every 100 XP is one level.
[rewards]
completion_xp = 10
streak_bonus_per_day = 2
streak_bonus_cap = 20

# ============================================================================
# AUTH
# ============================================================================
[auth]
# bcrypt work factor (4..=31)
bcrypt_cost = 12
"#;

/// Write the default configuration.
/// By default creates the global config at ~/.habit-streak/config.toml
pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    Config::write_template(&config_path, DEFAULT_CONFIG)?;
    println!("Created: {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        init_command(Some(path.clone()), false).unwrap();
        assert!(init_command(Some(path.clone()), false).is_err());
        init_command(Some(path.clone()), true).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[rewards]"));
    }
}
