//! Configuration loading and management

mod io;
mod settings;

pub use settings::{AuthSettings, ServerSettings, StorageSettings};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::progress::XpRewards;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP API
    #[serde(default)]
    pub server: ServerSettings,

    /// Database location
    #[serde(default)]
    pub storage: StorageSettings,

    /// XP paid per completion
    #[serde(default)]
    pub rewards: XpRewards,

    #[serde(default)]
    pub auth: AuthSettings,
}

impl Config {
    /// Apply `PORT`, `FRONTEND_URL` and `HABIT_STREAK_DB` from the environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("[habit-streak:config] Ignoring invalid PORT '{}'", port),
            }
        }

        if let Some(origin) = lookup("FRONTEND_URL").filter(|v| !v.trim().is_empty()) {
            self.server.allowed_origin = origin.trim().to_string();
        }

        if let Some(path) = lookup("HABIT_STREAK_DB").filter(|v| !v.trim().is_empty()) {
            self.storage.database_path = path.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.allowed_origin, "http://localhost:4200");
        assert_eq!(config.rewards.completion_xp, 10);
        assert_eq!(config.auth.bcrypt_cost, 12);
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [rewards]
            completion_xp = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.rewards.completion_xp, 25);
        assert_eq!(config.rewards.streak_bonus_cap, 20);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "4100"),
            ("FRONTEND_URL", "https://habits.example.com"),
            ("HABIT_STREAK_DB", "/tmp/h.db"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides_from(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.server.allowed_origin, "https://habits.example.com");
        assert_eq!(config.storage.database_path, "/tmp/h.db");
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides_from(|k| (k == "PORT").then(|| "http".to_string()));
        assert_eq!(config.server.port, 3000);
    }
}
