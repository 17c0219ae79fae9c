//! Settings sections of the config file

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Config;

/// HTTP API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin allowed by CORS (the web client)
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Shared secret expected in `X-Habit-Token`. Empty disables the check.
    #[serde(default)]
    pub api_token: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_origin() -> String {
    "http://localhost:4200".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
            api_token: String::new(),
        }
    }
}

impl ServerSettings {
    /// `host:port` for binding and for CLI clients
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.bind_addr())
    }
}

/// Database location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Empty means `~/.habit-streak/habits.db`.
    #[serde(default)]
    pub database_path: String,
}

impl StorageSettings {
    pub fn database_path(&self) -> PathBuf {
        let raw = self.database_path.trim();
        if raw.is_empty() {
            return Config::global_config_dir().join("habits.db");
        }
        match raw.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(rest),
            None => PathBuf::from(raw),
        }
    }
}

/// Password hashing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_bcrypt_cost() -> u32 {
    12
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_database_path() {
        let storage = StorageSettings {
            database_path: "/var/lib/habits.db".into(),
        };
        assert_eq!(storage.database_path(), PathBuf::from("/var/lib/habits.db"));
    }

    #[test]
    fn test_empty_database_path_uses_config_dir() {
        let storage = StorageSettings::default();
        assert_eq!(
            storage.database_path(),
            Config::global_config_dir().join("habits.db")
        );
    }

    #[test]
    fn test_base_url() {
        let server = ServerSettings {
            port: 8080,
            ..ServerSettings::default()
        };
        assert_eq!(server.base_url(), "http://127.0.0.1:8080");
    }
}
