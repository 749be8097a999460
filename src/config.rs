//! Runtime configuration.
//!
//! Values come from the environment with development defaults; CLI flags in
//! `main.rs` override them.

use std::path::PathBuf;

/// Secret used when `SECRET_KEY` is not set.
pub const DEFAULT_SECRET_KEY: &str = "dev-secret";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

const DATABASE_FILE_NAME: &str = "notes.db";

#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database file (from QUICKNOTES_DB_PATH).
    pub database_path: PathBuf,
    /// Key for signing flash cookies (from SECRET_KEY).
    pub secret_key: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database_path = match std::env::var("QUICKNOTES_DB_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_database_path(),
        };

        let secret_key = std::env::var("SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("SECRET_KEY not set, using development default");
                DEFAULT_SECRET_KEY.to_string()
            });

        Self {
            database_path,
            secret_key,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The platform data directory, or `./data` when there is no home directory.
pub fn default_database_path() -> PathBuf {
    match directories::ProjectDirs::from("", "", "quicknotes") {
        Some(dirs) => dirs.data_dir().join(DATABASE_FILE_NAME),
        None => PathBuf::from("data").join(DATABASE_FILE_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_database_path_ends_in_notes_db() {
        assert!(default_database_path().ends_with(DATABASE_FILE_NAME));
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        let config = Config {
            database_path: PathBuf::from("notes.db"),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
