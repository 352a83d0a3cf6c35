//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is honoured if present.
//!
//! | Variable             | Default   |
//! |----------------------|-----------|
//! | `TODO_DATABASE_PATH` | `todo.db` |
//! | `TODO_HOST`          | `0.0.0.0` |
//! | `TODO_PORT`          | `5876`    |

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("todo.db"),
            host: "0.0.0.0".to_string(),
            port: 5876,
        }
    }
}

impl AppConfig {
    /// Every variable is optional, but a value that is set must be valid;
    /// there is no fallback to the defaults on error.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_path = lookup("TODO_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);
        let host = lookup("TODO_HOST").unwrap_or(defaults.host);
        let port = match lookup("TODO_PORT") {
            Some(raw) => raw.parse().map_err(|err: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: "TODO_PORT".to_string(),
                    message: err.to_string(),
                }
            })?,
            None => defaults.port,
        };

        if host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "TODO_HOST".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            database_path,
            host,
            port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
