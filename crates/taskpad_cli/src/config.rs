//! Startup configuration.
//!
//! # Responsibility
//! - Resolve database path, log settings and gateway credential once.
//!
//! # Invariants
//! - Environment is read only here; everything downstream receives values.
//! - The API key is handed to the gateway constructor, never stored globally.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use taskpad_core::gateway::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use taskpad_core::{default_log_level, GatewayConfig};

pub const ENV_HOME: &str = "TASKPAD_HOME";
pub const ENV_DB_PATH: &str = "TASKPAD_DB_PATH";
pub const ENV_LOG_DIR: &str = "TASKPAD_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "TASKPAD_LOG_LEVEL";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "TASKPAD_MODEL";
pub const ENV_API_URL: &str = "TASKPAD_API_URL";

const DATA_DIR_NAME: &str = ".taskpad";
const DB_FILE_NAME: &str = "taskpad.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No `TASKPAD_HOME` and no resolvable home directory.
    NoDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "cannot determine a data directory; set {ENV_HOME} or {ENV_DB_PATH}"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Resolves configuration from `lookup` with `home` as fallback base.
    ///
    /// Blank variables count as unset.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = var(ENV_HOME)
            .map(PathBuf::from)
            .or_else(|| home.map(|home| home.join(DATA_DIR_NAME)));

        let db_path = match var(ENV_DB_PATH) {
            Some(path) => PathBuf::from(path),
            None => data_dir.clone().ok_or(ConfigError::NoDataDir)?.join(DB_FILE_NAME),
        };
        let log_dir = match var(ENV_LOG_DIR) {
            Some(path) => PathBuf::from(path),
            None => match data_dir {
                Some(dir) => dir.join(LOG_DIR_NAME),
                None => std::env::temp_dir().join("taskpad-logs"),
            },
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level: var(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            gateway: GatewayConfig {
                api_key: var(ENV_API_KEY),
                model: var(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                endpoint: var(ENV_API_URL).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_API_KEY, ENV_DB_PATH, ENV_HOME, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_live_under_home() {
        let config = AppConfig::from_lookup(lookup(&[]), Some(PathBuf::from("/home/u"))).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/home/u/.taskpad/taskpad.sqlite3"));
        assert_eq!(config.log_dir, PathBuf::from("/home/u/.taskpad/logs"));
        assert_eq!(config.gateway.api_key, None);
        assert_eq!(config.gateway.model, "gpt-4o-mini");
    }

    #[test]
    fn explicit_variables_win_and_blank_key_is_unset() {
        let config = AppConfig::from_lookup(
            lookup(&[
                (ENV_HOME, "/data"),
                (ENV_DB_PATH, "/tmp/x.sqlite3"),
                (ENV_LOG_LEVEL, "warn"),
                (ENV_API_KEY, "  "),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.sqlite3"));
        assert_eq!(config.log_dir, PathBuf::from("/data/logs"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.gateway.api_key, None);
    }

    #[test]
    fn api_key_is_passed_through() {
        let config = AppConfig::from_lookup(
            lookup(&[(ENV_API_KEY, "sk-abc")]),
            Some(PathBuf::from("/home/u")),
        )
        .unwrap();
        assert_eq!(config.gateway.api_key.as_deref(), Some("sk-abc"));
    }

    #[test]
    fn missing_home_without_db_path_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[]), None).unwrap_err();
        assert_eq!(err, ConfigError::NoDataDir);
    }
}
