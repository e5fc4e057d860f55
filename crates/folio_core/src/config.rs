//! Runtime configuration resolved from the environment.
//!
//! | variable          | meaning                                  | default                      |
//! |-------------------|------------------------------------------|------------------------------|
//! | `FOLIO_DB_PATH`   | SQLite file, or `:memory:`               | `<temp_dir>/folio.sqlite3`   |
//! | `FOLIO_LOG_LEVEL` | `trace`/`debug`/`info`/`warn`/`error`    | by build mode                |
//! | `FOLIO_LOG_DIR`   | absolute directory for rolling log files | unset (file logging off)     |
//!
//! Blank values count as unset.

use crate::db::DbTarget;
use crate::logging::{default_log_level, normalize_level, LogConfig, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "FOLIO_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "FOLIO_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "FOLIO_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "folio.sqlite3";
const MEMORY_TARGET: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(value) => write!(
                f,
                "{LOG_LEVEL_VAR}=`{value}` is not one of trace|debug|info|warn|error"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_target: DbTarget,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to
    /// values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_target = match read(DB_PATH_VAR) {
            Some(value) => parse_db_target(&value),
            None => DbTarget::File(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
        };
        let log_level = match read(LOG_LEVEL_VAR) {
            Some(value) => {
                normalize_level(&value).map_err(|_| ConfigError::InvalidLogLevel(value))?
            }
            None => default_log_level(),
        };

        Ok(Self {
            db_target,
            log_level,
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        })
    }

    /// Overrides the database target, e.g. from a CLI flag.
    pub fn with_db_path(mut self, value: &str) -> Self {
        self.db_target = parse_db_target(value.trim());
        self
    }

    /// Logging settings, when a log directory is configured.
    pub fn log_config(&self) -> Option<LogConfig> {
        self.log_dir.as_ref().map(|dir| LogConfig {
            level: self.log_level,
            dir: dir.clone(),
        })
    }

    /// Overrides the log level; rejects unknown names.
    pub fn with_log_level(mut self, value: &str) -> Result<Self, LoggingError> {
        self.log_level = normalize_level(value)?;
        Ok(self)
    }
}

fn parse_db_target(value: &str) -> DbTarget {
    if value == MEMORY_TARGET {
        DbTarget::Memory
    } else {
        DbTarget::File(PathBuf::from(value))
    }
}
