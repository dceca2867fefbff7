// crates/rowfence-config/src/config.rs
// ============================================================================
// Module: Config Model
// Description: Configuration structs, loading pipeline, and validation.
// Purpose: Keep config input handling strict and fail-closed.
// ============================================================================

//! ## Overview
//! The configuration model mirrors the store config structs: a
//! `[store.sqlite]` section deserializes into
//! [`rowfence_store_sqlite::SqliteStoreConfig`], a `[store.postgres]` section
//! into [`rowfence_store_postgres::PostgresStoreConfig`], and an `[audit]`
//! section selects an audit sink. Every section is optional. Security
//! posture: config files are untrusted input; path, size, and encoding are
//! checked before the parser runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use rowfence_core::FileAuditSink;
use rowfence_core::NoopAuditSink;
use rowfence_core::StderrAuditSink;
use rowfence_core::StoreAuditSink;
use rowfence_store_postgres::PostgresStoreConfig;
use rowfence_store_sqlite::SqliteStoreConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default config file name resolved from the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "rowfence.toml";
/// Environment variable overriding the config file path.
pub const CONFIG_ENV_VAR: &str = "ROWFENCE_CONFIG";
/// Maximum accepted config file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid path, encoding, or section contents.
    #[error("config invalid: {0}")]
    Invalid(String),
    /// Filesystem error while reading the config file.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// Root configuration for the rowfence workspace.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowfenceConfig {
    /// Store backend configuration.
    #[serde(default)]
    pub store: StoreSection,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditSection,
}

/// Store backend selection; both backends may be configured at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Embedded `SQLite` store configuration.
    #[serde(default)]
    pub sqlite: Option<SqliteStoreConfig>,
    /// Postgres store configuration.
    #[serde(default)]
    pub postgres: Option<PostgresStoreConfig>,
}

/// Audit sink selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditSection {
    /// Which sink receives store audit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path; required when `sink` is `file`.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

/// Supported audit sink kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard all events.
    #[default]
    Noop,
    /// Write JSON lines to stderr.
    Stderr,
    /// Append JSON lines to `log_path`.
    File,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl RowfenceConfig {
    /// Loads configuration from `path`, the `ROWFENCE_CONFIG` environment
    /// variable, or `rowfence.toml` in the working directory, in that order.
    /// An absent file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path is invalid, the file is
    /// oversized or not UTF-8, parsing fails, or a section fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => match std::env::var(CONFIG_ENV_VAR) {
                Ok(from_env) => PathBuf::from(from_env),
                Err(_) => PathBuf::from(DEFAULT_CONFIG_NAME),
            },
        };
        validate_config_path(&resolved)?;
        if !resolved.exists() {
            return Ok(Self::default());
        }
        let metadata =
            std::fs::metadata(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let bytes = std::fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(&text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every configured section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(sqlite) = &self.store.sqlite {
            validate_sqlite(sqlite)?;
        }
        if let Some(postgres) = &self.store.postgres {
            validate_postgres(postgres)?;
        }
        self.audit.validate()
    }
}

impl AuditSection {
    /// Validates the audit section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a file sink lacks a log path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sink == AuditSinkKind::File && self.log_path.is_none() {
            return Err(ConfigError::Invalid(
                "config audit.log_path required for file sink".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the sink is invalid or the log file
    /// cannot be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn StoreAuditSink>, ConfigError> {
        match self.sink {
            AuditSinkKind::Noop => Ok(Arc::new(NoopAuditSink)),
            AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkKind::File => {
                let path = self.log_path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid(
                        "config audit.log_path required for file sink".to_string(),
                    )
                })?;
                let sink =
                    FileAuditSink::open(path).map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates the config file path before any filesystem access.
fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    let raw = path.as_os_str();
    if raw.is_empty() {
        return Err(ConfigError::Invalid("config path must not be empty".to_string()));
    }
    if raw.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates an `SQLite` store section.
fn validate_sqlite(config: &SqliteStoreConfig) -> Result<(), ConfigError> {
    if config.path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("config store.sqlite.path must not be empty".to_string()));
    }
    if config.busy_timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "config store.sqlite.busy_timeout_ms must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Validates a Postgres store section.
fn validate_postgres(config: &PostgresStoreConfig) -> Result<(), ConfigError> {
    if config.connection.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "config store.postgres.connection must not be empty".to_string(),
        ));
    }
    if config.connect_timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "config store.postgres.connect_timeout_ms must be positive".to_string(),
        ));
    }
    if config.statement_timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "config store.postgres.statement_timeout_ms must be positive".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::ConfigError;
    use super::validate_config_path;

    #[test]
    fn validate_config_path_rejects_empty_path() {
        let result = validate_config_path(Path::new(""));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_config_path_accepts_default_name() {
        assert!(validate_config_path(Path::new(super::DEFAULT_CONFIG_NAME)).is_ok());
    }
}
