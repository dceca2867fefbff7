// system-tests/src/config/env.rs
// ============================================================================
// Module: Database Test Environment
// Description: Environment-backed configuration for the Postgres suite.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid
//! silent misconfiguration. Invalid UTF-8 fails closed. The suite is opt-in:
//! a missing or false gate variable means skip, never fail.

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for database test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbEnv {
    /// Opt-in gate for the Postgres suite (`true`/`false` or `1`/`0`).
    LocalTest,
    /// Database host override.
    Host,
    /// Database port override (positive integer).
    Port,
    /// Database name override.
    Name,
    /// Database user override.
    User,
    /// Database password override.
    Password,
}

impl DbEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalTest => "ROWFENCE_DB_LOCAL_TEST",
            Self::Host => "ROWFENCE_DB_HOST",
            Self::Port => "ROWFENCE_DB_PORT",
            Self::Name => "ROWFENCE_DB_NAME",
            Self::User => "ROWFENCE_DB_USER",
            Self::Password => "ROWFENCE_DB_PASSWORD",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed database test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbTestConfig {
    /// Whether the Postgres suite should run at all.
    pub enabled: bool,
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub dbname: String,
    /// Database user.
    pub user: String,
    /// Database password.
    pub password: String,
}

impl DbTestConfig {
    /// Loads configuration from environment variables with documented
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is
    /// empty, or fails validation (for example, a malformed port).
    pub fn load() -> Result<Self, String> {
        let enabled = parse_bool_env(
            DbEnv::LocalTest.as_str(),
            read_env_nonempty(DbEnv::LocalTest.as_str())?,
        )?;
        let host = read_env_nonempty(DbEnv::Host.as_str())?
            .unwrap_or_else(|| "localhost".to_string());
        let port = read_env_nonempty(DbEnv::Port.as_str())?
            .map(|value| parse_port(DbEnv::Port.as_str(), &value))
            .transpose()?
            .unwrap_or(5432);
        let dbname = read_env_nonempty(DbEnv::Name.as_str())?
            .unwrap_or_else(|| "rowfence_dev".to_string());
        let user = read_env_nonempty(DbEnv::User.as_str())?
            .unwrap_or_else(|| "rowfence_app_rw".to_string());
        let password = read_env_nonempty(DbEnv::Password.as_str())?
            .unwrap_or_else(|| "rowfence_app_rw".to_string());
        Ok(Self {
            enabled,
            host,
            port,
            dbname,
            user,
            password,
        })
    }

    /// Builds a Postgres connection string from the configured parameters.
    #[must_use]
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.dbname, self.user, self.password
        )
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a port value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
fn parse_port(name: &str, raw: &str) -> Result<u16, String> {
    let port: u16 =
        raw.trim().parse().map_err(|_| format!("{name} must be a valid port number"))?;
    if port == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(port)
}

/// Parses a boolean environment variable; unset means false.
///
/// # Errors
///
/// Returns an error when the value is not a recognized boolean literal.
fn parse_bool_env(name: &str, raw: Option<String>) -> Result<bool, String> {
    let Some(value) = raw else {
        return Ok(false);
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(format!("{name} must be 1, 0, true, or false"))
}
