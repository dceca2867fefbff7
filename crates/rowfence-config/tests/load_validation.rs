// crates/rowfence-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

//! ## Overview
//! Strict-load coverage: path limits, the file size cap, UTF-8 and TOML
//! parsing, and per-section validation all fail closed.

use std::io::Write;
use std::path::Path;

use rowfence_config::ConfigError;
use rowfence_config::RowfenceConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<RowfenceConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(RowfenceConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(RowfenceConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(RowfenceConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(RowfenceConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[store.sqlite\npath = ").map_err(|err| err.to_string())?;
    match RowfenceConfig::load(Some(file.path())) {
        Err(ConfigError::Parse(_)) => Ok(()),
        Err(other) => Err(format!("expected parse error, got {other}")),
        Ok(_) => Err("expected parse failure".to_string()),
    }
}

#[test]
fn load_rejects_unknown_section() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[surprise]\nvalue = 1\n").map_err(|err| err.to_string())?;
    match RowfenceConfig::load(Some(file.path())) {
        Err(ConfigError::Parse(_)) => Ok(()),
        Err(other) => Err(format!("expected parse error, got {other}")),
        Ok(_) => Err("expected parse failure".to_string()),
    }
}

#[test]
fn load_rejects_empty_sqlite_path() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[store.sqlite]\npath = \"\"\n").map_err(|err| err.to_string())?;
    assert_invalid(
        RowfenceConfig::load(Some(file.path())),
        "config store.sqlite.path must not be empty",
    )?;
    Ok(())
}

#[test]
fn load_rejects_empty_postgres_connection() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[store.postgres]\nconnection = \"  \"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(
        RowfenceConfig::load(Some(file.path())),
        "config store.postgres.connection must not be empty",
    )?;
    Ok(())
}

#[test]
fn load_rejects_file_sink_without_log_path() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[audit]\nsink = \"file\"\n").map_err(|err| err.to_string())?;
    assert_invalid(
        RowfenceConfig::load(Some(file.path())),
        "config audit.log_path required for file sink",
    )?;
    Ok(())
}
