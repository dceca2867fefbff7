// crates/rowfence-config/tests/defaults.rs
// =============================================================================
// Module: Config Defaults Tests
// Description: Validate default resolution and section deserialization.
// Purpose: Ensure absent files and sections produce safe defaults.
// =============================================================================

//! ## Overview
//! Default-path coverage: an absent config file yields defaults, both store
//! sections deserialize with their serde defaults, and the audit section
//! builds its configured sink.

use std::io::Write;
use std::path::Path;

use rowfence_config::AuditSinkKind;
use rowfence_config::RowfenceConfig;
use tempfile::NamedTempFile;
use tempfile::TempDir;

type TestResult = Result<(), String>;

#[test]
fn load_yields_defaults_for_absent_file() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("rowfence.toml");
    let config = RowfenceConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    assert!(config.store.sqlite.is_none());
    assert!(config.store.postgres.is_none());
    assert_eq!(config.audit.sink, AuditSinkKind::Noop);
    Ok(())
}

#[test]
fn load_parses_both_store_sections() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(
        b"[store.sqlite]\npath = \"rowfence.db\"\n\n[store.postgres]\nconnection = \
          \"host=localhost port=5432 dbname=rowfence_dev user=rowfence_app_rw \
          password=rowfence_app_rw\"\n",
    )
    .map_err(|err| err.to_string())?;
    let config = RowfenceConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    let sqlite = config.store.sqlite.ok_or("missing sqlite section")?;
    assert_eq!(sqlite.path, Path::new("rowfence.db"));
    assert_eq!(sqlite.busy_timeout_ms, 5_000);
    let postgres = config.store.postgres.ok_or("missing postgres section")?;
    assert!(postgres.connection.contains("dbname=rowfence_dev"));
    assert_eq!(postgres.connect_timeout_ms, 5_000);
    assert_eq!(postgres.statement_timeout_ms, 30_000);
    Ok(())
}

#[test]
fn audit_section_builds_configured_sink() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let log_path = dir.path().join("audit.log");
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let body = format!("[audit]\nsink = \"file\"\nlog_path = \"{}\"\n", log_path.display());
    file.write_all(body.as_bytes()).map_err(|err| err.to_string())?;
    let config = RowfenceConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    assert_eq!(config.audit.sink, AuditSinkKind::File);
    let _sink = config.audit.build_sink().map_err(|err| err.to_string())?;
    assert!(log_path.exists());
    Ok(())
}

#[test]
fn version_constant_is_populated() {
    assert!(!rowfence_config::VERSION.is_empty());
    assert!(rowfence_config::VERSION.split('.').count() >= 2);
}
