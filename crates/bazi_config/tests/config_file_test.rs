//! Loading engine configuration from files on disk.

use std::io::Write;

use bazi_config::{ConfigError, EngineConfig};

#[test]
fn loads_overrides_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[luck]\ncycle_count = 10\n\n[stability]\nchaos_stable = 0.15\n"
    )
    .unwrap();

    let config = EngineConfig::from_path(file.path()).unwrap();
    assert_eq!(config.luck.cycle_count, 10);
    assert_eq!(config.luck.span_years, 10);
    assert!((config.stability.chaos_stable - 0.15).abs() < 1e-12);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::from_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn malformed_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[window\ngolden = ").unwrap();
    let err = EngineConfig::from_path(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn written_defaults_reload_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.toml");
    std::fs::write(&path, EngineConfig::default().to_toml_string().unwrap()).unwrap();
    assert_eq!(EngineConfig::from_path(&path).unwrap(), EngineConfig::default());
}

#[test]
fn invalid_window_levels_rejected_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[window]\ngood = 2.0\n").unwrap();
    assert!(matches!(
        EngineConfig::from_path(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}
