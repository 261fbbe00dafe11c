use hammerqr::config::Config;
use std::fs;

#[test]
fn save_and_load_yaml_roundtrip() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("config.yaml");

    let mut cfg = Config::default();
    cfg.qr.max_config_values = 12;
    cfg.ui.persist_state = true;
    cfg.persistence.file = tmp_dir.path().join("cache.json").to_string_lossy().to_string();
    cfg.logging.file = path.with_extension("log").to_string_lossy().to_string();

    cfg.save_to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();

    assert_eq!(loaded.qr.max_config_values, 12);
    assert!(loaded.ui.persist_state);
    assert_eq!(loaded.persistence.file, cfg.persistence.file);
    assert_eq!(loaded.logging.file, cfg.logging.file);
}

#[test]
fn partial_yaml_keeps_defaults() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), b"ui:\n  show_config_keys: true\n").unwrap();
    let cfg = Config::from_file(tmp.path()).unwrap();

    assert!(cfg.ui.show_config_keys);
    assert_eq!(cfg.ui.time_sync_update_interval_ms, 1000);
    assert_eq!(cfg.qr.max_config_values, 16);
    assert_eq!(cfg.web.port, 8090);
}

#[test]
fn config_validation_errors() {
    let mut cfg = Config::default();
    assert!(cfg.validate().is_ok());

    cfg.qr.max_config_values = 0;
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.ui.time_sync_update_interval_ms = 0;
    assert!(cfg.validate().is_err());

    // Cache enabled without a file
    cfg = Config::default();
    cfg.ui.persist_state = true;
    cfg.persistence.file = "  ".to_string();
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.web.port = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn from_file_with_invalid_yaml_fails() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), b"bad: [unclosed").unwrap();
    let err = Config::from_file(tmp.path()).unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("Serialization error"));
}
