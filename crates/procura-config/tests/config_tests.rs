use procura_config::{Config, ConfigError, ConfigManager, NumberStyle};
use tempfile::tempdir;

#[test]
fn default_config_is_valid() {
    let cfg = Config::default();

    assert_eq!(cfg.base_currency, "EUSD");
    assert_eq!(cfg.stock_alerts.critical_ratio, 0.5);
    assert!(!cfg.flow.strict_references);
    cfg.validate().expect("defaults validate");
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("procura")).expect("manager");

    let loaded = manager.load().expect("load defaults");
    assert_eq!(loaded, Config::default());
    assert!(!manager.config_path().exists());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.locale = "my-MM".to_string();
    cfg.stock_alerts.critical_ratio = 0.25;
    cfg.flow.strict_references = true;

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.severity_thresholds().critical_ratio, 0.25);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "locale": "th-TH", "flow": { "strict_references": true } }"#)
        .expect("write config");

    let loaded = ConfigManager::new(path).load().expect("load config");
    assert_eq!(loaded.locale, "th-TH");
    assert!(loaded.flow.strict_references);
    assert_eq!(loaded.base_currency, "EUSD");
    assert_eq!(loaded.stock_alerts.critical_ratio, 0.5);
}

#[test]
fn invalid_ratio_is_rejected_on_save_and_load() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    let manager = ConfigManager::new(path.clone());

    let mut cfg = Config::default();
    cfg.stock_alerts.critical_ratio = 1.5;
    let err = manager.save(&cfg).expect_err("ratio above one");
    assert!(matches!(err, ConfigError::Invalid(_)));

    std::fs::write(&path, r#"{ "locale": "en-US", "stock_alerts": { "critical_ratio": 0.0 } }"#)
        .expect("write config");
    let err = manager.load().expect_err("zero ratio");
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").expect("write config");

    let err = ConfigManager::new(path).load().expect_err("malformed");
    assert!(matches!(err, ConfigError::Serde(_)));
}

#[test]
fn file_without_locale_uses_default_locale() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "flow": { "strict_references": true } }"#).expect("write config");

    let loaded = ConfigManager::new(path).load().expect("load config");
    assert_eq!(loaded.locale, "en-US");
    assert!(loaded.flow.strict_references);
}

#[test]
fn locale_selects_number_separators() {
    let mut cfg = Config::default();
    assert_eq!(cfg.number_style(), NumberStyle::new('.', ','));

    cfg.locale = "de-DE".to_string();
    assert_eq!(cfg.number_style(), NumberStyle::new(',', '.'));

    cfg.locale = "fr_FR".to_string();
    assert_eq!(cfg.number_style(), NumberStyle::new(',', ' '));
}

#[test]
fn malformed_locale_is_rejected() {
    let mut cfg = Config::default();
    for locale in ["", "1-US", "e"] {
        cfg.locale = locale.to_string();
        let err = cfg.validate().expect_err("bad locale");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
