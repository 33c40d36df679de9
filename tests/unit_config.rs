use std::fs;

use rplan::config::{Config, CONFIG_FILE};
use rplan::lock::DEFAULT_LOCK_TIMEOUT_MS;

#[test]
fn config_defaults_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::load_from_dir(dir.path());

    assert_eq!(config.store, "rplan.json");
    assert_eq!(config.locking.timeout_ms, DEFAULT_LOCK_TIMEOUT_MS);
    assert!(config.plan.show_empty_members);
    assert_eq!(config.store_path(dir.path()), dir.path().join("rplan.json"));
}

#[test]
fn config_overrides_from_toml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let toml = r#"
store = "data/team.json"

[locking]
timeout_ms = 250

[plan]
show_empty_members = false
"#;
    fs::write(dir.path().join(CONFIG_FILE), toml)?;

    let config = Config::load_from_dir(dir.path());
    assert_eq!(config.store, "data/team.json");
    assert_eq!(config.locking.timeout_ms, 250);
    assert!(!config.plan.show_empty_members);
    assert_eq!(
        config.store_path(dir.path()),
        dir.path().join("data").join("team.json")
    );
    Ok(())
}

#[test]
fn invalid_config_falls_back_to_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "[locking]\ntimeout_ms = 0\n")?;

    assert!(Config::load(&path).is_err());
    let config = Config::load_from_dir(dir.path());
    assert_eq!(config.locking.timeout_ms, DEFAULT_LOCK_TIMEOUT_MS);
    Ok(())
}

#[test]
fn config_save_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(CONFIG_FILE);
    let mut config = Config::default();
    config.store = "records.json".to_string();
    config.save(&path)?;

    let loaded = Config::load(&path)?;
    assert_eq!(loaded.store, "records.json");
    Ok(())
}
