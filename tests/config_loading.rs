//! `LauncherConfig::load` lookup order and the environment override

use std::time::Duration;

use flowser_launcher::config::{API_URL_ENV, default_config_path};
use flowser_launcher::{LauncherConfig, LauncherError};
use pretty_assertions::assert_eq;

#[test]
fn explicit_path_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(
        &path,
        "install_root = \"/opt/apps\"\nconnect_timeout_secs = 7\ninactivity_timeout_secs = 9\n",
    )
    .unwrap();

    let config = LauncherConfig::load(Some(&path)).unwrap();

    assert_eq!(config.install_root, Some("/opt/apps".into()));
    assert_eq!(config.connect_timeout(), Duration::from_secs(7));
    assert_eq!(config.inactivity_timeout(), Duration::from_secs(9));
    assert_eq!(config.app_name, "Flowser");
}

#[test]
fn explicit_path_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    match LauncherConfig::load(Some(&missing)) {
        Err(LauncherError::Config { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn explicit_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "connect_timeout_secs = 0\n").unwrap();

    let err = LauncherConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, LauncherError::Config { .. }), "got {err:?}");
}

// The only test here that reads or writes process environment, so parallel
// test threads never observe each other's variables.
#[test]
fn default_location_and_env_override() {
    let home = tempfile::tempdir().unwrap();
    // SAFETY: no other test in this binary touches the environment.
    unsafe {
        std::env::set_var(API_URL_ENV, "http://127.0.0.1:9");
        if cfg!(target_os = "linux") {
            std::env::set_var("XDG_CONFIG_HOME", home.path());
        }
    }

    if cfg!(target_os = "linux") {
        let default_path = default_config_path().unwrap();
        assert!(default_path.starts_with(home.path()));
        std::fs::create_dir_all(default_path.parent().unwrap()).unwrap();
        std::fs::write(&default_path, "app_name = \"FlowserDev\"\n").unwrap();

        let config = LauncherConfig::load(None).unwrap();
        assert_eq!(config.app_name, "FlowserDev");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9");

        std::fs::remove_file(&default_path).unwrap();
        let config = LauncherConfig::load(None).unwrap();
        assert_eq!(config.app_name, "Flowser");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9");
    }

    // An explicit file still gets the override
    let explicit = home.path().join("explicit.toml");
    std::fs::write(&explicit, "api_base_url = \"https://mirror.invalid\"\n").unwrap();
    let config = LauncherConfig::load(Some(&explicit)).unwrap();
    assert_eq!(config.api_base_url, "http://127.0.0.1:9");

    unsafe {
        std::env::remove_var(API_URL_ENV);
    }
    let config = LauncherConfig::load(Some(&explicit)).unwrap();
    assert_eq!(config.api_base_url, "https://mirror.invalid");
}
