//! Configuration layering: defaults, TOML file, environment, CLI flags.

use assetdedupe::actions::DeletionGate;
use assetdedupe::cli::Cli;
use assetdedupe::config::Config;
use assetdedupe::rename::ConflictPolicy;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all ASSETDEDUPE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("ASSETDEDUPE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    let config = Config::load_from_path(dir.path().join("nonexistent.toml"));

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
supported_extensions = ["jpg", "webp"]
markers = ["_ssl=1", "-scaled"]
uploads_subdir = "media"
safe_zones = ["media"]
gated = true
conflict_policy = "overwrite"
trash = true
"#,
    )
    .unwrap();

    let config = Config::load_from_path(path);

    assert_eq!(config.supported_extensions, vec!["jpg", "webp"]);
    assert_eq!(config.markers, vec!["_ssl=1", "-scaled"]);
    assert_eq!(config.uploads_subdir, PathBuf::from("media"));
    assert!(config.gated);
    assert!(config.trash);
    assert_eq!(config.conflict_policy, ConflictPolicy::Overwrite);
    assert!(config.gate(Path::new("/site")).can_delete(Path::new("/site/media/a.jpg")));
}

#[test]
fn test_config_short_policy_names() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "conflict_policy = \"ask\"").unwrap();

    assert_eq!(
        Config::load_from_path(path).conflict_policy,
        ConflictPolicy::AskEachTime
    );
}

#[test]
fn test_invalid_file_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "gated = \"definitely\"\n[[[").unwrap();

    let config = Config::load_from_path(path);

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_hierarchy_file_env_cli() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    // 1. Config file overrides defaults
    fs::write(&path, "conflict_policy = \"overwrite\"\ntrash = false\n").unwrap();

    // 2. Environment variables override config file
    std::env::set_var("ASSETDEDUPE_TRASH", "true");
    std::env::set_var("ASSETDEDUPE_CONFLICT_POLICY", "ask_each_time");

    let mut config = Config::load_from_path(path);
    assert!(config.trash);
    assert_eq!(config.conflict_policy, ConflictPolicy::AskEachTime);

    // 3. CLI flags override environment variables
    let cli = Cli::try_parse_from([
        "assetdedupe",
        "clean",
        "/site",
        "--conflict",
        "1",
        "--safe-zone",
        "images",
    ])
    .unwrap();
    config.merge_cli(&cli);

    assert_eq!(config.conflict_policy, ConflictPolicy::DeleteLosingFile);
    assert!(config.gated);
    assert_eq!(config.safe_zones, vec![PathBuf::from("images")]);

    clear_env();
}

#[test]
fn test_cli_without_flags_keeps_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let mut config = Config {
        gated: true,
        conflict_policy: ConflictPolicy::Overwrite,
        ..Config::default()
    };

    let cli = Cli::try_parse_from(["assetdedupe", "clean", "/site"]).unwrap();
    config.merge_cli(&cli);

    assert!(config.gated);
    assert_eq!(config.conflict_policy, ConflictPolicy::Overwrite);
    assert!(matches!(config.gate(Path::new("/site")), DeletionGate::Gated(_)));
}
