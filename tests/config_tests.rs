use std::fs;

use neighborly::config::{Config, CONFIG_FILE};

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(dir.path());
    assert_eq!(config, Config::default());
    assert_eq!(config.sweep_period_ms(), 300_000);
    assert_eq!(config.flush_period_ms(), 30_000);
    assert_eq!(config.leaderboard_limit, 10);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE),
        "leaderboard_limit = 3\nneighborhoods = [\"Elm Street\", \"Oak Lane\"]\n",
    )
    .unwrap();
    let config = Config::load(dir.path());
    assert_eq!(config.leaderboard_limit, 3);
    assert_eq!(config.neighborhoods, vec!["Elm Street", "Oak Lane"]);
    assert_eq!(config.default_helper, "Helper");
}

#[test]
fn test_malformed_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "leaderboard_limit = \"lots\"").unwrap();
    assert!(Config::from_file(&path).is_err());
    assert_eq!(Config::load(dir.path()), Config::default());
}
