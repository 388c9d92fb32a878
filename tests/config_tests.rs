mod common;

use common::temp_dir;
use std::fs;
use steamvoter::config::Config;
use steamvoter::models::BrowserChoice;

#[test]
fn garbage_or_missing_config_falls_back_to_defaults() {
    let dir = temp_dir("config_garbage");
    let path = dir.join("steamvoter.conf");

    assert_eq!(Config::load_from(&path), Config::default());

    fs::write(&path, "database: [unclosed\n\t- ???").unwrap();
    assert_eq!(Config::load_from(&path), Config::default());
}

#[test]
fn saved_config_is_read_back_and_fills_missing_keys() {
    let dir = temp_dir("config_roundtrip");
    let path = dir.join("steamvoter.conf");

    let mut cfg = Config::default();
    assert!(cfg.remember(Some("/tmp/games.sqlite"), Some(BrowserChoice::Firefox)));
    assert!(!cfg.remember(Some("/tmp/games.sqlite"), None));
    cfg.save_to(&path).unwrap();

    let back = Config::load_from(&path);
    assert_eq!(back.database, "/tmp/games.sqlite");
    assert_eq!(back.browser, BrowserChoice::Firefox);

    fs::write(&path, "browser: console\nkeep_on_top: true\n").unwrap();
    let partial = Config::load_from(&path);
    assert_eq!(partial.browser, BrowserChoice::Console);
    assert!(partial.keep_on_top);
    assert_eq!(partial.export_dir, "data");
}
