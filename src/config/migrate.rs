//! Upgrades an existing YAML config file in place: keys added by newer
//! releases are filled with their default value, unknown keys are kept,
//! and the legacy `last_db` / `browser_choice` keys are renamed.

use super::Config;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io;
use std::path::Path;

/// Keys every current config file is expected to carry.
pub const EXPECTED_KEYS: [&str; 5] = ["database", "browser", "keep_on_top", "user", "export_dir"];

/// Keys written by releases that only remembered a database and a browser.
const RENAMED_KEYS: [(&str, &str); 2] = [("last_db", "database"), ("browser_choice", "browser")];

fn read_mapping(path: &Path) -> io::Result<Mapping> {
    let content = fs::read_to_string(path)?;
    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(io::Error::other(format!(
            "Configuration {:?} is not a YAML mapping",
            path
        ))),
        Err(e) => Err(io::Error::other(format!(
            "Failed to parse configuration {:?}: {}",
            path, e
        ))),
    }
}

/// List the expected keys missing from the file at `path`.
pub fn missing_keys(path: &Path) -> io::Result<Vec<&'static str>> {
    let map = read_mapping(path)?;
    Ok(EXPECTED_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(Value::String(k.to_string())))
        .collect())
}

/// Rewrite the file at `path` so it carries every expected key.
/// Returns the list of actions performed (empty → file untouched).
pub fn migrate_config_file(path: &Path) -> io::Result<Vec<String>> {
    let mut map = read_mapping(path)?;
    let mut actions = Vec::new();

    for (old, new) in RENAMED_KEYS {
        let old_key = Value::String(old.to_string());
        let new_key = Value::String(new.to_string());

        if let Some(v) = map.remove(&old_key) {
            if !map.contains_key(&new_key) {
                map.insert(new_key, normalize_legacy_value(new, v));
            }
            actions.push(format!("renamed '{}' to '{}'", old, new));
        }
    }

    let defaults = serde_yaml::to_value(Config::default()).map_err(io::Error::other)?;
    if let Value::Mapping(default_map) = defaults {
        for key in EXPECTED_KEYS {
            let k = Value::String(key.to_string());
            if !map.contains_key(&k)
                && let Some(v) = default_map.get(&k)
            {
                map.insert(k, v.clone());
                actions.push(format!("added '{}'", key));
            }
        }
    }

    if !actions.is_empty() {
        let serialized = serde_yaml::to_string(&Value::Mapping(map))
            .map_err(|e| io::Error::other(format!("serialize error: {}", e)))?;
        fs::write(path, serialized)?;
    }

    Ok(actions)
}

/// Older files stored the browser capitalized ("Chrome").
fn normalize_legacy_value(key: &str, v: Value) -> Value {
    match (key, v) {
        ("browser", Value::String(s)) => Value::String(s.to_lowercase()),
        (_, other) => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_conf(name: &str, content: &str) -> std::path::PathBuf {
        let path = env::temp_dir().join(format!("{}_steamvoter.conf", name));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn fills_missing_keys_and_keeps_existing_values() {
        let path = temp_conf("cfg_fill", "database: /tmp/x.sqlite\n");

        assert_eq!(
            missing_keys(&path).unwrap(),
            vec!["browser", "keep_on_top", "user", "export_dir"]
        );

        let actions = migrate_config_file(&path).unwrap();
        assert_eq!(actions.len(), 4);
        assert!(missing_keys(&path).unwrap().is_empty());

        let cfg = Config::load_from(&path);
        assert_eq!(cfg.database, "/tmp/x.sqlite");

        // Second run is a no-op.
        assert!(migrate_config_file(&path).unwrap().is_empty());
    }

    #[test]
    fn renames_legacy_keys() {
        let path = temp_conf("cfg_legacy", "last_db: /tmp/old.sqlite\nbrowser_choice: Firefox\n");

        let actions = migrate_config_file(&path).unwrap();
        assert!(actions.iter().any(|a| a.contains("last_db")));

        let cfg = Config::load_from(&path);
        assert_eq!(cfg.database, "/tmp/old.sqlite");
        assert_eq!(cfg.browser, crate::models::BrowserChoice::Firefox);
    }
}
