#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use steamvoter::db::pool::DbPool;
use steamvoter::export::{ExportFormat, ExportTarget};

pub const INDIE_CSV: &str = "\
name,developers,release_date,steam_page_url
Hollow Knight,Team Cherry,\"24 Feb, 2017\",https://store.steampowered.com/app/367520
Celeste,Maddy Makes Games,\"25 Jan, 2018\",https://store.steampowered.com/app/504230
Hades,Supergiant Games,\"17 Sep, 2020\",https://store.steampowered.com/app/1145360
";

pub const RETRO_CSV: &str = "\
name,developers,release_date,steam_page_url
Shovel Knight,Yacht Club Games,\"26 Jun, 2014\",https://store.steampowered.com/app/250760
Stardew Valley,ConcernedApe,\"26 Feb, 2016\",https://store.steampowered.com/app/413150
";

/// Binary under test, with HOME pointing at a private directory so the
/// user's real configuration is never read or written.
pub fn svt(name: &str) -> Command {
    let home = temp_dir(&format!("{name}_home"));
    let mut cmd = cargo_bin_cmd!("steamvoter");
    cmd.env("HOME", &home).env("APPDATA", &home);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_steamvoter.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_file(format!("{db_path}-wal")).ok();
    fs::remove_file(format!("{db_path}-shm")).ok();
    db_path
}

/// Fresh, empty directory inside the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("steamvoter_{}", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

/// Write `content` to `<tempdir>/<file>` and return its path.
pub fn write_csv(dir: &Path, file: &str, content: &str) -> String {
    let path = dir.join(file);
    fs::write(&path, content).expect("write csv");
    path.to_string_lossy().to_string()
}

pub fn memory_store() -> DbPool {
    DbPool::in_memory().expect("in-memory store")
}

pub fn csv_target(name: &str) -> ExportTarget {
    ExportTarget::new(temp_dir(name), ExportFormat::Csv)
}

/// Values of the `name` column of an exported CSV, in file order.
pub fn exported_names(path: &Path) -> Vec<String> {
    let mut rdr = csv::Reader::from_path(path).expect("open export");
    rdr.records()
        .map(|r| r.expect("record")[0].to_string())
        .collect()
}
