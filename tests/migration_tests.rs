mod common;

use common::temp_dir;
use rusqlite::Connection;
use std::fs;
use steamvoter::db::initialize::{SCHEMA_VERSION, schema_version};
use steamvoter::db::log::count_operations;
use steamvoter::db::pool::DbPool;
use steamvoter::db::queries::{count_items, get_cursor, list_decisions, list_items};
use steamvoter::errors::AppError;

const LEGACY_SCHEMA: &str = r#"
    CREATE TABLE items (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        name         TEXT NOT NULL,
        developer    TEXT NOT NULL DEFAULT '',
        release_date TEXT NOT NULL DEFAULT '',
        source_url   TEXT NOT NULL UNIQUE
    );
    CREATE TABLE decisions (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        item_id INTEGER NOT NULL,
        user_id TEXT NOT NULL,
        value   INTEGER NOT NULL,
        UNIQUE (item_id, user_id)
    );
    CREATE TABLE progress (
        user_id       TEXT NOT NULL,
        batch_name    TEXT NOT NULL,
        current_index INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (user_id, batch_name)
    );
    INSERT INTO items (name, developer, release_date, source_url) VALUES
        ('Hollow Knight', 'Team Cherry', '2017', 'https://store.steampowered.com/app/367520'),
        ('Celeste', 'Maddy Makes Games', '2018', 'https://store.steampowered.com/app/504230');
    INSERT INTO decisions (item_id, user_id, value) VALUES (1, 'alice', 1), (2, 'alice', 0);
    INSERT INTO progress (user_id, batch_name, current_index) VALUES ('alice', 'legacy', 2);
"#;

fn legacy_store(name: &str) -> (String, std::path::PathBuf) {
    let dir = temp_dir(name);
    let path = dir.join("steamvoter.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(LEGACY_SCHEMA).unwrap();
    drop(conn);
    (path.to_string_lossy().to_string(), dir)
}

#[test]
fn legacy_store_is_upgraded_without_losing_rows() {
    let (path, dir) = legacy_store("migration_upgrade");

    let pool = DbPool::open(&path).unwrap();

    let items = list_items(&pool.conn, "legacy").unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Hollow Knight");

    let votes = list_decisions(&pool.conn, "alice").unwrap();
    assert_eq!(votes.len(), 2);
    assert!(votes.iter().all(|d| !d.exported && !d.recorded_at.is_empty()));
    assert_eq!(get_cursor(&pool.conn, "alice", "legacy").unwrap(), 2);

    assert_eq!(schema_version(&pool.conn).unwrap(), SCHEMA_VERSION);
    let applied = count_operations(&pool.conn, "migration_applied", None).unwrap();
    assert!(applied >= 3);

    let backups = fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .ends_with("-steamvoter-pre-migration.zip")
        })
        .count();
    assert_eq!(backups, 1);
    drop(pool);

    // second open: nothing left to apply
    let pool = DbPool::open(&path).unwrap();
    assert_eq!(
        count_operations(&pool.conn, "migration_applied", None).unwrap(),
        applied
    );
    assert_eq!(count_items(&pool.conn, "legacy").unwrap(), 2);
}

#[test]
fn upgraded_store_accepts_the_same_url_in_a_new_batch() {
    let (path, _dir) = legacy_store("migration_batch_scope");
    let mut pool = DbPool::open(&path).unwrap();

    let report = steamvoter::core::import::ImportLogic::import_reader(
        &mut pool,
        "name,developers,release_date,steam_page_url\nCeleste,,,https://store.steampowered.com/app/504230\n"
            .as_bytes(),
        "platformers",
    )
    .unwrap();
    assert_eq!(report.imported, 1);
}

#[test]
fn failed_migration_refuses_to_open_the_store() {
    let dir = temp_dir("migration_failure");
    let path = dir.join("steamvoter.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE decisions (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id  INTEGER NOT NULL,
            user_id  TEXT NOT NULL,
            value    INTEGER NOT NULL,
            exported INTEGER NOT NULL DEFAULT 0
        );
        INSERT INTO decisions (item_id, user_id, value) VALUES (1, 'bob', 1), (1, 'bob', 0);
        "#,
    )
    .unwrap();
    drop(conn);

    let err = DbPool::open(&path.to_string_lossy()).err().unwrap();
    assert!(matches!(err, AppError::StoreOpen { .. }));
    assert!(err.to_string().contains("decisions"));

    let conn = Connection::open(&path).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM decisions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 2);
}
