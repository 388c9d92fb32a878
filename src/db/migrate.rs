use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension, params};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Current shape of one table: its DDL, indexes and the columns later
/// releases added to it.
struct TableSpec {
    name: &'static str,
    /// `CREATE TABLE` body; `{table}` is replaced with the target name.
    create: &'static str,
    indexes: &'static str,
    columns: &'static [&'static str],
    /// Columns that were added after the first release, in order.
    added: &'static [AddedColumn],
}

struct AddedColumn {
    name: &'static str,
    /// `ALTER TABLE .. ADD COLUMN` definition. `None` when the column changes a
    /// table constraint and can only arrive through a rebuild.
    alter: Option<&'static str>,
    /// Value for existing rows when the column is filled by a rebuild and has
    /// no usable default.
    fill: Option<&'static str>,
    version: &'static str,
}

const ITEMS: TableSpec = TableSpec {
    name: "items",
    create: r#"
        CREATE TABLE {table} (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            developer    TEXT NOT NULL DEFAULT '',
            release_date TEXT NOT NULL DEFAULT '',
            source_url   TEXT NOT NULL,
            batch_name   TEXT NOT NULL,
            created_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (source_url, batch_name)
        );
    "#,
    indexes: "CREATE INDEX IF NOT EXISTS idx_items_batch ON items(batch_name, id);",
    columns: &[
        "id",
        "name",
        "developer",
        "release_date",
        "source_url",
        "batch_name",
        "created_at",
    ],
    added: &[
        AddedColumn {
            name: "batch_name",
            alter: None,
            fill: Some("'legacy'"),
            version: "20240310_0002_items_batch_scope",
        },
        AddedColumn {
            name: "created_at",
            alter: Some("created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP"),
            fill: None,
            version: "20240522_0004_items_created_at",
        },
    ],
};

const DECISIONS: TableSpec = TableSpec {
    name: "decisions",
    create: r#"
        CREATE TABLE {table} (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id     INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
            user_id     TEXT NOT NULL,
            value       INTEGER NOT NULL CHECK (value IN (0, 1)),
            recorded_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            exported    INTEGER NOT NULL DEFAULT 0,
            UNIQUE (item_id, user_id)
        );
    "#,
    indexes: r#"
        CREATE INDEX IF NOT EXISTS idx_decisions_user_export ON decisions(user_id, exported, value);
        CREATE INDEX IF NOT EXISTS idx_decisions_item ON decisions(item_id);
    "#,
    columns: &["id", "item_id", "user_id", "value", "recorded_at", "exported"],
    added: &[
        AddedColumn {
            name: "exported",
            alter: Some("exported INTEGER NOT NULL DEFAULT 0"),
            fill: None,
            version: "20240415_0003_decisions_exported_flag",
        },
        AddedColumn {
            name: "recorded_at",
            alter: Some("recorded_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP"),
            fill: None,
            version: "20240522_0005_decisions_recorded_at",
        },
    ],
};

const PROGRESS: TableSpec = TableSpec {
    name: "progress",
    create: r#"
        CREATE TABLE {table} (
            user_id       TEXT NOT NULL,
            batch_name    TEXT NOT NULL,
            current_index INTEGER NOT NULL DEFAULT 0,
            updated_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (user_id, batch_name)
        );
    "#,
    indexes: "",
    columns: &["user_id", "batch_name", "current_index", "updated_at"],
    added: &[AddedColumn {
        name: "updated_at",
        alter: Some("updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP"),
        fill: None,
        version: "20240522_0006_progress_updated_at",
    }],
};

/// Parents first: `decisions` references `items`.
const TABLES: [&TableSpec; 3] = [&ITEMS, &DECISIONS, &PROGRESS];

fn table_exists(conn: &Connection, table: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn table_columns(conn: &Connection, table: &str) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    let mut out = Vec::new();
    for c in cols {
        out.push(c?);
    }
    Ok(out)
}

fn has_column(conn: &Connection, table: &str, column: &str) -> AppResult<bool> {
    Ok(table_columns(conn, table)?.iter().any(|c| c == column))
}

fn create_table(conn: &Connection, spec: &TableSpec) -> AppResult<()> {
    conn.execute_batch(&spec.create.replace("{table}", spec.name))?;
    conn.execute_batch(spec.indexes)?;
    Ok(())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![version, message],
    )?;
    Ok(())
}

/// Rebuild `spec.name` with the current schema: create-copy-drop-rename.
///
/// Columns shared by the old and the new table are copied; added columns use
/// their `fill` expression or the new table's default. Runs in one
/// transaction, so on failure the old table is left untouched.
fn rebuild_table(conn: &Connection, spec: &TableSpec) -> AppResult<()> {
    let old_cols = table_columns(conn, spec.name)?;
    let tmp = format!("{}_new", spec.name);

    let mut targets = Vec::new();
    let mut sources = Vec::new();
    for col in spec.columns {
        if old_cols.iter().any(|c| c == col) {
            targets.push(col.to_string());
            sources.push(col.to_string());
        } else if let Some(fill) = spec
            .added
            .iter()
            .find(|a| a.name == *col)
            .and_then(|a| a.fill)
        {
            targets.push(col.to_string());
            sources.push(fill.to_string());
        }
    }

    // foreign_keys cannot be toggled inside a transaction, and DROP TABLE
    // on `items` would otherwise cascade into `decisions`.
    conn.execute_batch("PRAGMA foreign_keys=OFF;")?;

    let result = (|| -> AppResult<()> {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {tmp};"))?;
        tx.execute_batch(&spec.create.replace("{table}", &tmp))?;
        tx.execute(
            &format!(
                "INSERT INTO {tmp} ({}) SELECT {} FROM {}",
                targets.join(", "),
                sources.join(", "),
                spec.name
            ),
            [],
        )?;
        tx.execute_batch(&format!(
            "DROP TABLE {old}; ALTER TABLE {tmp} RENAME TO {old};",
            old = spec.name
        ))?;
        tx.execute_batch(spec.indexes)?;
        tx.commit()?;
        Ok(())
    })();

    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    result.map_err(|e| {
        AppError::Migration(format!(
            "rebuilding table '{}' failed, schema left unchanged: {}",
            spec.name, e
        ))
    })
}

/// Bring an existing table up to date, one added column at a time.
fn upgrade_table(conn: &Connection, spec: &TableSpec) -> AppResult<()> {
    for added in spec.added {
        if has_column(conn, spec.name, added.name)? {
            continue;
        }

        warning(format!(
            "Adding '{}' column to {} table...",
            added.name, spec.name
        ));

        let altered = match added.alter {
            Some(def) => {
                match conn.execute_batch(&format!("ALTER TABLE {} ADD COLUMN {};", spec.name, def)) {
                    Ok(()) => true,
                    Err(e) => {
                        warning(format!(
                            "In-place column add refused ({}), rebuilding {} table...",
                            e, spec.name
                        ));
                        false
                    }
                }
            }
            None => false,
        };

        if !altered {
            rebuild_table(conn, spec)?;
        }

        mark_applied(
            conn,
            added.version,
            &format!("Added {} to {}", added.name, spec.name),
        )?;
        success(format!(
            "Migration applied: {} → added '{}' to {} table",
            added.version, added.name, spec.name
        ));
    }

    Ok(())
}

/// Tables that exist but predate the current schema.
fn legacy_tables(conn: &Connection) -> AppResult<Vec<&'static str>> {
    let mut out = Vec::new();
    for spec in TABLES {
        if !table_exists(conn, spec.name)? {
            continue;
        }
        let cols = table_columns(conn, spec.name)?;
        if spec.added.iter().any(|a| !cols.iter().any(|c| c == a.name)) {
            out.push(spec.name);
        }
    }
    Ok(out)
}

fn backup_before_migration(db_path: &str) -> AppResult<()> {
    use crate::utils::time::file_stamp;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let src = Path::new(db_path);
    let backup_name = format!("{}-steamvoter-pre-migration.zip", file_stamp());
    let backup_path = match src.parent() {
        Some(dir) => dir.join(&backup_name),
        None => backup_name.into(),
    };

    let file = File::create(&backup_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("steamvoter.sqlite", options)
        .map_err(|e| AppError::Migration(format!("Backup failed (start_file): {}", e)))?;

    let db_content = fs::read(src)?;
    zip.write_all(&db_content)?;

    zip.finish()
        .map_err(|e| AppError::Migration(format!("Backup failed (finish): {}", e)))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Safe on every startup: a store already on the current schema only gets
/// `CREATE ... IF NOT EXISTS` no-ops.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Detect legacy schema and back it up once before touching it
    let legacy = legacy_tables(conn)?;
    if !legacy.is_empty() {
        warning(format!(
            "Legacy schema detected ({}), creating safety backup before migration...",
            legacy.join(", ")
        ));

        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if db_path.is_empty() {
            warning("Could not determine DB path, backup skipped.");
        } else {
            backup_before_migration(&db_path)?;
        }
    }

    // 3) Create or upgrade every table
    for spec in TABLES {
        if table_exists(conn, spec.name)? {
            upgrade_table(conn, spec)?;
            conn.execute_batch(spec.indexes)?;
        } else {
            create_table(conn, spec)?;
        }
    }

    Ok(())
}
