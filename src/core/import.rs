use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{UpsertOutcome, upsert_item};
use crate::errors::{AppError, AppResult};
use crate::models::NewItem;
use crate::ui::messages::warning;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns an import file must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "developers", "release_date", "steam_page_url"];

#[derive(Debug, Deserialize)]
struct ImportRow {
    name: String,
    developers: String,
    release_date: String,
    steam_page_url: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub batch: String,
    pub imported: usize,
    pub duplicates: usize,
    pub skipped: usize,
    /// CSV line numbers of the skipped rows.
    pub skipped_lines: Vec<u64>,
}

impl ImportReport {
    fn skip(&mut self, line: u64, reason: &str) {
        warning(format!("Skipping line {}: {}", line, reason));
        self.skipped += 1;
        self.skipped_lines.push(line);
    }
}

pub struct ImportLogic;

impl ImportLogic {
    pub fn import_file(pool: &mut DbPool, path: &Path, batch: &str) -> AppResult<ImportReport> {
        let file = File::open(path)?;
        let report = Self::import_reader(pool, file, batch)?;

        ttlog(
            &pool.conn,
            "import",
            batch,
            &format!(
                "{}: {} new, {} duplicate(s), {} skipped",
                path.display(),
                report.imported,
                report.duplicates,
                report.skipped
            ),
        )?;

        Ok(report)
    }

    /// Load CSV rows from `reader` into `batch`.
    ///
    /// A row with a missing field or a blank name/URL is skipped and
    /// counted; it never aborts the rest of the file. A header without the
    /// required columns rejects the whole input before anything is written.
    pub fn import_reader<R: Read>(
        pool: &mut DbPool,
        reader: R,
        batch: &str,
    ) -> AppResult<ImportReport> {
        let batch = batch.trim();
        if batch.is_empty() {
            return Err(AppError::Import("batch name cannot be empty".into()));
        }

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !headers.iter().any(|h| h == *c))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Import(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let mut report = ImportReport {
            batch: batch.to_string(),
            ..Default::default()
        };

        pool.immediate(|tx| {
            for result in rdr.records() {
                let record = match result {
                    Ok(record) => record,
                    Err(e) => {
                        let line = e.position().map(|p| p.line()).unwrap_or(0);
                        report.skip(line, &e.to_string());
                        continue;
                    }
                };

                let line = record.position().map(|p| p.line()).unwrap_or(0);
                let row: ImportRow = match record.deserialize(Some(&headers)) {
                    Ok(row) => row,
                    Err(e) => {
                        report.skip(line, &e.to_string());
                        continue;
                    }
                };

                if row.name.is_empty() || row.steam_page_url.is_empty() {
                    report.skip(line, "empty name or steam_page_url");
                    continue;
                }

                let item = NewItem::new(
                    &row.name,
                    &row.developers,
                    &row.release_date,
                    &row.steam_page_url,
                    batch,
                );

                match upsert_item(tx, &item)? {
                    UpsertOutcome::Inserted(_) => report.imported += 1,
                    UpsertOutcome::Existing(_) => report.duplicates += 1,
                }
            }
            Ok(())
        })?;

        Ok(report)
    }
}
