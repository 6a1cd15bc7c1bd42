use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::data::{format_timestamp, parse_timestamp, Entry, Label, Labeling, ScanReport, Stats};
use super::scan;
use crate::error::Result;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS images (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        path        TEXT NOT NULL UNIQUE,
        filename    TEXT NOT NULL,
        label       TEXT CHECK (label IN ('OK', 'NG')),
        labeled_at  TEXT,
        CHECK ((label IS NULL) = (labeled_at IS NULL))
    );

    CREATE INDEX IF NOT EXISTS idx_images_label ON images(label);
";

const ENTRY_COLUMNS: &str = "id, path, filename, label, labeled_at";

/// The Catalog manages the SQLite database of images and their labels.
///
/// Every call runs as its own unit of work; nothing is cached between
/// calls, so reads always reflect the current store state.
pub struct Catalog {
    conn: Connection,
    db_path: PathBuf,
}

impl Catalog {
    /// Open (or create) the catalog database at `db_path` and make sure
    /// the schema exists.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let catalog = Catalog { conn, db_path };
        catalog.initialize()?;

        info!("Catalog opened at {}", catalog.db_path.display());
        Ok(catalog)
    }

    /// Private catalog living only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let catalog = Catalog {
            conn,
            db_path: PathBuf::from(":memory:"),
        };
        catalog.initialize()?;
        Ok(catalog)
    }

    /// Create the images table and its label index if they don't exist.
    /// Safe to call any number of times.
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Scan `directory` and register its images. Returns the number of
    /// allow-listed files considered, counting paths already present.
    pub fn ingest(&self, directory: impl AsRef<Path>) -> Result<usize> {
        Ok(self.ingest_with_report(directory)?.considered)
    }

    /// Scan `directory` and register its images, reporting how many rows
    /// were new and how many files had to be skipped.
    ///
    /// All inserts of one scan commit together. A file whose insert fails
    /// is skipped without aborting the rest of the batch.
    pub fn ingest_with_report(&self, directory: impl AsRef<Path>) -> Result<ScanReport> {
        let directory = directory.as_ref();
        let listing = scan::list_images(directory)?;

        let mut report = ScanReport {
            skipped: listing.unreadable,
            ..ScanReport::default()
        };

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut insert =
                tx.prepare("INSERT OR IGNORE INTO images (path, filename) VALUES (?1, ?2)")?;

            for file in &listing.images {
                match insert.execute(params![file.path_str(), file.filename]) {
                    Ok(inserted) => {
                        report.considered += 1;
                        report.added += inserted;
                    }
                    Err(err) => {
                        warn!("Error importing {}: {}", file.filename, err);
                        report.skipped += 1;
                    }
                }
            }
        }
        tx.commit()?;

        info!(
            "Scanned {}: {} images ({} new, {} skipped)",
            directory.display(),
            report.considered,
            report.added,
            report.skipped
        );
        Ok(report)
    }

    /// All entries ordered by id
    pub fn list_all(&self) -> Result<Vec<Entry>> {
        self.query_entries(&format!("SELECT {ENTRY_COLUMNS} FROM images ORDER BY id"))
    }

    /// Entries without a label, ordered by id
    pub fn list_unlabeled(&self) -> Result<Vec<Entry>> {
        self.query_entries(&format!(
            "SELECT {ENTRY_COLUMNS} FROM images WHERE label IS NULL ORDER BY id"
        ))
    }

    pub fn count_unlabeled(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM images WHERE label IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Look up a single entry; `None` when no entry has this id
    pub fn get(&self, id: i64) -> Result<Option<Entry>> {
        let entry = self
            .conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM images WHERE id = ?1"),
                [id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Path of the file behind an entry, for adapters serving image content
    pub fn image_path(&self, id: i64) -> Result<Option<PathBuf>> {
        Ok(self.get(id)?.map(|entry| PathBuf::from(entry.path)))
    }

    /// Label an image from its textual form ("OK" or "NG").
    ///
    /// Any other value is rejected before the store is touched. Returns
    /// `false` when no entry has this id.
    pub fn set_label(&self, id: i64, label: &str) -> Result<bool> {
        let label: Label = label.parse()?;
        self.assign_label(id, label)
    }

    /// Label an image, replacing any earlier label and its timestamp.
    pub fn assign_label(&self, id: i64, label: Label) -> Result<bool> {
        let labeled_at = format_timestamp(Utc::now());
        let changed = self.conn.execute(
            "UPDATE images SET label = ?1, labeled_at = ?2 WHERE id = ?3",
            params![label, labeled_at, id],
        )?;

        debug!("Label {} -> image {} ({} row(s))", label, id, changed);
        Ok(changed > 0)
    }

    /// Labeling statistics, counted from the table on every call
    pub fn stats(&self) -> Result<Stats> {
        let (total, ok, ng): (i64, i64, i64) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(label = 'OK'), 0),
                    COALESCE(SUM(label = 'NG'), 0)
             FROM images",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(Stats::from_counts(total as u64, ok as u64, ng as u64))
    }

    /// Remove every entry from the catalog. Irreversible.
    pub fn clear_all(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM images", [])?;
        tx.commit()?;

        info!("Cleared catalog ({} images removed)", removed);
        Ok(())
    }

    fn query_entries(&self, sql: &str) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

/// Map a row selected with `ENTRY_COLUMNS` to an `Entry`, refusing rows
/// where the label and its timestamp disagree.
fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let label: Option<Label> = row.get(3)?;
    let labeled_at: Option<String> = row.get(4)?;

    let labeling = match (label, labeled_at) {
        (Some(label), Some(at)) => {
            let at = parse_timestamp(&at)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
            Some(Labeling { label, at })
        }
        (None, None) => None,
        _ => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                "label and labeled_at must be set together".into(),
            ))
        }
    };

    Ok(Entry {
        id: row.get(0)?,
        path: row.get(1)?,
        filename: row.get(2)?,
        labeling,
    })
}

// Implement Debug for better error messages
impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("db_path", &self.db_path)
            .finish()
    }
}
