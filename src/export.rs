/// Flat report of the catalog for download/export
///
/// One row per entry, in catalog order. Unlabeled entries export an
/// empty label and timestamp.
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::state::catalog::Catalog;
use crate::state::data::{format_timestamp, Entry};

pub const HEADER: [&str; 4] = ["filename", "path", "label", "labeled_at"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub filename: String,
    pub path: String,
    /// "OK", "NG" or empty
    pub label: String,
    /// RFC 3339 timestamp or empty
    pub labeled_at: String,
}

impl From<&Entry> for ExportRow {
    fn from(entry: &Entry) -> Self {
        Self {
            filename: entry.filename.clone(),
            path: entry.path.clone(),
            label: entry.label().map(|l| l.as_str().to_string()).unwrap_or_default(),
            labeled_at: entry.labeled_at().map(format_timestamp).unwrap_or_default(),
        }
    }
}

/// Every catalog entry as a report row, ordered like `Catalog::list_all`
pub fn export_rows(catalog: &Catalog) -> Result<Vec<ExportRow>> {
    Ok(catalog.list_all()?.iter().map(ExportRow::from).collect())
}

/// Write the header and `rows` as CSV. The header is written even when
/// there are no rows.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for row in rows {
        csv.write_record([&row.filename, &row.path, &row.label, &row.labeled_at])?;
    }
    csv.flush()?;
    Ok(())
}

/// Export the whole catalog to a CSV file at `path`. Returns the number
/// of rows written.
pub fn export_csv_file(catalog: &Catalog, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let rows = export_rows(catalog)?;
    write_csv(&rows, File::create(path)?)?;

    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}
