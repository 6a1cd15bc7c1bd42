/// Shared data structures for the catalog
///
/// These structs represent the data model that flows between
/// the database layer, the navigation session and the adapters.
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use crate::error::ParseLabelError;

/// Quality verdict assigned by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NG")]
    Ng,
}

impl Label {
    /// Stored and exported spelling ("OK" / "NG")
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Ok => "OK",
            Label::Ng => "NG",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = ParseLabelError;

    /// Exact match only: "ok" or " OK" are rejected like any other value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(Label::Ok),
            "NG" => Ok(Label::Ng),
            other => Err(ParseLabelError(other.to_string())),
        }
    }
}

impl ToSql for Label {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Label {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: ParseLabelError| FromSqlError::Other(Box::new(e)))
    }
}

/// A label together with the moment it was assigned.
///
/// Keeping both in one value means an entry can never carry a label
/// without a timestamp or the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labeling {
    pub label: Label,
    pub at: DateTime<Utc>,
}

/// Represents a single image in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Unique database ID, assigned in insertion order and never reused
    pub id: i64,
    /// Absolute path to the image file (unique key)
    pub path: String,
    /// Filename only (e.g., "part_0001.jpg")
    pub filename: String,
    /// None while the image is unlabeled
    pub labeling: Option<Labeling>,
}

impl Entry {
    pub fn label(&self) -> Option<Label> {
        self.labeling.map(|l| l.label)
    }

    pub fn labeled_at(&self) -> Option<DateTime<Utc>> {
        self.labeling.map(|l| l.at)
    }

    pub fn is_labeled(&self) -> bool {
        self.labeling.is_some()
    }

    /// Content type for serving the backing file, derived from the extension
    pub fn media_type(&self) -> &'static str {
        let is_png = Path::new(&self.path)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if is_png {
            "image/png"
        } else {
            "image/jpeg"
        }
    }

    /// Open the backing image file for reading
    pub fn open(&self) -> std::io::Result<File> {
        File::open(&self.path)
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Entry", 5)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("filename", &self.filename)?;
        s.serialize_field("label", &self.label())?;
        s.serialize_field("labeled_at", &self.labeled_at().map(format_timestamp))?;
        s.end()
    }
}

/// Aggregate counts over the whole catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: u64,
    pub ok: u64,
    pub ng: u64,
    pub unlabeled: u64,
    pub labeled: u64,
}

impl Stats {
    /// Derive the dependent counts from the three measured ones
    pub fn from_counts(total: u64, ok: u64, ng: u64) -> Self {
        let labeled = ok + ng;
        Self {
            total,
            ok,
            ng,
            unlabeled: total.saturating_sub(labeled),
            labeled,
        }
    }
}

/// Outcome of one directory scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Allow-listed files that went through insertion, including known paths
    pub considered: usize,
    /// Rows newly created by this scan
    pub added: usize,
    /// Files dropped because their metadata or insert failed
    pub skipped: usize,
}

/// Timestamp text used in the database and in exports (RFC 3339, UTC, ms)
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|at| at.with_timezone(&Utc))
}
