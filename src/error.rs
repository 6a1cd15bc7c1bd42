/// Error types for the catalog and labeling session
///
/// Lookups that miss are not errors: `Catalog::get` returns `None` and
/// `Catalog::set_label` returns `false`, leaving "not found" to the caller.
use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Scan target is missing or is not a directory
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Label value outside the OK/NG domain
    #[error(transparent)]
    InvalidLabel(#[from] ParseLabelError),

    #[error("catalog store failure: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Raised when a string is not one of the two label values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Label must be 'OK' or 'NG', got {0:?}")]
pub struct ParseLabelError(pub String);

/// Coarse classification for adapters deciding how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied something unusable (client error)
    InvalidInput,
    /// Persistence or environment failure (server error)
    StoreFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DirectoryNotFound(_) | Error::InvalidLabel(_) => ErrorKind::InvalidInput,
            Error::Store(_) | Error::Io(_) | Error::Csv(_) | Error::Config(_) => {
                ErrorKind::StoreFailure
            }
        }
    }
}
