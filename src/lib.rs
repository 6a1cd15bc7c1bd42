//! Image catalog and OK/NG labeling sessions.
//!
//! A [`Catalog`] keeps scanned image files and their labels in SQLite.
//! A [`NavigationSession`] walks the still-unlabeled images one at a time,
//! staying valid while labeling shrinks that set underneath it.

pub mod config;
pub mod error;
pub mod export;
pub mod state;

pub use config::Config;
pub use error::{Error, ErrorKind, ParseLabelError, Result};
pub use state::catalog::Catalog;
pub use state::data::{Entry, Label, Labeling, ScanReport, Stats};
pub use state::session::{NavigationSession, NavigationView};
