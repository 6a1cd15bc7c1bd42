/// Navigation through the unlabeled images of a catalog
///
/// The session keeps only a cursor into the unlabeled subset. The subset
/// itself is fetched from the catalog on every read, so labeling an image
/// makes the next unlabeled one slide under the cursor, and a cursor left
/// past the end by a shrinking subset is clamped back into range.
use serde::Serialize;
use tracing::debug;

use super::catalog::Catalog;
use super::data::{Entry, Label, Stats};
use crate::error::Result;

/// What the operator should be looking at right now
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NavigationView {
    /// An unlabeled image is available
    Current {
        entry: Entry,
        /// 0-based position within the unlabeled subset
        index: usize,
        /// Size of the unlabeled subset
        total: usize,
        has_prev: bool,
        has_next: bool,
        stats: Stats,
    },
    /// Nothing left to label
    Empty {
        stats: Stats,
        /// True when images exist and all of them are labeled,
        /// false when nothing has been scanned yet
        all_done: bool,
    },
}

impl NavigationView {
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            NavigationView::Current { entry, .. } => Some(entry),
            NavigationView::Empty { .. } => None,
        }
    }

    pub fn stats(&self) -> Stats {
        match self {
            NavigationView::Current { stats, .. } | NavigationView::Empty { stats, .. } => *stats,
        }
    }

    /// JSON payload for adapters
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Cursor over the unlabeled subset of a catalog.
///
/// Sessions are independent of each other and hold no store handle; each
/// call borrows the catalog it should read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationSession {
    cursor: usize,
}

impl NavigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw cursor value. Only guaranteed to be in range right after a read.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Go back to the first unlabeled image (called after every scan)
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Re-read the unlabeled subset and return the image under the cursor.
    pub fn current(&mut self, catalog: &Catalog) -> Result<NavigationView> {
        let mut unlabeled = catalog.list_unlabeled()?;
        let stats = catalog.stats()?;

        if unlabeled.is_empty() {
            self.cursor = 0;
            return Ok(NavigationView::Empty {
                stats,
                all_done: stats.total > 0,
            });
        }

        let total = unlabeled.len();
        if self.cursor >= total {
            debug!("Cursor {} clamped to {}", self.cursor, total - 1);
            self.cursor = total - 1;
        }

        let index = self.cursor;
        Ok(NavigationView::Current {
            entry: unlabeled.swap_remove(index),
            index,
            total,
            has_prev: index > 0,
            has_next: index < total - 1,
            stats,
        })
    }

    /// Move one position forward, stopping at the last unlabeled image.
    pub fn next(&mut self, catalog: &Catalog) -> Result<NavigationView> {
        let count = catalog.count_unlabeled()?;
        if count > 0 && self.cursor < count - 1 {
            self.cursor += 1;
        }
        self.current(catalog)
    }

    /// Move one position back, stopping at the first unlabeled image.
    pub fn prev(&mut self, catalog: &Catalog) -> Result<NavigationView> {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.current(catalog)
    }

    /// Label the image currently shown and return what is shown next.
    pub fn label_current(&mut self, catalog: &Catalog, label: Label) -> Result<NavigationView> {
        let view = self.current(catalog)?;
        match view.entry() {
            Some(entry) => {
                catalog.assign_label(entry.id, label)?;
                self.current(catalog)
            }
            None => Ok(view),
        }
    }
}
