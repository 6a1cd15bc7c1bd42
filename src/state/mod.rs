/// State management module
///
/// This module handles all catalog and labeling state, including:
/// - Database connection and queries (catalog.rs)
/// - Directory listing for scans (scan.rs)
/// - Shared data structures (data.rs)
/// - Navigation through unlabeled images (session.rs)

pub mod catalog;
pub mod data;
pub mod scan;
pub mod session;
