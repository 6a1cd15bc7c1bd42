/// Runtime configuration
///
/// The catalog database location is resolved in this order:
/// 1. `SNAP_LABEL_DB` environment variable
/// 2. The user's data directory:
///    - Linux: ~/.local/share/snap-label/labels.db
///    - macOS: ~/Library/Application Support/snap-label/labels.db
///    - Windows: %APPDATA%\snap-label\labels.db
/// 3. ~/snap-label/labels.db when no data directory is known
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable overriding the catalog database path
pub const ENV_DB_PATH: &str = "SNAP_LABEL_DB";

const APP_DIR: &str = "snap-label";
const DB_FILE: &str = "labels.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::resolve(
            std::env::var_os(ENV_DB_PATH).map(PathBuf::from),
            dirs::data_dir().or_else(dirs::home_dir),
        )
    }

    fn resolve(db_override: Option<PathBuf>, base_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = db_override.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self::with_db_path(path));
        }
        let base = base_dir
            .ok_or_else(|| Error::Config("could not determine user data directory".into()))?;
        Ok(Self::with_db_path(default_db_path(&base)))
    }
}

fn default_db_path(base: &Path) -> PathBuf {
    base.join(APP_DIR).join(DB_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let config = Config::resolve(
            Some(PathBuf::from("/tmp/custom.db")),
            Some(PathBuf::from("/home/op/.local/share")),
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/custom.db"));

        // No data directory needed when the path is given
        let config = Config::resolve(Some(PathBuf::from("/tmp/custom.db")), None).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let config =
            Config::resolve(Some(PathBuf::new()), Some(PathBuf::from("/home/op/.local/share")))
                .unwrap();
        assert_eq!(
            config.db_path,
            PathBuf::from("/home/op/.local/share/snap-label/labels.db")
        );
    }

    #[test]
    fn test_missing_data_directory_is_a_config_error() {
        let err = Config::resolve(None, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_layout() {
        assert_eq!(
            default_db_path(Path::new("/home/op/.local/share")),
            PathBuf::from("/home/op/.local/share/snap-label/labels.db")
        );
    }
}
