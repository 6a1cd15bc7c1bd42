/// Directory listing for catalog ingestion
///
/// Only the immediate children of the scanned folder are considered.
/// Results are sorted by file name so that ids are handed out in a stable
/// order regardless of how the filesystem enumerates the directory.
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Supported image file extensions (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An allow-listed image file found by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    /// Exact UTF-8 form of `path`, used as the catalog key
    key: String,
    pub filename: String,
}

impl ImageFile {
    pub fn path_str(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Default)]
pub struct Listing {
    pub images: Vec<ImageFile>,
    /// Directory entries whose metadata could not be read, or whose
    /// path is not valid UTF-8 and so cannot be stored as a key
    pub unreadable: usize,
}

/// Check whether a path carries one of the allow-listed extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// List the allow-listed regular files directly inside `directory`.
///
/// Fails with `DirectoryNotFound` when `directory` is missing or is not a
/// directory. Entries that cannot be inspected are counted and skipped.
pub fn list_images(directory: &Path) -> Result<Listing> {
    let is_dir = std::fs::metadata(directory)
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(Error::DirectoryNotFound(directory.to_path_buf()));
    }

    let root = std::path::absolute(directory)?;
    let mut listing = Listing::default();

    for entry in WalkDir::new(&root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", root.display(), err);
                listing.unreadable += 1;
                continue;
            }
        };

        // Symlinks are followed, so this is the target's type
        if !entry.file_type().is_file() || !is_supported_image(entry.path()) {
            continue;
        }

        // A lossy conversion would merge distinct files under one key
        let (Some(key), Some(filename)) = (entry.path().to_str(), entry.file_name().to_str())
        else {
            warn!("Skipping non-UTF-8 path {}", entry.path().display());
            listing.unreadable += 1;
            continue;
        };

        listing.images.push(ImageFile {
            key: key.to_string(),
            filename: filename.to_string(),
            path: entry.into_path(),
        });
    }

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"fake image data").expect("failed to write test file");
    }

    #[test]
    fn test_extension_allow_list_is_case_insensitive() {
        assert!(is_supported_image(Path::new("a.jpg")));
        assert!(is_supported_image(Path::new("a.JPEG")));
        assert!(is_supported_image(Path::new("a.Png")));
        assert!(!is_supported_image(Path::new("a.txt")));
        assert!(!is_supported_image(Path::new("a.gif")));
        assert!(!is_supported_image(Path::new("jpg")));
    }

    #[test]
    fn test_lists_only_immediate_image_files() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "b.png");
        touch(tmp.path(), "a.jpg");
        touch(tmp.path(), "c.txt");
        fs::create_dir(tmp.path().join("nested.jpg")).unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        touch(&tmp.path().join("sub"), "deep.jpg");

        let listing = list_images(tmp.path()).unwrap();
        let names: Vec<_> = listing.images.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
        assert_eq!(listing.unreadable, 0);
        assert!(listing.images.iter().all(|f| f.path.is_absolute()));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempdir().unwrap();
        touch(tmp.path(), "a.jpg");
        fs::write(tmp.path().join(OsStr::from_bytes(b"\xff.jpg")), b"x").unwrap();
        fs::write(tmp.path().join(OsStr::from_bytes(b"\xfe.jpg")), b"y").unwrap();

        let listing = list_images(tmp.path()).unwrap();
        let names: Vec<_> = listing.images.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.jpg"]);
        assert_eq!(listing.unreadable, 2);
        assert_eq!(listing.images[0].path_str(), listing.images[0].path.to_str().unwrap());
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        let tmp = tempdir().unwrap();
        let err = list_images(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(_)));
    }

    #[test]
    fn test_file_path_is_rejected() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "a.jpg");
        let err = list_images(&tmp.path().join("a.jpg")).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(_)));
    }
}
