//! Recursive JPEG discovery under a site directory.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::Error;

/// Recursively collect `.jpg`/`.jpeg` files under `dir`, resolved to
/// absolute paths.
///
/// Extensions are matched as-is: `photo.JPG` is not a match. Camera
/// rigs used in the field write lowercase names; anything else is a
/// sidecar file we do not want. Non-image files are ignored and an
/// empty result is not an error.
///
/// # Errors
/// When the directory cannot be walked or a file cannot be resolved.
pub fn collect_jpegs(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut photos = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| Error::Scan {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.path().extension().and_then(OsStr::to_str) {
            Some("jpg" | "jpeg") => {}
            _ => continue,
        }
        let resolved = entry.path().canonicalize().map_err(|source| Error::Resolve {
            path: entry.path().to_path_buf(),
            source,
        })?;
        photos.push(resolved);
    }

    Ok(photos)
}
