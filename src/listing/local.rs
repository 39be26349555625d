use super::ListingError;
use crate::utils::LocalFileSet;
use std::path::Path;
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

/// List the names of every non-directory entry directly inside `dir`.
///
/// Subdirectories are skipped, never descended into. Symbolic links are
/// not followed, so a link to a directory is listed like a file. Names that
/// are not valid UTF-8 are kept as-is.
pub async fn list_local_files(dir: &Path) -> Result<LocalFileSet, ListingError> {
    let metadata = fs::metadata(dir).await.map_err(|source| ListingError::IoError {
        path: dir.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ListingError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = LocalFileSet::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ListingError::IoError {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        files.insert(entry.file_name().to_os_string());
    }

    debug!(count = files.len(), dir = %dir.display(), "Listed local files");
    Ok(files)
}
