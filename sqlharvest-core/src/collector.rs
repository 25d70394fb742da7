//! Recursive discovery of `.sql` files under a resolved target.

use crate::{Result, error::HarvestError, isolation::join_error_message, models::SQL_SUFFIX};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Returns true when the final path component ends in `.sql`.
///
/// The match is exact and case-sensitive: `a.SQL`, `a.sql.bak` and `sql`
/// are all rejected.
#[must_use]
pub fn is_sql_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(SQL_SUFFIX.as_bytes()))
}

/// Walks `root` and returns every non-directory entry accepted by
/// [`is_sql_file`]. Order is unspecified.
///
/// Symlinks are not followed. The first traversal error aborts the walk.
///
/// # Errors
///
/// Returns [`HarvestError::Traversal`] if any entry under `root` cannot be read.
pub fn walk_sql_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| HarvestError::traversal(root, e))?;
        if entry.file_type().is_dir() {
            continue;
        }
        if is_sql_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Async wrapper running [`walk_sql_files`] on the blocking pool.
///
/// # Errors
///
/// Propagates traversal errors; a panic inside the walk is reported as
/// [`HarvestError::TaskPanicked`].
pub async fn collect_sql_files(root: &Path) -> Result<Vec<PathBuf>> {
    let owned_root = root.to_path_buf();
    tokio::task::spawn_blocking(move || walk_sql_files(&owned_root))
        .await
        .map_err(|e| {
            HarvestError::task_panicked(
                format!("walk of {}", root.display()),
                join_error_message(e),
            )
        })?
}

/// Creates the output directory if it does not exist yet.
///
/// Safe to call concurrently from several target tasks.
///
/// # Errors
///
/// Returns [`HarvestError::OutputDirectory`] if the directory cannot be
/// created, including when `path` exists as a regular file.
pub async fn ensure_output_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| HarvestError::output_directory(path, e))
}
