//! Byte-exact copy of one collected file into the flat output directory.

use crate::{Result, error::HarvestError, models::SQL_SUFFIX};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

/// Generates a fresh `<uuid-v4>.sql` file name.
#[must_use]
pub fn output_file_name() -> String {
    format!("{}{SQL_SUFFIX}", Uuid::new_v4())
}

/// Copies `source` into `output_dir` under a freshly generated name.
///
/// The whole file is read into memory and written back unchanged. The
/// destination is opened with `create_new`, so an existing file is never
/// overwritten. Nothing is written when the read fails.
///
/// # Errors
///
/// Returns [`HarvestError::Io`] naming the source or destination path when
/// the read or the write fails.
pub async fn copy_file(source: &Path, output_dir: &Path) -> Result<PathBuf> {
    let content = tokio::fs::read(source)
        .await
        .map_err(|e| HarvestError::io(format!("Failed to read {}", source.display()), e))?;

    let destination = output_dir.join(output_file_name());
    write_new(&destination, &content).await.map_err(|e| {
        HarvestError::io(
            format!(
                "Failed to write {} (copied from {})",
                destination.display(),
                source.display()
            ),
            e,
        )
    })?;

    debug!(
        "Copied {} -> {} ({} bytes)",
        source.display(),
        destination.display(),
        content.len()
    );
    Ok(destination)
}

async fn write_new(destination: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .await?;
    file.write_all(content).await?;
    file.flush().await
}
