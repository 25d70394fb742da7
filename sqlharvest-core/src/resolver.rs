//! Target resolution: local paths are checked, repository URLs are cloned.
//!
//! A remote target is shallow-cloned into a uniquely named directory under
//! the clone root. That directory belongs to the target's task and is removed
//! when the [`ResolvedTarget`] is released, or dropped if the task unwinds.

use crate::{Result, error::HarvestError, models::Target};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Prefixes that mark a target as a repository reference.
///
/// No further URL validation happens; malformed URLs are left for `git`
/// to reject.
pub const REMOTE_PREFIXES: [&str; 3] = ["http://", "https://", "git@"];

/// How a target string is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Repository URL, cloned before walking
    Remote,
    /// Directory on the local filesystem
    Local,
}

impl TargetKind {
    /// Classifies a target by its prefix (case-sensitive).
    #[must_use]
    pub fn classify(target: impl AsRef<OsStr>) -> Self {
        let bytes = target.as_ref().as_encoded_bytes();
        if REMOTE_PREFIXES
            .iter()
            .any(|prefix| bytes.starts_with(prefix.as_bytes()))
        {
            Self::Remote
        } else {
            Self::Local
        }
    }
}

/// Uniquely named scratch directory holding one shallow clone.
#[derive(Debug)]
pub struct CloneDir {
    path: PathBuf,
    removed: bool,
}

impl CloneDir {
    /// Reserves a fresh UUID-named path under `clone_root`. Nothing is created
    /// on disk until `git clone` runs.
    #[must_use]
    pub fn new(clone_root: &Path) -> Self {
        Self {
            path: clone_root.join(Uuid::new_v4().to_string()),
            removed: false,
        }
    }

    /// Location of the clone.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the clone directory.
    pub async fn remove(mut self) {
        let result = tokio::fs::remove_dir_all(&self.path).await;
        log_removal(&self.path, result);
        self.removed = true;
    }
}

impl Drop for CloneDir {
    fn drop(&mut self) {
        if !self.removed {
            log_removal(&self.path, std::fs::remove_dir_all(&self.path));
        }
    }
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => debug!("Removed temporary directory {}", path.display()),
        // A failed clone may never have created the directory
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(
            "Failed to remove temporary directory {}: {}",
            path.display(),
            e
        ),
    }
}

/// A target turned into a directory that can be walked.
#[derive(Debug)]
pub enum ResolvedTarget {
    /// The target string used directly as a path
    Local(PathBuf),
    /// A temporary clone owned by this target's task
    Cloned(CloneDir),
}

impl ResolvedTarget {
    /// Directory to walk. For clones it is valid until [`Self::release`].
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Local(path) => path,
            Self::Cloned(dir) => dir.path(),
        }
    }

    /// Releases the resolved directory, deleting it if it is a clone.
    pub async fn release(self) {
        if let Self::Cloned(dir) = self {
            dir.remove().await;
        }
    }
}

/// Resolves a target to a local directory.
///
/// # Errors
///
/// Returns [`HarvestError::CloneFailed`] when `git` is unavailable or exits
/// unsuccessfully, and [`HarvestError::TargetNotFound`] when the resolved path
/// does not exist. A failed clone leaves nothing behind under `clone_root`.
pub async fn resolve(target: &Target, clone_root: &Path) -> Result<ResolvedTarget> {
    let resolved = match target.kind() {
        TargetKind::Remote => {
            info!("Target {} is a git repository, cloning", target);
            let dir = CloneDir::new(clone_root);
            if let Err(e) = shallow_clone(target, dir.path()).await {
                dir.remove().await;
                return Err(e);
            }
            info!("Clone complete for {}", target);
            ResolvedTarget::Cloned(dir)
        }
        TargetKind::Local => ResolvedTarget::Local(PathBuf::from(target.as_os_str())),
    };

    if let Err(e) = tokio::fs::metadata(resolved.path()).await {
        resolved.release().await;
        return Err(HarvestError::target_not_found(target.to_string(), e));
    }

    Ok(resolved)
}

/// Runs `git clone --depth=1 <url> <destination>`.
///
/// git's own output goes straight to the terminal; only the exit status is
/// inspected.
async fn shallow_clone(url: &Target, destination: &Path) -> Result<()> {
    debug!("Cloning {} into {}", url, destination.display());

    let status = Command::new("git")
        .arg("clone")
        .arg("--depth=1")
        .arg(url.as_os_str())
        .arg(destination)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|e| HarvestError::clone_spawn(url.to_string(), &e))?;

    if !status.success() {
        return Err(HarvestError::clone_status(url.to_string(), status));
    }

    Ok(())
}
