//! Transient data model for a single harvest run.
//!
//! Nothing here outlives the process: targets are consumed once, options
//! are fixed at startup and the summary only carries counts.

use crate::resolver::TargetKind;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Default output directory when `--output` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = "statements";

/// Extension (with leading dot) of harvested files, both on input and output.
pub const SQL_SUFFIX: &str = ".sql";

/// A single command-line target: a local directory or a repository URL.
///
/// Kept as an OS string so local paths need not be valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    raw: OsString,
}

impl Target {
    /// Wraps a raw target string as given on the command line.
    pub fn new(raw: impl Into<OsString>) -> Self {
        Self { raw: raw.into() }
    }

    /// The target exactly as it was provided.
    #[must_use]
    pub fn as_os_str(&self) -> &OsStr {
        &self.raw
    }

    /// Whether the target is a remote repository or a local path.
    #[must_use]
    pub fn kind(&self) -> TargetKind {
        TargetKind::classify(&self.raw)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw.display())
    }
}

/// Steps of the per-target pipeline.
///
/// `Resolving → Collecting → Copying → Done`, with `Aborted` reachable
/// from any step. No step is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetStage {
    Resolving,
    Collecting,
    Copying,
    Done,
    Aborted,
}

impl std::fmt::Display for TargetStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolving => write!(f, "resolving"),
            Self::Collecting => write!(f, "collecting"),
            Self::Copying => write!(f, "copying"),
            Self::Done => write!(f, "done"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Run configuration shared by every target task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOptions {
    /// Flat directory receiving `<uuid>.sql` files
    pub output_dir: PathBuf,
    /// Directory in which temporary clones are created
    pub clone_root: PathBuf,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            clone_root: PathBuf::from("."),
        }
    }
}

impl HarvestOptions {
    /// Creates options with the default output directory and the current
    /// working directory as clone root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output directory
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets the directory in which temporary clones are created
    #[must_use]
    pub fn with_clone_root(mut self, clone_root: impl Into<PathBuf>) -> Self {
        self.clone_root = clone_root.into();
        self
    }
}

/// Per-target count of copied and failed files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyTally {
    /// Files written to the output directory
    pub written: usize,
    /// Files whose read, write or task failed
    pub failed: usize,
}

impl CopyTally {
    pub(crate) const fn record(&mut self, written: bool) {
        if written {
            self.written = self.written.saturating_add(1);
        } else {
            self.failed = self.failed.saturating_add(1);
        }
    }
}

/// Counts for a finished run. Failure details are only ever logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Target units spawned and joined
    pub targets: usize,
    /// Targets that reached `Done`
    pub completed: usize,
    /// Targets that ended in `Aborted`
    pub aborted: usize,
    /// Files written to the output directory
    pub files_written: usize,
    /// Files that failed to copy
    pub files_failed: usize,
}

impl RunSummary {
    pub(crate) const fn record_completed(&mut self, tally: CopyTally) {
        self.targets = self.targets.saturating_add(1);
        self.completed = self.completed.saturating_add(1);
        self.files_written = self.files_written.saturating_add(tally.written);
        self.files_failed = self.files_failed.saturating_add(tally.failed);
    }

    pub(crate) const fn record_aborted(&mut self) {
        self.targets = self.targets.saturating_add(1);
        self.aborted = self.aborted.saturating_add(1);
    }
}
