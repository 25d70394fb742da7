//! Error types for harvest operations.
//!
//! Every error names the unit it belongs to (a target string, a file path or
//! a directory) so that a log line alone is enough to tell which part of the
//! batch failed. None of these errors ever stop sibling units.

use crate::models::TargetStage;
use std::path::Path;
use std::process::ExitStatus;
use thiserror::Error;

/// Main error type for SQLHarvest operations.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Invalid command-line input or startup configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// `git clone` could not be started or exited unsuccessfully
    #[error("Failed to clone repository {target}: {reason}")]
    CloneFailed { target: String, reason: String },

    /// A local target path does not exist or cannot be inspected
    #[error("Target {target} does not exist")]
    TargetNotFound {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Recursive traversal of a resolved target directory failed
    #[error("Failed to traverse {root}")]
    Traversal {
        root: String,
        #[source]
        source: walkdir::Error,
    },

    /// The shared output directory could not be created
    #[error("Failed to create output directory {path}")]
    OutputDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File read or write failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A unit of concurrent work panicked and was contained
    #[error("Task for {unit} panicked: {message}")]
    TaskPanicked { unit: String, message: String },
}

/// Convenience type alias for Results with `HarvestError`
pub type Result<T> = std::result::Result<T, HarvestError>;

impl HarvestError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a clone error for a `git` process that could not be spawned.
    pub fn clone_spawn(target: impl Into<String>, error: &std::io::Error) -> Self {
        Self::CloneFailed {
            target: target.into(),
            reason: format!("could not run git: {error}"),
        }
    }

    /// Creates a clone error for a `git` process that exited unsuccessfully.
    pub fn clone_status(target: impl Into<String>, status: ExitStatus) -> Self {
        Self::CloneFailed {
            target: target.into(),
            reason: format!("git {status}"),
        }
    }

    /// Creates a missing-target error
    pub fn target_not_found(target: impl Into<String>, source: std::io::Error) -> Self {
        Self::TargetNotFound {
            target: target.into(),
            source,
        }
    }

    /// Creates a traversal error rooted at `root`
    pub fn traversal(root: &Path, source: walkdir::Error) -> Self {
        Self::Traversal {
            root: root.display().to_string(),
            source,
        }
    }

    /// Creates an output directory creation error
    pub fn output_directory(path: &Path, source: std::io::Error) -> Self {
        Self::OutputDirectory {
            path: path.display().to_string(),
            source,
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates an error for a contained panic
    pub fn task_panicked(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskPanicked {
            unit: unit.into(),
            message: message.into(),
        }
    }

    /// Stage of the per-target pipeline this error aborts.
    ///
    /// Returns `None` for errors that are not tied to a pipeline step
    /// (configuration problems, contained panics).
    #[must_use]
    pub const fn stage(&self) -> Option<TargetStage> {
        match self {
            Self::CloneFailed { .. } | Self::TargetNotFound { .. } => Some(TargetStage::Resolving),
            Self::Traversal { .. } | Self::OutputDirectory { .. } => Some(TargetStage::Collecting),
            Self::Io { .. } => Some(TargetStage::Copying),
            Self::Configuration { .. } | Self::TaskPanicked { .. } => None,
        }
    }
}
