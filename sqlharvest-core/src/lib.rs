//! Core engine for SQLHarvest.
//!
//! SQLHarvest gathers `.sql` files from local directories and git
//! repositories into one flat directory, giving every copied file a fresh
//! UUID name. This crate holds everything but the command line:
//!
//! - [`resolver`]: local path checks and shallow clones into scratch directories
//! - [`collector`]: recursive `.sql` discovery and output directory setup
//! - [`copier`]: byte-exact copy under a `<uuid>.sql` name
//! - [`harvest`]: per-target and per-file fan-out with joins at both levels
//! - [`isolation`]: panic containment for each unit of concurrent work
//!
//! # Failure model
//! A failing target or file is logged and counted; it never stops the rest of
//! the batch. [`RunSummary`] carries counts only.

pub mod collector;
pub mod copier;
pub mod error;
pub mod harvest;
pub mod isolation;
pub mod logging;
pub mod models;
pub mod resolver;

// Re-export commonly used types
pub use error::{HarvestError, Result};
pub use harvest::{harvest, process_target};
pub use logging::init_logging;
pub use models::{
    CopyTally, DEFAULT_OUTPUT_DIR, HarvestOptions, RunSummary, SQL_SUFFIX, Target, TargetStage,
};
pub use resolver::{REMOTE_PREFIXES, ResolvedTarget, TargetKind};
