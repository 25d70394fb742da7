//! Two-level fan-out: one task per target, one task per collected file.
//!
//! Each level joins all of its tasks before moving on. Failures are logged
//! at the boundary of the unit that produced them and never travel upward;
//! the parent only learns that the unit finished.

use crate::{
    Result,
    collector::{collect_sql_files, ensure_output_dir},
    copier::copy_file,
    isolation::{isolated, join_error_message},
    models::{CopyTally, HarvestOptions, RunSummary, Target, TargetStage},
    resolver::resolve,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Outcome of one target task, as seen by the join loop.
enum TargetOutcome {
    Done(CopyTally),
    Aborted,
}

/// Harvests `.sql` files from every target into `options.output_dir`.
///
/// Spawns one isolated task per target and waits for all of them. Always
/// returns once every target has been joined, whatever failed along the way.
pub async fn harvest(targets: Vec<Target>, options: HarvestOptions) -> RunSummary {
    info!(
        "{} target(s) to process, saving results to {}",
        targets.len(),
        options.output_dir.display()
    );

    let options = Arc::new(options);
    let mut tasks = JoinSet::new();

    for (index, target) in targets.into_iter().enumerate() {
        info!("Starting target #{} {}", index.saturating_add(1), target);
        let options = Arc::clone(&options);
        let span = info_span!("target", source = %target);

        tasks.spawn(
            async move {
                let unit = format!("target {target}");
                let result = isolated(&unit, process_target(&target, &options)).await;
                report_target(&target, result)
            }
            .instrument(span),
        );
    }

    let mut summary = RunSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(TargetOutcome::Done(tally)) => summary.record_completed(tally),
            Ok(TargetOutcome::Aborted) => summary.record_aborted(),
            Err(e) => {
                error!("Target task failed to join: {}", join_error_message(e));
                summary.record_aborted();
            }
        }
    }

    info!(
        "All targets processed, results saved in {}",
        options.output_dir.display()
    );
    debug!(?summary, "Run summary");
    summary
}

fn report_target(target: &Target, result: Result<CopyTally>) -> TargetOutcome {
    match result {
        Ok(tally) => {
            if tally.failed > 0 {
                warn!(
                    "{} file(s) from {} could not be copied",
                    tally.failed, target
                );
            }
            info!(
                stage = %TargetStage::Done,
                "Finished target {}: {} file(s) copied",
                target,
                tally.written
            );
            TargetOutcome::Done(tally)
        }
        Err(e) => {
            let during = e
                .stage()
                .map(|stage| format!(" while {stage}"))
                .unwrap_or_default();
            error!(
                stage = %TargetStage::Aborted,
                "Failed to process target {}{}: {}",
                target,
                during,
                e
            );
            TargetOutcome::Aborted
        }
    }
}

/// Runs `Resolving → Collecting → Copying` for a single target.
///
/// A temporary clone is released before returning, whether or not the later
/// steps succeeded.
///
/// # Errors
///
/// Returns the first target-level error (clone, missing path, traversal,
/// output directory). File-level failures are logged and only counted.
pub async fn process_target(target: &Target, options: &HarvestOptions) -> Result<CopyTally> {
    debug!(stage = %TargetStage::Resolving, "Resolving {}", target);
    let resolved = resolve(target, &options.clone_root).await?;

    let result = collect_and_copy(resolved.path(), &options.output_dir).await;
    resolved.release().await;
    result
}

async fn collect_and_copy(root: &Path, output_dir: &Path) -> Result<CopyTally> {
    debug!(stage = %TargetStage::Collecting, "Walking {}", root.display());
    let files = collect_sql_files(root).await?;
    ensure_output_dir(output_dir).await?;

    debug!(
        stage = %TargetStage::Copying,
        "Copying {} .sql file(s) from {}",
        files.len(),
        root.display()
    );
    Ok(copy_all(files, output_dir).await)
}

/// Copies every file in its own isolated task and joins them all.
pub async fn copy_all(files: Vec<PathBuf>, output_dir: &Path) -> CopyTally {
    let output_dir = Arc::new(output_dir.to_path_buf());
    let mut tasks = JoinSet::new();

    for file in files {
        let output_dir = Arc::clone(&output_dir);
        tasks.spawn(
            async move {
                let unit = format!("file {}", file.display());
                match isolated(&unit, copy_file(&file, &output_dir)).await {
                    Ok(_) => true,
                    Err(e) => {
                        error!("Failed to copy {}: {}", file.display(), e);
                        false
                    }
                }
            }
            .in_current_span(),
        );
    }

    let mut tally = CopyTally::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(written) => tally.record(written),
            Err(e) => {
                error!("File task failed to join: {}", join_error_message(e));
                tally.record(false);
            }
        }
    }
    tally
}
