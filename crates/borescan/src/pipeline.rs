//! Per-job processing pipeline: load → detect → mesh → persist.
//!
//! The worker owns its job's registry entry for the duration of the run.
//! Every failure past submission is absorbed here and recorded as the job's
//! terminal error status; nothing propagates to the host process or to other
//! jobs.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::cluster::aggregate;
use crate::config::DetectConfig;
use crate::extract::collect_candidates;
use crate::job::JobRegistry;
use crate::kernel::{KernelError, SolidModel};
use crate::mesh::extract_mesh;

/// Short pause after the 40% milestone so pollers can observe it on models
/// that process near-instantly.
const MILESTONE_PAUSE: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error("{0}")]
    Kernel(#[from] KernelError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Encode(#[from] serde_json::Error),
}

/// Run one job to its terminal state.
pub(crate) fn run_job<M, F>(
    registry: &JobRegistry,
    uid: &str,
    output_root: &Path,
    config: &DetectConfig,
    loader: F,
) where
    M: SolidModel,
    F: FnOnce() -> Result<M, KernelError>,
{
    if let Err(err) = try_run_job(registry, uid, output_root, config, loader) {
        warn!(uid, %err, "job failed");
        registry.fail(uid, &err.to_string());
    }
}

fn try_run_job<M, F>(
    registry: &JobRegistry,
    uid: &str,
    output_root: &Path,
    config: &DetectConfig,
    loader: F,
) -> Result<(), PipelineError>
where
    M: SolidModel,
    F: FnOnce() -> Result<M, KernelError>,
{
    registry.set_progress(uid, 5, "Loading model");
    let model = loader()?;
    let model: &dyn SolidModel = &model;

    registry.set_progress(uid, 15, "Detecting holes");
    let candidates = collect_candidates(model, config);
    let holes = aggregate(&candidates, config);

    registry.set_progress(
        uid,
        40,
        format!("Found {} holes, triangulating mesh", holes.len()),
    );
    thread::sleep(MILESTONE_PAUSE);

    let Some(mesh) = extract_mesh(model, config.mesh_quality) else {
        // A model with no triangulable faces can still yield valid holes
        // from its edges alone.
        registry.complete(uid, holes, None);
        registry.set_progress(uid, 100, "No mesh produced");
        return Ok(());
    };

    registry.set_progress(uid, 75, "Saving data");
    fs::create_dir_all(output_root)?;
    let mesh_path = artifact_path(output_root, "mesh", uid);
    fs::write(&mesh_path, serde_json::to_vec(&mesh)?)?;
    fs::write(
        artifact_path(output_root, "holes", uid),
        serde_json::to_vec(&holes)?,
    )?;

    let count = holes.len();
    registry.complete(uid, holes, Some(mesh_path));
    registry.set_progress(uid, 100, format!("Done - {count} holes detected"));
    info!(uid, holes = count, "job finished");
    Ok(())
}

/// Deterministic artifact path for a job: `<root>/<kind>_<uid>.json`.
pub(crate) fn artifact_path(output_root: &Path, kind: &str, uid: &str) -> PathBuf {
    output_root.join(format!("{kind}_{uid}.json"))
}
