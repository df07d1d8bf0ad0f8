//! Service surface: submit, poll, curate, export, delete.
//!
//! One worker thread per submitted model; all shared state lives in the
//! [`JobRegistry`]. The transport layer (upload endpoints, polling, static
//! serving) is an external collaborator and consumes exactly this surface.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use rand::RngCore;
use thiserror::Error;
use tracing::{info, warn};

use crate::cluster::Hole;
use crate::config::DetectConfig;
use crate::export::build_export;
use crate::job::{JobProgress, JobRegistry};
use crate::kernel::{KernelError, SolidModel};
use crate::pipeline::{artifact_path, run_job};

/// Error surfaced to transport-layer callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unknown job uid, or a hole id not present in the job's result set.
    #[error("not found")]
    NotFound,
    /// The export document could not be written.
    #[error("export failed: {0}")]
    ExportIo(#[from] std::io::Error),
    /// The export document could not be encoded.
    #[error("export failed: {0}")]
    ExportEncode(#[from] serde_json::Error),
}

/// Summary returned by a successful export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub count: usize,
    pub filename: String,
}

/// Long-running hole-inference service.
pub struct HoleService {
    registry: Arc<JobRegistry>,
    config: DetectConfig,
    output_root: PathBuf,
}

impl HoleService {
    pub fn new(config: DetectConfig, output_root: impl Into<PathBuf>) -> Self {
        Self {
            registry: Arc::new(JobRegistry::new()),
            config,
            output_root: output_root.into(),
        }
    }

    /// Directory holding the per-job artifacts.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Submit a model for processing and return its job uid.
    ///
    /// `loader` runs on the worker thread (model parsing can be slow); its
    /// failure becomes the job's terminal error status. The returned uid is
    /// immediately pollable at `Queued`/0%.
    pub fn submit<M, F>(&self, loader: F) -> String
    where
        M: SolidModel + 'static,
        F: FnOnce() -> Result<M, KernelError> + Send + 'static,
    {
        let uid = make_uid();
        self.registry.create(&uid);

        let registry = Arc::clone(&self.registry);
        let config = self.config.clone();
        let output_root = self.output_root.clone();
        let worker_uid = uid.clone();
        thread::spawn(move || {
            run_job(&registry, &worker_uid, &output_root, &config, loader);
        });

        uid
    }

    pub fn progress(&self, uid: &str) -> Option<JobProgress> {
        self.registry.progress(uid)
    }

    pub fn holes(&self, uid: &str) -> Option<Vec<Hole>> {
        self.registry.holes(uid)
    }

    /// Path of the persisted mesh artifact, if the job produced one.
    pub fn mesh_path(&self, uid: &str) -> Option<PathBuf> {
        self.registry.mesh_path(uid)
    }

    /// Flip a hole id in the job's selection (id 0 reads without toggling)
    /// and return the updated selection set.
    pub fn toggle(&self, uid: &str, hole_id: u32) -> Result<BTreeSet<u32>, ServiceError> {
        self.registry
            .toggle(uid, hole_id)
            .ok_or(ServiceError::NotFound)
    }

    /// Write the export document for the currently selected holes and return
    /// the record count and artifact filename.
    pub fn export(&self, uid: &str) -> Result<ExportOutcome, ServiceError> {
        let holes = self.registry.holes(uid).ok_or(ServiceError::NotFound)?;
        let selected = self.registry.selected(uid).ok_or(ServiceError::NotFound)?;

        let document = build_export(&holes, &selected);
        let filename = format!("holes_export_{uid}.json");
        fs::create_dir_all(&self.output_root)?;
        fs::write(
            self.output_root.join(&filename),
            serde_json::to_vec_pretty(&document)?,
        )?;

        let count = document.reposition_point_data_array.len();
        info!(uid, count, "export written");
        Ok(ExportOutcome { count, filename })
    }

    /// Remove the job's registry entry and persisted artifacts.
    ///
    /// Unknown uids and already-missing files are tolerated; an in-flight
    /// worker is not interrupted.
    pub fn delete(&self, uid: &str) {
        self.registry.remove(uid);
        for kind in ["mesh", "holes"] {
            let path = artifact_path(&self.output_root, kind, uid);
            if let Err(err) = fs::remove_file(&path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(uid, path = %path.display(), %err, "failed to remove artifact");
                }
            }
        }
    }
}

/// Opaque, collision-resistant job uid: 16 random bytes as lowercase hex.
fn make_uid() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut out = String::with_capacity(32);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
