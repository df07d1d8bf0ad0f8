//! Job registry: shared progress, results, and selection state.
//!
//! One coarse lock over a uid-keyed map. During processing a job's entry is
//! written only by its single worker; after completion only selection,
//! export, and delete touch it. Readers treat a missing uid as a normal
//! "not found".

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::cluster::Hole;

/// Externally visible processing state of one job.
///
/// `percent` never decreases; 100 is terminal for both success and failure
/// (the status text distinguishes them, error statuses are prefixed
/// `"Error: "`), so pollers can uniformly stop at 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProgress {
    pub percent: u8,
    pub status: String,
}

impl JobProgress {
    fn queued() -> Self {
        Self {
            percent: 0,
            status: "Queued".to_owned(),
        }
    }

    /// Whether the job has reached its terminal state.
    pub fn is_terminal(&self) -> bool {
        self.percent >= 100
    }

    /// Whether the terminal state is a failure.
    pub fn is_error(&self) -> bool {
        self.status.starts_with("Error:")
    }
}

#[derive(Debug)]
struct JobState {
    progress: JobProgress,
    holes: Vec<Hole>,
    mesh_path: Option<PathBuf>,
    selected: BTreeSet<u32>,
}

impl JobState {
    fn new() -> Self {
        Self {
            progress: JobProgress::queued(),
            holes: Vec::new(),
            mesh_path: None,
            selected: BTreeSet::new(),
        }
    }
}

/// Concurrency-safe uid-keyed store shared by worker tasks and readers.
#[derive(Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<String, JobState>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, JobState>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a freshly submitted job as queued.
    pub fn create(&self, uid: &str) {
        self.lock().insert(uid.to_owned(), JobState::new());
    }

    /// Report progress, keeping `percent` monotone within the job.
    pub fn set_progress(&self, uid: &str, percent: u8, status: impl Into<String>) {
        let mut jobs = self.lock();
        let state = jobs.entry(uid.to_owned()).or_insert_with(JobState::new);
        state.progress = JobProgress {
            percent: percent.max(state.progress.percent),
            status: status.into(),
        };
    }

    pub fn progress(&self, uid: &str) -> Option<JobProgress> {
        self.lock().get(uid).map(|s| s.progress.clone())
    }

    pub fn holes(&self, uid: &str) -> Option<Vec<Hole>> {
        self.lock().get(uid).map(|s| s.holes.clone())
    }

    /// Path of the persisted mesh artifact, if the job produced one.
    pub fn mesh_path(&self, uid: &str) -> Option<PathBuf> {
        self.lock().get(uid).and_then(|s| s.mesh_path.clone())
    }

    pub fn selected(&self, uid: &str) -> Option<BTreeSet<u32>> {
        self.lock().get(uid).map(|s| s.selected.clone())
    }

    /// Store a finished job's results and reset its selection.
    pub(crate) fn complete(&self, uid: &str, holes: Vec<Hole>, mesh_path: Option<PathBuf>) {
        let mut jobs = self.lock();
        let state = jobs.entry(uid.to_owned()).or_insert_with(JobState::new);
        state.holes = holes;
        state.mesh_path = mesh_path;
        state.selected.clear();
    }

    /// Record a terminal failure: no holes, no mesh, 100% with an error status.
    pub(crate) fn fail(&self, uid: &str, message: &str) {
        let mut jobs = self.lock();
        let state = jobs.entry(uid.to_owned()).or_insert_with(JobState::new);
        state.holes.clear();
        state.mesh_path = None;
        state.selected.clear();
        state.progress = JobProgress {
            percent: 100,
            status: format!("Error: {message}"),
        };
    }

    /// Flip `hole_id` in the job's selection set and return the updated set;
    /// id 0 reads the current selection without toggling. `None` when the uid
    /// is unknown or the id does not name a hole of this job.
    pub fn toggle(&self, uid: &str, hole_id: u32) -> Option<BTreeSet<u32>> {
        let mut jobs = self.lock();
        let state = jobs.get_mut(uid)?;
        if hole_id == 0 {
            return Some(state.selected.clone());
        }
        if hole_id as usize > state.holes.len() {
            return None;
        }
        if !state.selected.remove(&hole_id) {
            state.selected.insert(hole_id);
        }
        Some(state.selected.clone())
    }

    /// Drop the job entry, returning the persisted mesh path for cleanup.
    pub fn remove(&self, uid: &str) -> Option<PathBuf> {
        self.lock().remove(uid).and_then(|s| s.mesh_path)
    }
}
