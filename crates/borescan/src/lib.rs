//! borescan — circular/cylindrical hole inference for solid models.
//!
//! Infers the locations, radii, and confidence of holes from heterogeneous,
//! noisy geometric evidence, then lets a caller curate and export a subset in
//! a fixed downstream schema. The pipeline stages are:
//!
//! 1. **Extract** – three independent scans over the model's edges and faces
//!    produce tagged candidate circles: analytic circular edges, cylindrical
//!    faces, and circles fitted to samples of free-form edges.
//! 2. **Fit** – robust total-least-squares 3D circle fitting for edges with
//!    no analytic circle parameters.
//! 3. **Cluster** – anisotropic grouping merges duplicate observations of one
//!    physical hole; axes fuse by source trust, misaligned clusters drop.
//! 4. **Score** – a bounded, deterministic confidence score ranks the holes.
//! 5. **Serve** – one worker per submitted model with progress reporting,
//!    artifact persistence, per-job selection, and a fixed-schema export.
//!
//! The CAD kernel is an external collaborator consumed through the
//! [`SolidModel`] trait; kernel calls may fail per element, and such failures
//! are skipped, never propagated.
//!
//! # Public API
//! - [`HoleService`] as the primary entry point (submit / poll / curate /
//!   export / delete)
//! - [`DetectConfig`] for threshold tuning
//! - the stage functions ([`collect_candidates`], [`aggregate`],
//!   [`fit_circle3`], [`extract_mesh`], [`build_export`]) for offline use

mod cluster;
mod config;
mod export;
mod extract;
mod fit;
mod job;
mod kernel;
mod mesh;
mod pipeline;
mod sample;
mod score;
mod service;

pub use cluster::{aggregate, Hole};
pub use config::DetectConfig;
pub use export::{build_export, ExportDocument, ExportPoint, ExportRecord};
pub use extract::{
    collect_candidates, extract_analytic_edges, extract_cylindrical_faces, extract_fitted_edges,
    CandidateCircle, SourceKind,
};
pub use fit::{fit_circle3, CircleFit3};
pub use job::{JobProgress, JobRegistry};
pub use kernel::{
    CircleGeom, CurveClass, CylinderGeom, FacePatch, KernelError, SolidModel, SurfaceClass,
};
pub use mesh::{extract_mesh, MeshData};
pub use sample::sample_edge_points;
pub use score::score_cluster;
pub use service::{ExportOutcome, HoleService, ServiceError};

#[cfg(test)]
pub(crate) mod test_utils;
