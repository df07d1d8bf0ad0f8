//! Candidate circle extraction from model edges and faces.
//!
//! Three independent, side-effect-free scans, each tagging its output by
//! source. All three gate on the radius window and the minimum vertical
//! alignment; fitted edges additionally gate on the covered arc span. A
//! kernel failure on any single element skips that element only.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DetectConfig;
use crate::fit::fit_circle3;
use crate::kernel::{CurveClass, SolidModel, SurfaceClass};
use crate::sample::{sample_edge_points, MIN_USEFUL_POINTS};

/// Where a candidate observation came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Edge whose curve is an exact analytic circle.
    AnalyticEdge,
    /// Face whose surface is an exact analytic cylinder — the only source
    /// implying a solid boundary rather than just an edge.
    CylindricalFace,
    /// Circle fitted to samples of a non-analytic edge.
    FittedEdge,
}

impl SourceKind {
    /// Axis-fusion weight, by source trust.
    pub(crate) fn trust_weight(self) -> f64 {
        match self {
            SourceKind::CylindricalFace => 3.0,
            SourceKind::AnalyticEdge => 2.0,
            SourceKind::FittedEdge => 1.0,
        }
    }
}

/// One raw observation of a possibly-circular feature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CandidateCircle {
    pub source: SourceKind,
    pub center: [f64; 3],
    pub radius: f64,
    /// Unit axis; sign is arbitrary.
    pub axis: [f64; 3],
    /// Covered angular extent, present for fitted edges only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_span: Option<f64>,
}

impl CandidateCircle {
    /// Absolute cosine between the axis and the model's up direction.
    pub fn vertical_alignment(&self) -> f64 {
        self.axis[2].abs()
    }
}

fn passes_gates(config: &DetectConfig, radius: f64, axis: [f64; 3]) -> bool {
    config.radius_in_window(radius) && axis[2].abs() >= config.min_vertical_alignment
}

/// Scan edges whose curve is an exact analytic circle.
pub fn extract_analytic_edges(model: &dyn SolidModel, config: &DetectConfig) -> Vec<CandidateCircle> {
    let mut out = Vec::new();
    for edge in 0..model.edge_count() {
        let class = match model.edge_curve(edge) {
            Ok(class) => class,
            Err(err) => {
                debug!(edge, %err, "skipping edge: curve query failed");
                continue;
            }
        };
        let CurveClass::Circle(geom) = class else {
            continue;
        };
        if passes_gates(config, geom.radius, geom.axis) {
            out.push(CandidateCircle {
                source: SourceKind::AnalyticEdge,
                center: geom.center,
                radius: geom.radius,
                axis: geom.axis,
                arc_span: None,
            });
        }
    }
    out
}

/// Scan faces whose surface is an exact analytic cylinder.
pub fn extract_cylindrical_faces(
    model: &dyn SolidModel,
    config: &DetectConfig,
) -> Vec<CandidateCircle> {
    let mut out = Vec::new();
    for face in 0..model.face_count() {
        let class = match model.face_surface(face) {
            Ok(class) => class,
            Err(err) => {
                debug!(face, %err, "skipping face: surface query failed");
                continue;
            }
        };
        let SurfaceClass::Cylinder(geom) = class else {
            continue;
        };
        if passes_gates(config, geom.radius, geom.axis) {
            out.push(CandidateCircle {
                source: SourceKind::CylindricalFace,
                center: geom.location,
                radius: geom.radius,
                axis: geom.axis,
                arc_span: None,
            });
        }
    }
    out
}

/// Sample-and-fit scan over the remaining (non-analytic-circle) edges. The
/// least trusted source; catches holes bounded by approximated/spline edges.
pub fn extract_fitted_edges(model: &dyn SolidModel, config: &DetectConfig) -> Vec<CandidateCircle> {
    let mut out = Vec::new();
    for edge in 0..model.edge_count() {
        match model.edge_curve(edge) {
            // Analytic circles are owned by the analytic scan.
            Ok(CurveClass::Circle(_)) => continue,
            Ok(CurveClass::Other) => {}
            Err(err) => {
                debug!(edge, %err, "skipping edge: curve query failed");
                continue;
            }
        }

        let pts = sample_edge_points(model, edge, config.edge_samples, config.polyline_tolerance);
        if pts.len() < MIN_USEFUL_POINTS {
            continue;
        }
        let Some(fit) = fit_circle3(&pts, MIN_USEFUL_POINTS) else {
            continue;
        };
        if !passes_gates(config, fit.radius, fit.axis) {
            continue;
        }
        if fit.arc_span < config.arc_min_span_rad {
            continue;
        }
        out.push(CandidateCircle {
            source: SourceKind::FittedEdge,
            center: fit.center,
            radius: fit.radius,
            axis: fit.axis,
            arc_span: Some(fit.arc_span),
        });
    }
    out
}

/// Run all three scans and pool their candidates.
pub fn collect_candidates(model: &dyn SolidModel, config: &DetectConfig) -> Vec<CandidateCircle> {
    let mut all = extract_analytic_edges(model, config);
    all.extend(extract_cylindrical_faces(model, config));
    all.extend(extract_fitted_edges(model, config));
    all
}
