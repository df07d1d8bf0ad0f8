//! Detection thresholds and pipeline tuning.

use serde::{Deserialize, Serialize};

/// Top-level hole-detection configuration.
///
/// Units follow the input model (typically millimeters). The defaults target
/// fastener-sized vertical holes in machined parts; individual fields can be
/// overridden after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Minimum accepted hole radius.
    pub radius_min: f64,
    /// Maximum accepted hole radius.
    pub radius_max: f64,
    /// XY radius within which candidate circles merge into one hole.
    pub grouping_distance: f64,
    /// Allowed vertical spread of candidate centers within one hole
    /// (counterbores and through-holes are observed at several depths).
    pub z_tolerance: f64,
    /// Minimum `|axis_z|` for a candidate or a fused hole.
    pub min_vertical_alignment: f64,
    /// Minimum score a hole must reach to be reported.
    pub min_score: f64,
    /// Maximum number of holes reported per model.
    pub max_candidates: usize,
    /// Minimum angular span (radians) a fitted arc must cover; shorter
    /// fragments are too unreliable to use as evidence.
    pub arc_min_span_rad: f64,
    /// Number of parameter samples taken per edge for circle fitting.
    pub edge_samples: usize,
    /// Chord tolerance of the polygonal fallback used when parametric
    /// sampling is unavailable.
    pub polyline_tolerance: f64,
    /// Kernel triangulation quality for the persisted viewer mesh.
    pub mesh_quality: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            radius_min: 1.5,
            radius_max: 20.0,
            grouping_distance: 4.0,
            z_tolerance: 12.0,
            min_vertical_alignment: 0.15,
            min_score: 20.0,
            max_candidates: 800,
            arc_min_span_rad: 1.0,
            edge_samples: 120,
            polyline_tolerance: 0.08,
            mesh_quality: 1.5,
        }
    }
}

impl DetectConfig {
    /// Z rescale factor folding the vertical tolerance into the isotropic
    /// grouping radius.
    pub fn z_scale(&self) -> f64 {
        self.z_tolerance / self.grouping_distance
    }

    /// Whether `radius` falls inside the accepted window.
    pub fn radius_in_window(&self, radius: f64) -> bool {
        (self.radius_min..=self.radius_max).contains(&radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let cfg = DetectConfig::default();
        assert!((cfg.radius_min - 1.5).abs() < 1e-12);
        assert!((cfg.radius_max - 20.0).abs() < 1e-12);
        assert!((cfg.grouping_distance - 4.0).abs() < 1e-12);
        assert!((cfg.z_tolerance - 12.0).abs() < 1e-12);
        assert!((cfg.min_vertical_alignment - 0.15).abs() < 1e-12);
        assert!((cfg.min_score - 20.0).abs() < 1e-12);
        assert_eq!(cfg.max_candidates, 800);
        assert!((cfg.arc_min_span_rad - 1.0).abs() < 1e-12);
        assert_eq!(cfg.edge_samples, 120);
    }

    #[test]
    fn z_scale_folds_tolerances() {
        let cfg = DetectConfig::default();
        assert!((cfg.z_scale() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn radius_window_is_inclusive() {
        let cfg = DetectConfig::default();
        assert!(cfg.radius_in_window(1.5));
        assert!(cfg.radius_in_window(20.0));
        assert!(!cfg.radius_in_window(1.499));
        assert!(!cfg.radius_in_window(20.001));
    }
}
