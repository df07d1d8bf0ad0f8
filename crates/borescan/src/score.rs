//! Cluster confidence scoring.

use crate::config::DetectConfig;
use crate::extract::{CandidateCircle, SourceKind};

/// Radius at which the radius term peaks — the expected fastener-hole size.
const IDEAL_RADIUS: f64 = 5.5;

/// Radius-term penalty per unit of deviation from [`IDEAL_RADIUS`].
const RADIUS_PENALTY_PER_UNIT: f64 = 1.5;

/// Score a fused cluster, bounded to `[0, 100]`.
///
/// Four additive terms: closeness of the median radius to the expected hole
/// size (up to 25), vertical alignment above the configured minimum (up to
/// 15), supporting-candidate count (15–40), and per-source trust bonuses
/// (cylindrical evidence counts most).
pub fn score_cluster(
    members: &[CandidateCircle],
    median_radius: f64,
    alignment: f64,
    config: &DetectConfig,
) -> f64 {
    let mut score = (25.0 - (median_radius - IDEAL_RADIUS).abs() * RADIUS_PENALTY_PER_UNIT).max(0.0);

    if alignment >= config.min_vertical_alignment {
        score += (alignment - config.min_vertical_alignment)
            / (1.0 - config.min_vertical_alignment)
            * 15.0;
    }

    score += match members.len() {
        n if n >= 4 => 40.0,
        3 => 32.0,
        2 => 24.0,
        _ => 15.0,
    };

    let has = |kind: SourceKind| members.iter().any(|m| m.source == kind);
    if has(SourceKind::CylindricalFace) {
        score += 15.0;
    }
    if has(SourceKind::AnalyticEdge) {
        score += 10.0;
    }
    if has(SourceKind::FittedEdge) {
        score += if members.len() >= 2 { 5.0 } else { 3.0 };
    }

    score.clamp(0.0, 100.0)
}
