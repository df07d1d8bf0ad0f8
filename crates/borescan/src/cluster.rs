//! Candidate fusion: anisotropic grouping and hole assembly.
//!
//! Duplicate observations of one physical hole arrive from several extractors
//! and at several depths. Grouping runs on rescaled features `(x, y, z/zscale)`
//! so that a tight XY radius and a looser vertical tolerance collapse into a
//! single isotropic clustering distance; every candidate belongs to exactly
//! one cluster (single-linkage at the grouping radius, no noise label).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DetectConfig;
use crate::extract::{CandidateCircle, SourceKind};
use crate::score::score_cluster;

/// A fused, ranked hole estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hole {
    /// Dense 1-based rank id, assigned after final ordering. Not stable
    /// across re-runs.
    pub id: u32,
    /// Component-wise median of the supporting centers.
    pub center: [f64; 3],
    /// Median of the supporting radii.
    pub radius: f64,
    /// Number of supporting candidate circles.
    pub num_circles: u32,
    /// Vertical spread (max − min Z) of the supporting centers.
    pub z_depth: f64,
    /// `|axis_z|` of the fused axis, in `[0, 1]`.
    pub vertical_alignment: f64,
    /// Confidence in `[0, 100]`.
    pub score: f64,
    /// Distinct sources among the supporting candidates.
    pub sources: BTreeSet<SourceKind>,
}

/// Fuse candidate circles into ranked holes.
///
/// Empty input, or input that the radius window filters away entirely,
/// yields an empty list.
pub fn aggregate(candidates: &[CandidateCircle], config: &DetectConfig) -> Vec<Hole> {
    // Defensive re-filter: extractors already gate on the window, but fused
    // input may come from elsewhere.
    let filtered: Vec<&CandidateCircle> = candidates
        .iter()
        .filter(|c| config.radius_in_window(c.radius))
        .collect();
    if filtered.is_empty() {
        return Vec::new();
    }

    let z_scale = config.z_scale();
    let features: Vec<[f64; 3]> = filtered
        .iter()
        .map(|c| [c.center[0], c.center[1], c.center[2] / z_scale])
        .collect();

    let mut holes = Vec::new();
    for indices in cluster_indices(&features, config.grouping_distance) {
        let members: Vec<CandidateCircle> = indices.iter().map(|&i| *filtered[i]).collect();
        if let Some(hole) = fuse_cluster(&members, config) {
            holes.push(hole);
        }
    }

    // Stable sort: equal scores keep cluster discovery order.
    holes.sort_by(|a, b| b.score.total_cmp(&a.score));
    holes.retain(|h| h.score >= config.min_score);
    holes.truncate(config.max_candidates);
    for (i, hole) in holes.iter_mut().enumerate() {
        hole.id = i as u32 + 1;
    }
    holes
}

/// Single-linkage connected components at radius `eps`, in point discovery
/// order. Minimum cluster size is 1: every point is a member of some cluster.
fn cluster_indices(features: &[[f64; 3]], eps: f64) -> Vec<Vec<usize>> {
    let n = features.len();
    let eps_sq = eps * eps;
    let mut assigned = vec![false; n];
    let mut clusters = Vec::new();

    for seed in 0..n {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];
        let mut frontier = vec![seed];
        while let Some(i) = frontier.pop() {
            for j in 0..n {
                if assigned[j] {
                    continue;
                }
                if dist_sq(&features[i], &features[j]) <= eps_sq {
                    assigned[j] = true;
                    members.push(j);
                    frontier.push(j);
                }
            }
        }
        members.sort_unstable();
        clusters.push(members);
    }
    clusters
}

fn dist_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Fuse one cluster into a hole, or drop it when the fused axis is not
/// vertical enough (a cluster dominated by poorly aligned fragments should
/// not become a hole).
fn fuse_cluster(members: &[CandidateCircle], config: &DetectConfig) -> Option<Hole> {
    if let Some(best) = representative(members) {
        debug!(
            source = ?best.source,
            z = best.center[2],
            members = members.len(),
            "cluster representative"
        );
    }

    let center = [
        median(members.iter().map(|m| m.center[0]).collect()),
        median(members.iter().map(|m| m.center[1]).collect()),
        median(members.iter().map(|m| m.center[2]).collect()),
    ];
    let radius = median(members.iter().map(|m| m.radius).collect());

    let mut axis = [0.0f64; 3];
    let mut total_weight = 0.0;
    for m in members {
        let w = m.source.trust_weight();
        for (a, &c) in axis.iter_mut().zip(m.axis.iter()) {
            *a += w * c;
        }
        total_weight += w;
    }
    for a in axis.iter_mut() {
        *a /= total_weight;
    }
    let norm = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt() + 1e-10;
    for a in axis.iter_mut() {
        *a /= norm;
    }

    let alignment = axis[2].abs();
    if alignment < config.min_vertical_alignment {
        return None;
    }

    let z_min = members.iter().map(|m| m.center[2]).fold(f64::INFINITY, f64::min);
    let z_max = members
        .iter()
        .map(|m| m.center[2])
        .fold(f64::NEG_INFINITY, f64::max);

    let sources: BTreeSet<SourceKind> = members.iter().map(|m| m.source).collect();
    let score = score_cluster(members, radius, alignment, config);

    Some(Hole {
        id: 0, // assigned after ranking
        center,
        radius,
        num_circles: members.len() as u32,
        z_depth: z_max - z_min,
        vertical_alignment: alignment,
        score,
        sources,
    })
}

/// Informational best member: analytic sources preferred, highest center Z.
fn representative(members: &[CandidateCircle]) -> Option<&CandidateCircle> {
    members
        .iter()
        .filter(|m| {
            matches!(
                m.source,
                SourceKind::AnalyticEdge | SourceKind::CylindricalFace
            )
        })
        .max_by(|a, b| a.center[2].total_cmp(&b.center[2]))
        .or_else(|| {
            members
                .iter()
                .max_by(|a, b| a.center[2].total_cmp(&b.center[2]))
        })
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    }
}
