//! Total-least-squares 3D circle fitting.
//!
//! The fit proceeds in two stages: an SVD plane fit of the centered samples
//! (robust to points that are not exactly coplanar), then an algebraic
//! least-squares circle `x² + y² = a·x + b·y + c` in the plane's coordinates.
//! The angular span actually covered by the samples is recovered alongside,
//! so callers can tell a full circle from a short arc fragment.

use std::collections::HashSet;

use nalgebra::{DMatrix, DVector, Vector3};
use serde::{Deserialize, Serialize};

/// A fitted 3D circle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CircleFit3 {
    pub center: [f64; 3],
    /// Unit plane normal; sign is arbitrary.
    pub axis: [f64; 3],
    pub radius: f64,
    /// Angular extent (radians) the samples cover around the fitted center,
    /// clamped to `[0, 2π]`.
    pub arc_span: f64,
}

/// Residual sums above this mean the samples are too scattered to be a circle.
const MAX_RESIDUAL_SUM: f64 = 5e4;

/// In-plane basis vectors shorter than this are degenerate.
const MIN_BASIS_NORM: f64 = 1e-10;

/// Iteration cap for the SVD solver.
const SVD_MAX_ITER: usize = 1000;

/// Fit a circle to arbitrary 3D point samples.
///
/// Requires at least `min_points` distinct points. Returns `None` for every
/// failure mode — too few points, SVD non-convergence, degenerate in-plane
/// basis, singular least-squares system, excessive residual, or non-positive
/// radius — so callers treat "no fit" as "not a candidate".
pub fn fit_circle3(points: &[[f64; 3]], min_points: usize) -> Option<CircleFit3> {
    let pts = dedup_exact(points);
    if pts.len() < min_points {
        return None;
    }
    let n = pts.len();

    let mut centroid = Vector3::zeros();
    for p in &pts {
        centroid += Vector3::new(p[0], p[1], p[2]);
    }
    centroid /= n as f64;

    let mut centered = DMatrix::<f64>::zeros(n, 3);
    for (i, p) in pts.iter().enumerate() {
        centered[(i, 0)] = p[0] - centroid.x;
        centered[(i, 1)] = p[1] - centroid.y;
        centered[(i, 2)] = p[2] - centroid.z;
    }

    // Right singular vectors, sorted by descending singular value: the two
    // largest span the best-fit plane, the smallest is its normal.
    let svd = centered.try_svd(false, true, f64::EPSILON, SVD_MAX_ITER)?;
    let v_t = svd.v_t?;
    let x_axis = Vector3::new(v_t[(0, 0)], v_t[(0, 1)], v_t[(0, 2)]);
    let normal = Vector3::new(v_t[(2, 0)], v_t[(2, 1)], v_t[(2, 2)]);

    let y_axis = normal.cross(&x_axis);
    if y_axis.norm() < MIN_BASIS_NORM {
        return None;
    }
    let y_axis = y_axis.normalize();

    let mut design = DMatrix::<f64>::zeros(n, 3);
    let mut rhs = DVector::<f64>::zeros(n);
    let mut plane_xy = Vec::with_capacity(n);
    for (i, p) in pts.iter().enumerate() {
        let d = Vector3::new(p[0], p[1], p[2]) - centroid;
        let x = d.dot(&x_axis);
        let y = d.dot(&y_axis);
        design[(i, 0)] = x;
        design[(i, 1)] = y;
        design[(i, 2)] = 1.0;
        rhs[i] = x * x + y * y;
        plane_xy.push([x, y]);
    }

    // Normal equations of the algebraic circle system; a singular 3x3 means
    // the projected points are collinear.
    let dtd = design.transpose() * &design;
    let dtb = design.transpose() * &rhs;
    let coeffs = dtd.try_inverse()? * dtb;

    let residual = (&design * &coeffs - &rhs).norm_squared();
    if residual > MAX_RESIDUAL_SUM {
        return None;
    }

    let cx = 0.5 * coeffs[0];
    let cy = 0.5 * coeffs[1];
    let radius_sq = coeffs[2] + cx * cx + cy * cy;
    if radius_sq <= 0.0 {
        return None;
    }
    let radius = radius_sq.sqrt();

    let center = centroid + cx * x_axis + cy * y_axis;
    let axis = normal.normalize();
    let arc_span = unwrapped_span(&plane_xy, cx, cy);

    Some(CircleFit3 {
        center: [center.x, center.y, center.z],
        axis: [axis.x, axis.y, axis.z],
        radius,
        arc_span,
    })
}

/// Exact-coordinate dedup preserving first-occurrence order.
fn dedup_exact(points: &[[f64; 3]]) -> Vec<[f64; 3]> {
    let mut seen = HashSet::with_capacity(points.len());
    let mut out = Vec::with_capacity(points.len());
    for p in points {
        let key = [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()];
        if seen.insert(key) {
            out.push(*p);
        }
    }
    out
}

/// Angular extent of `points` around `(cx, cy)`: per-point `atan2` angles,
/// phase-unwrapped in sequence order, max − min, clamped to `[0, 2π]`.
fn unwrapped_span(points: &[[f64; 2]], cx: f64, cy: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut prev: Option<f64> = None;
    let mut offset = 0.0;
    let mut min_a = f64::INFINITY;
    let mut max_a = f64::NEG_INFINITY;

    for p in points {
        let raw = (p[1] - cy).atan2(p[0] - cx);
        if let Some(prev_a) = prev {
            let mut diff = raw + offset - prev_a;
            while diff > std::f64::consts::PI {
                offset -= two_pi;
                diff -= two_pi;
            }
            while diff < -std::f64::consts::PI {
                offset += two_pi;
                diff += two_pi;
            }
        }
        let unwrapped = raw + offset;
        prev = Some(unwrapped);
        min_a = min_a.min(unwrapped);
        max_a = max_a.max(unwrapped);
    }

    if min_a > max_a {
        return 0.0;
    }
    (max_a - min_a).min(two_pi)
}
