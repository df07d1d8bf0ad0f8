//! Edge point sampling with graceful degradation.
//!
//! The primary path evaluates the edge's curve at uniformly spaced parameter
//! values; when the parametric domain is missing or too few evaluations
//! succeed, a low-tolerance polygonal approximation is requested instead.
//! No kernel failure escapes this module.

use crate::kernel::SolidModel;

/// Parametric domains shorter than this are treated as degenerate.
const MIN_DOMAIN_SPAN: f64 = 1e-7;

/// Fewer distinct points than this cannot constrain a circle fit.
pub(crate) const MIN_USEFUL_POINTS: usize = 4;

/// Sample up to `n_samples` points on `edge`.
///
/// Returns the parametric samples when at least [`MIN_USEFUL_POINTS`] of them
/// evaluate, otherwise the polygonal fallback when it yields at least that
/// many vertices, otherwise whatever partial (possibly empty) parametric
/// result was collected.
pub fn sample_edge_points(
    model: &dyn SolidModel,
    edge: usize,
    n_samples: usize,
    polyline_tolerance: f64,
) -> Vec<[f64; 3]> {
    let mut pts = Vec::new();

    if let Ok((first, last)) = model.edge_parameter_range(edge) {
        if (last - first).abs() > MIN_DOMAIN_SPAN && n_samples >= 2 {
            let step = (last - first) / (n_samples - 1) as f64;
            for i in 0..n_samples {
                let t = first + step * i as f64;
                if let Ok(p) = model.edge_point(edge, t) {
                    pts.push(p);
                }
            }
            if pts.len() >= MIN_USEFUL_POINTS {
                return pts;
            }
        }
    }

    match model.edge_polyline(edge, polyline_tolerance) {
        Ok(poly) if poly.len() >= MIN_USEFUL_POINTS => poly,
        _ => pts,
    }
}
