//! Shared test fixtures: circle samplers and an in-memory model.

use crate::kernel::{
    CircleGeom, CurveClass, CylinderGeom, FacePatch, KernelError, SolidModel, SurfaceClass,
};

/// Sample `n` points on a circle in the XY plane (no closing duplicate).
pub(crate) fn circle_points(center: [f64; 3], radius: f64, n: usize) -> Vec<[f64; 3]> {
    circle_points_about(center, [0.0, 0.0, 1.0], radius, n, 2.0 * std::f64::consts::PI)
}

/// Sample `n` points covering `arc` radians of a circle about an arbitrary
/// axis. A full revolution stops short of the closing point; a partial arc
/// includes both endpoints.
pub(crate) fn circle_points_about(
    center: [f64; 3],
    axis: [f64; 3],
    radius: f64,
    n: usize,
    arc: f64,
) -> Vec<[f64; 3]> {
    let norm = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    let w = [axis[0] / norm, axis[1] / norm, axis[2] / norm];
    // Any vector not parallel to w seeds the in-plane frame.
    let seed = if w[0].abs() < 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 1.0, 0.0]
    };
    let u = normalize(cross(w, seed));
    let v = cross(w, u);

    let full = (arc - 2.0 * std::f64::consts::PI).abs() < 1e-9;
    let denom = if full { n as f64 } else { (n - 1) as f64 };
    (0..n)
        .map(|i| {
            let t = arc * i as f64 / denom;
            let (s, c) = t.sin_cos();
            [
                center[0] + radius * (c * u[0] + s * v[0]),
                center[1] + radius * (c * u[1] + s * v[1]),
                center[2] + radius * (c * u[2] + s * v[2]),
            ]
        })
        .collect()
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(a: [f64; 3]) -> [f64; 3] {
    let n = (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt();
    [a[0] / n, a[1] / n, a[2] / n]
}

/// Scripted edge behaviors for [`MockModel`].
pub(crate) enum MockEdge {
    /// Classified as an analytic circle.
    AnalyticCircle(CircleGeom),
    /// Non-analytic curve evaluable over `[0, span]` on an XY-plane circle.
    FreeArc {
        center: [f64; 3],
        radius: f64,
        span: f64,
    },
    /// No parametric domain; only a polygonal approximation exists.
    PolylineOnly(Vec<[f64; 3]>),
    /// Every query fails.
    Broken,
}

/// Scripted face behaviors for [`MockModel`].
pub(crate) enum MockFace {
    Cylinder(CylinderGeom),
    Planar,
    Broken,
}

/// In-memory stand-in for a kernel-loaded shape.
#[derive(Default)]
pub(crate) struct MockModel {
    pub edges: Vec<MockEdge>,
    pub faces: Vec<MockFace>,
    pub patches: Vec<FacePatch>,
    pub fail_triangulation: bool,
}

impl MockModel {
    pub(crate) fn with_edges(edges: Vec<MockEdge>) -> Self {
        Self {
            edges,
            ..Self::default()
        }
    }

    pub(crate) fn with_faces(faces: Vec<MockFace>) -> Self {
        Self {
            faces,
            ..Self::default()
        }
    }

    pub(crate) fn with_patches(patches: Vec<FacePatch>) -> Self {
        Self {
            patches,
            ..Self::default()
        }
    }

    fn edge(&self, edge: usize) -> Result<&MockEdge, KernelError> {
        self.edges
            .get(edge)
            .ok_or_else(|| KernelError::Query(format!("no edge {edge}")))
    }
}

impl SolidModel for MockModel {
    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn edge_curve(&self, edge: usize) -> Result<CurveClass, KernelError> {
        match self.edge(edge)? {
            MockEdge::AnalyticCircle(geom) => Ok(CurveClass::Circle(*geom)),
            MockEdge::FreeArc { .. } | MockEdge::PolylineOnly(_) => Ok(CurveClass::Other),
            MockEdge::Broken => Err(KernelError::Query("broken edge".into())),
        }
    }

    fn edge_parameter_range(&self, edge: usize) -> Result<(f64, f64), KernelError> {
        match self.edge(edge)? {
            MockEdge::AnalyticCircle(_) => Ok((0.0, 2.0 * std::f64::consts::PI)),
            MockEdge::FreeArc { span, .. } => Ok((0.0, *span)),
            MockEdge::PolylineOnly(_) => Err(KernelError::Query("no parametric domain".into())),
            MockEdge::Broken => Err(KernelError::Query("broken edge".into())),
        }
    }

    fn edge_point(&self, edge: usize, t: f64) -> Result<[f64; 3], KernelError> {
        match self.edge(edge)? {
            MockEdge::AnalyticCircle(geom) => Ok([
                geom.center[0] + geom.radius * t.cos(),
                geom.center[1] + geom.radius * t.sin(),
                geom.center[2],
            ]),
            MockEdge::FreeArc { center, radius, .. } => Ok([
                center[0] + radius * t.cos(),
                center[1] + radius * t.sin(),
                center[2],
            ]),
            MockEdge::PolylineOnly(_) => Err(KernelError::Query("no parametric domain".into())),
            MockEdge::Broken => Err(KernelError::Query("broken edge".into())),
        }
    }

    fn edge_polyline(&self, edge: usize, _tolerance: f64) -> Result<Vec<[f64; 3]>, KernelError> {
        match self.edge(edge)? {
            MockEdge::PolylineOnly(points) => Ok(points.clone()),
            _ => Err(KernelError::Query("no polygonal approximation".into())),
        }
    }

    fn face_surface(&self, face: usize) -> Result<SurfaceClass, KernelError> {
        match self
            .faces
            .get(face)
            .ok_or_else(|| KernelError::Query(format!("no face {face}")))?
        {
            MockFace::Cylinder(geom) => Ok(SurfaceClass::Cylinder(*geom)),
            MockFace::Planar => Ok(SurfaceClass::Other),
            MockFace::Broken => Err(KernelError::Query("broken face".into())),
        }
    }

    fn triangulate(&self, _quality: f64) -> Result<Vec<FacePatch>, KernelError> {
        if self.fail_triangulation {
            return Err(KernelError::Triangulation("meshing failed".into()));
        }
        Ok(self.patches.clone())
    }
}
