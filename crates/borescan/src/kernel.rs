//! Interface to the external CAD kernel.
//!
//! The pipeline never parses model files itself; it consumes a loaded model
//! only through [`SolidModel`]. Edges and faces are addressed by index, and
//! every query is fallible: a kernel may fail on a single element without
//! invalidating the rest of the model, so callers skip failed elements and
//! continue the enclosing scan.

use thiserror::Error;

/// Failure reported by the kernel for a model-level or per-element call.
#[derive(Debug, Error)]
pub enum KernelError {
    /// The model file could not be read or converted into a shape.
    #[error("failed to load model: {0}")]
    Load(String),
    /// A per-element geometry query failed.
    #[error("kernel query failed: {0}")]
    Query(String),
    /// Triangulation of the shape failed.
    #[error("triangulation failed: {0}")]
    Triangulation(String),
}

/// Analytic parameters of a circular edge.
#[derive(Debug, Clone, Copy)]
pub struct CircleGeom {
    pub center: [f64; 3],
    /// Unit axis normal to the circle plane; sign is arbitrary.
    pub axis: [f64; 3],
    pub radius: f64,
}

/// Analytic parameters of a cylindrical surface.
#[derive(Debug, Clone, Copy)]
pub struct CylinderGeom {
    /// A point on the cylinder axis.
    pub location: [f64; 3],
    /// Unit axis direction; sign is arbitrary.
    pub axis: [f64; 3],
    pub radius: f64,
}

/// Curve classification of one edge.
#[derive(Debug, Clone, Copy)]
pub enum CurveClass {
    Circle(CircleGeom),
    Other,
}

/// Surface classification of one face.
#[derive(Debug, Clone, Copy)]
pub enum SurfaceClass {
    Cylinder(CylinderGeom),
    Other,
}

/// Triangulation of one face: nodes in world coordinates (the kernel applies
/// its placement transform before handing them over) and triangles indexing
/// into `nodes`.
#[derive(Debug, Clone, Default)]
pub struct FacePatch {
    pub nodes: Vec<[f64; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

/// A loaded solid model as exposed by the CAD kernel.
///
/// Implementations wrap whatever topology the kernel produced. None of the
/// methods is assumed infallible: extraction treats an `Err` from any
/// per-element call as "skip this element".
pub trait SolidModel {
    fn edge_count(&self) -> usize;
    fn face_count(&self) -> usize;

    /// Classify the curve underlying `edge`.
    fn edge_curve(&self, edge: usize) -> Result<CurveClass, KernelError>;

    /// Parametric domain `[first, last]` of the edge's curve.
    fn edge_parameter_range(&self, edge: usize) -> Result<(f64, f64), KernelError>;

    /// Evaluate the edge's curve at parameter `t`.
    fn edge_point(&self, edge: usize, t: f64) -> Result<[f64; 3], KernelError>;

    /// Polygonal approximation of the edge at the given chord tolerance,
    /// vertices in world coordinates.
    fn edge_polyline(&self, edge: usize, tolerance: f64) -> Result<Vec<[f64; 3]>, KernelError>;

    /// Classify the surface underlying `face`.
    fn face_surface(&self, face: usize) -> Result<SurfaceClass, KernelError>;

    /// Triangulate the whole shape at `quality`, one patch per face.
    fn triangulate(&self, quality: f64) -> Result<Vec<FacePatch>, KernelError>;
}
