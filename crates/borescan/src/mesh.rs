//! Viewer mesh assembly: triangulation harvest and vertex dedup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::kernel::SolidModel;

/// Deduplicated triangle mesh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
}

/// Harvest the kernel triangulation of the whole shape.
///
/// Vertices are deduplicated by exact coordinate equality: the kernel already
/// shares coincident nodes within one face, so this only prunes duplicates
/// across independently triangulated faces. Returns `None` when the kernel
/// fails or produces no geometry — callers treat that as "no mesh", not as an
/// error.
pub fn extract_mesh(model: &dyn SolidModel, quality: f64) -> Option<MeshData> {
    let patches = match model.triangulate(quality) {
        Ok(patches) => patches,
        Err(err) => {
            debug!(%err, "triangulation failed");
            return None;
        }
    };

    let mut index_of: HashMap<[u64; 3], u32> = HashMap::new();
    let mut vertices: Vec<[f64; 3]> = Vec::new();
    let mut faces: Vec<[u32; 3]> = Vec::new();

    for patch in &patches {
        // Per-patch map from local node index to the deduplicated space.
        let mut local = Vec::with_capacity(patch.nodes.len());
        for node in &patch.nodes {
            let key = [node[0].to_bits(), node[1].to_bits(), node[2].to_bits()];
            let index = *index_of.entry(key).or_insert_with(|| {
                vertices.push(*node);
                (vertices.len() - 1) as u32
            });
            local.push(index);
        }
        for tri in &patch.triangles {
            let (Some(&a), Some(&b), Some(&c)) = (
                local.get(tri[0] as usize),
                local.get(tri[1] as usize),
                local.get(tri[2] as usize),
            ) else {
                // Malformed triangle indexing past the node list.
                continue;
            };
            faces.push([a, b, c]);
        }
    }

    if vertices.is_empty() || faces.is_empty() {
        return None;
    }
    Some(MeshData { vertices, faces })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::FacePatch;
    use crate::test_utils::MockModel;

    #[test]
    fn shared_vertices_collapse_across_faces() {
        let shared = [1.0, 1.0, 0.0];
        let model = MockModel::with_patches(vec![
            FacePatch {
                nodes: vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], shared],
                triangles: vec![[0, 1, 2]],
            },
            FacePatch {
                nodes: vec![shared, [2.0, 2.0, 0.0], [0.0, 2.0, 0.0]],
                triangles: vec![[0, 1, 2]],
            },
        ]);
        let mesh = extract_mesh(&model, 1.5).expect("mesh");
        assert_eq!(mesh.vertices.len(), 5);
        assert_eq!(mesh.faces.len(), 2);
        // Both triangles reference the single shared entry.
        assert_eq!(mesh.faces[0][2], mesh.faces[1][0]);
        for face in &mesh.faces {
            for &i in face {
                assert!((i as usize) < mesh.vertices.len());
            }
        }
    }

    #[test]
    fn empty_triangulation_is_no_mesh() {
        let model = MockModel::with_patches(vec![]);
        assert!(extract_mesh(&model, 1.5).is_none());

        let nodes_only = MockModel::with_patches(vec![FacePatch {
            nodes: vec![[0.0, 0.0, 0.0]],
            triangles: vec![],
        }]);
        assert!(extract_mesh(&nodes_only, 1.5).is_none());
    }

    #[test]
    fn failing_kernel_is_no_mesh() {
        let model = MockModel {
            fail_triangulation: true,
            ..MockModel::default()
        };
        assert!(extract_mesh(&model, 1.5).is_none());
    }

    #[test]
    fn malformed_triangles_are_skipped() {
        let model = MockModel::with_patches(vec![FacePatch {
            nodes: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            triangles: vec![[0, 1, 2], [0, 1, 9]],
        }]);
        let mesh = extract_mesh(&model, 1.5).expect("mesh");
        assert_eq!(mesh.faces.len(), 1);
    }
}
