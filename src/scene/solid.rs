use std::collections::HashMap;

use slotmap::new_key_type;

use crate::math::aabb_3d::Aabb;
use crate::math::{transform_point, Matrix4, Point3, Vector3, TOLERANCE};

new_key_type! {
    /// Unique identifier for a solid in the scene store.
    pub struct SolidId;
}

/// Edge statistics of a triangle mesh.
///
/// A watertight mesh has no boundary edges; every boundary edge is a
/// crack where exactly one triangle touches the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCensus {
    /// Number of distinct undirected edges.
    pub unique: usize,
    /// Number of edges used by exactly one triangle.
    pub boundary: usize,
}

/// Triangle mesh data for one extruded shape.
///
/// Positions are stored in the solid's local frame; the owning group's
/// transform places the mesh in the scene.
#[derive(Debug, Clone, Default)]
pub struct SolidData {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Vertex normals, parallel to `positions`.
    pub normals: Vec<Vector3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl SolidData {
    /// Builds a solid from raw buffers and computes its vertex normals.
    #[must_use]
    pub fn new(positions: Vec<Point3>, indices: Vec<[u32; 3]>) -> Self {
        let mut solid = Self {
            positions,
            normals: Vec::new(),
            indices,
        };
        solid.recompute_normals();
        solid
    }

    /// Number of triangles in the mesh.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Recomputes vertex normals from triangle windings.
    ///
    /// Face contributions are area weighted (the unnormalized cross
    /// product carries twice the triangle area), so slivers barely
    /// influence the shared-vertex average.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];
        for tri in &self.indices {
            let v0 = self.positions[tri[0] as usize];
            let v1 = self.positions[tri[1] as usize];
            let v2 = self.positions[tri[2] as usize];
            let face = (v1 - v0).cross(&(v2 - v0));
            for &i in tri {
                normals[i as usize] += face;
            }
        }
        for n in &mut normals {
            let len = n.norm();
            if len > TOLERANCE {
                *n /= len;
            }
        }
        self.normals = normals;
    }

    /// Bounding box in the solid's local frame, or `None` for an empty mesh.
    #[must_use]
    pub fn aabb(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Bounding box after applying `matrix` to every vertex.
    #[must_use]
    pub fn aabb_transformed(&self, matrix: &Matrix4) -> Option<Aabb> {
        let transformed: Vec<Point3> = self
            .positions
            .iter()
            .map(|p| transform_point(matrix, p))
            .collect();
        Aabb::from_points(&transformed)
    }

    /// Returns a copy of the mesh with `matrix` baked into the positions.
    ///
    /// Normals are recomputed from the transformed positions, so
    /// non-uniform scales stay correct without an inverse-transpose.
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix4) -> Self {
        let positions = self
            .positions
            .iter()
            .map(|p| transform_point(matrix, p))
            .collect();
        Self::new(positions, self.indices.clone())
    }

    /// Enclosed volume via the signed tetrahedron method.
    ///
    /// For each triangle, computes `(1/6) * v0 . (v1 x v2)` and sums
    /// over all triangles. The stored normals are used to correct for
    /// any winding inconsistencies between faces.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let mut signed_volume = 0.0;
        for tri in &self.indices {
            let v0 = self.positions[tri[0] as usize];
            let v1 = self.positions[tri[1] as usize];
            let v2 = self.positions[tri[2] as usize];

            let cross = (v1 - v0).cross(&(v2 - v0));
            let det = v0.coords.dot(&v1.coords.cross(&v2.coords));

            let avg_normal = self.normals[tri[0] as usize]
                + self.normals[tri[1] as usize]
                + self.normals[tri[2] as usize];

            if avg_normal.dot(&cross) >= 0.0 {
                signed_volume += det;
            } else {
                signed_volume -= det;
            }
        }
        signed_volume.abs() / 6.0
    }

    /// Counts distinct undirected edges and boundary edges.
    #[must_use]
    pub fn edge_census(&self) -> EdgeCensus {
        let mut uses: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in &self.indices {
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                let edge = if a < b { (a, b) } else { (b, a) };
                *uses.entry(edge).or_insert(0) += 1;
            }
        }
        let boundary = uses.values().filter(|&&count| count == 1).count();
        EdgeCensus {
            unique: uses.len(),
            boundary,
        }
    }
}
