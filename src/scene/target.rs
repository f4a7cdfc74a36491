use super::SolidData;
use crate::error::PlacementError;
use crate::math::aabb_3d::Aabb;
use crate::math::intersect_3d::{ray_triangle_intersect, RayTriangleHit};
use crate::math::{Point3, Vector3};

/// The scanned surface that artwork is placed onto.
///
/// Held in world coordinates; placement casts rays against it directly
/// and derives the stay-inside region from its bounding box.
#[derive(Debug, Clone)]
pub struct TargetMesh {
    positions: Vec<Point3>,
    indices: Vec<[u32; 3]>,
    aabb: Aabb,
}

impl TargetMesh {
    /// Builds a target from raw mesh buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh has no triangles.
    pub fn new(positions: Vec<Point3>, indices: Vec<[u32; 3]>) -> Result<Self, PlacementError> {
        if indices.is_empty() {
            return Err(PlacementError::InvalidInput(
                "target mesh has no triangles".into(),
            ));
        }
        let aabb = Aabb::from_points(&positions).ok_or_else(|| {
            PlacementError::InvalidInput("target mesh has no vertices".into())
        })?;
        Ok(Self {
            positions,
            indices,
            aabb,
        })
    }

    /// Builds a target from an existing solid's buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid has no triangles.
    pub fn from_solid(solid: &SolidData) -> Result<Self, PlacementError> {
        Self::new(solid.positions.clone(), solid.indices.clone())
    }

    /// An axis-aligned box target, 12 triangles with outward winding.
    #[must_use]
    pub fn cuboid(center: Point3, size: Vector3) -> Self {
        let h = size * 0.5;
        let positions = vec![
            Point3::new(center.x - h.x, center.y - h.y, center.z - h.z),
            Point3::new(center.x + h.x, center.y - h.y, center.z - h.z),
            Point3::new(center.x + h.x, center.y + h.y, center.z - h.z),
            Point3::new(center.x - h.x, center.y + h.y, center.z - h.z),
            Point3::new(center.x - h.x, center.y - h.y, center.z + h.z),
            Point3::new(center.x + h.x, center.y - h.y, center.z + h.z),
            Point3::new(center.x + h.x, center.y + h.y, center.z + h.z),
            Point3::new(center.x - h.x, center.y + h.y, center.z + h.z),
        ];
        let indices = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self {
            positions,
            indices,
            aabb: Aabb::new(center - h, center + h),
        }
    }

    /// World-space bounding box.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Iterates the triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.indices.iter().map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Casts a ray against the mesh and returns the nearest hit.
    #[must_use]
    pub fn raycast(&self, origin: &Point3, direction: &Vector3) -> Option<RayTriangleHit> {
        let mut nearest: Option<RayTriangleHit> = None;
        for [a, b, c] in self.triangles() {
            if let Some(hit) = ray_triangle_intersect(origin, direction, &a, &b, &c) {
                if nearest.is_none_or(|best| hit.t < best.t) {
                    nearest = Some(hit);
                }
            }
        }
        nearest
    }
}
