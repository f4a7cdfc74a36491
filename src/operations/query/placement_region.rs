use crate::math::aabb_3d::Aabb;
use crate::math::Vector3;
use crate::scene::TargetMesh;

/// Computes the region of a target mesh that placements may occupy.
///
/// Each axis of the target bounding box is rescaled independently around its
/// center: width and height shrink to 75% so decals keep clear of the rim,
/// depth grows to 110% so hits on bulging faces still count as inside. The
/// region is recomputed on every call, never cached.
pub struct PlacementRegion {
    factors: Vector3,
}

impl Default for PlacementRegion {
    fn default() -> Self {
        Self {
            factors: Vector3::new(0.75, 0.75, 1.1),
        }
    }
}

impl PlacementRegion {
    /// Creates the query with the standard per-axis factors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes the query against a target mesh.
    #[must_use]
    pub fn execute(&self, target: &TargetMesh) -> Aabb {
        target.aabb().scaled_around_center(self.factors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Point3;

    #[test]
    fn shrinks_planar_axes_and_grows_depth() {
        let target = TargetMesh::cuboid(Point3::new(1.0, 2.0, 3.0), Vector3::new(20.0, 10.0, 4.0));
        let region = PlacementRegion::new().execute(&target);

        let size = region.size();
        assert_relative_eq!(size.x, 15.0);
        assert_relative_eq!(size.y, 7.5);
        assert_relative_eq!(size.z, 4.4);

        let center = region.center();
        assert_relative_eq!(center.x, 1.0);
        assert_relative_eq!(center.y, 2.0);
        assert_relative_eq!(center.z, 3.0);
    }
}
