use crate::error::{PlacementError, Result};
use crate::math::aabb_3d::Aabb;
use crate::math::{transform_point, Matrix4, Vector3, TOLERANCE};
use crate::placement::{DecalPose, DecalSize};
use crate::scene::{GroupId, SceneStore};

/// Places a full 3D artwork group at a projected decal pose.
///
/// The group is scaled so its footprint matches the decal (the smaller of
/// the width and height ratios, keeping the artwork aspect), its depth is
/// scaled to the decal depth, and it is rotated into the pose frame with
/// its center on the pose point. The transform is rebuilt from the
/// canonical untransformed geometry on every call.
pub struct AlignToPose {
    group: GroupId,
    pose: DecalPose,
    size: DecalSize,
}

impl AlignToPose {
    /// Creates a new `AlignToPose` operation.
    #[must_use]
    pub fn new(group: GroupId, pose: DecalPose, size: DecalSize) -> Self {
        Self { group, pose, size }
    }

    /// Executes the alignment, replacing the group transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the group has no geometry, if its canonical
    /// bounding box has zero extent on any axis, or if the group or one of
    /// its solids is not in the store.
    pub fn execute(&self, store: &mut SceneStore) -> Result<()> {
        let group = store.group(self.group)?;
        let mut bounds: Option<Aabb> = None;
        for &solid_id in &group.solids {
            let solid = store.solid(solid_id)?;
            if let Some(solid_bounds) = solid.aabb() {
                bounds = Some(match bounds {
                    Some(merged) => merged.merged(&solid_bounds),
                    None => solid_bounds,
                });
            }
        }
        let Some(bounds) = bounds else {
            return Err(PlacementError::InvalidInput("group has no geometry".into()).into());
        };

        let extent = bounds.size();
        for (axis, value) in [("x", extent.x), ("y", extent.y), ("z", extent.z)] {
            if value <= TOLERANCE {
                return Err(PlacementError::ZeroDimension { axis }.into());
            }
        }

        let planar = (self.size.width / extent.x).min(self.size.height / extent.y);
        let depth = self.size.depth / extent.z;

        let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(planar, planar, depth));
        let scaled_center = transform_point(&scale, &bounds.center());
        let transform = Matrix4::new_translation(&self.pose.point().coords)
            * self.pose.rotation()
            * Matrix4::new_translation(&(-scaled_center.coords))
            * scale;

        store.group_mut(self.group)?.transform = transform;
        Ok(())
    }
}
