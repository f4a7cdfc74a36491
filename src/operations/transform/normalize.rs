use crate::error::Result;
use crate::math::aabb_3d::Aabb;
use crate::math::{transform_point, Matrix4, Vector3, TOLERANCE};
use crate::scene::{GroupId, SceneStore};

/// Scales a group to a target footprint size and centers it at the origin.
///
/// The transform is rebuilt from the group's untransformed geometry on every
/// call, so repeated conversions and mirror toggles never compound.
pub struct NormalizeGroup {
    group: GroupId,
    size: f64,
    mirror: bool,
}

impl NormalizeGroup {
    /// Creates a new `NormalizeGroup` operation.
    #[must_use]
    pub fn new(group: GroupId, size: f64) -> Self {
        Self {
            group,
            size,
            mirror: false,
        }
    }

    /// Mirrors the group across the YZ plane as part of the same transform.
    #[must_use]
    pub fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Executes the normalization, replacing the group transform.
    ///
    /// The scale is uniform: the larger planar dimension of the canonical
    /// bounding box is brought to the target size, then the scaled center is
    /// translated to the origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the group or one of its solids is not in the
    /// store.
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
            tracing::warn!("normalizing a group without geometry, keeping identity");
            store.group_mut(self.group)?.transform = Matrix4::identity();
            return Ok(());
        };

        let extent = bounds.size();
        let max_planar = extent.x.max(extent.y);
        let factor = if max_planar > TOLERANCE {
            self.size / max_planar
        } else {
            tracing::warn!("degenerate planar extent {max_planar}, scaling by 1");
            1.0
        };

        let x_factor = if self.mirror { -factor } else { factor };
        let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(x_factor, factor, factor));
        let scaled_center = transform_point(&scale, &bounds.center());
        let transform = Matrix4::new_translation(&(-scaled_center.coords)) * scale;

        store.group_mut(self.group)?.transform = transform;
        Ok(())
    }
}
