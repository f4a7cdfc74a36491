use crate::error::{PlacementError, Result};
use crate::math::aabb_3d::Aabb;
use crate::math::{Matrix4, Vector3, TOLERANCE};
use crate::scene::{GroupId, SceneStore};

/// Rescales a group's extrusion depth to a requested value.
///
/// The Z scale is derived from the currently measured depth and applied
/// around the group bounding-box center, so planar placement is preserved
/// and repeating the operation with the same target depth is a no-op.
pub struct AdjustDepth {
    group: GroupId,
    depth: f64,
}

impl AdjustDepth {
    /// Creates a new `AdjustDepth` operation.
    #[must_use]
    pub fn new(group: GroupId, depth: f64) -> Self {
        Self { group, depth }
    }

    /// Executes the depth adjustment, updating the group transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested depth is not positive, if the
    /// group's current depth is zero (flat geometry cannot be rescaled), or
    /// if the group or one of its solids is not in the store.
    pub fn execute(&self, store: &mut SceneStore) -> Result<()> {
        if self.depth <= 0.0 {
            return Err(PlacementError::InvalidInput(format!(
                "requested depth {} is not positive",
                self.depth
            ))
            .into());
        }

        let group = store.group(self.group)?;
        let mut bounds: Option<Aabb> = None;
        for &solid_id in &group.solids {
            let solid = store.solid(solid_id)?;
            if let Some(solid_bounds) = solid.aabb_transformed(&group.transform) {
                bounds = Some(match bounds {
                    Some(merged) => merged.merged(&solid_bounds),
                    None => solid_bounds,
                });
            }
        }
        let Some(bounds) = bounds else {
            return Err(PlacementError::InvalidInput("group has no geometry".into()).into());
        };

        let current = bounds.size().z;
        if current <= TOLERANCE {
            return Err(PlacementError::ZeroDimension { axis: "z" }.into());
        }

        let ratio = self.depth / current;
        let center = bounds.center();
        let adjust = Matrix4::new_translation(&center.coords)
            * Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, ratio))
            * Matrix4::new_translation(&(-center.coords));

        let group = store.group_mut(self.group)?;
        group.transform = adjust * group.transform;
        Ok(())
    }
}
