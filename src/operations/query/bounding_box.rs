use crate::error::Result;
use crate::math::aabb_3d::Aabb;
use crate::scene::{GroupId, SceneStore};

/// Computes the world-space bounding box of a group.
pub struct GroupBounds {
    group: GroupId,
}

impl GroupBounds {
    /// Creates a new `GroupBounds` operation.
    #[must_use]
    pub fn new(group: GroupId) -> Self {
        Self { group }
    }

    /// Executes the query, merging the bounds of every solid in the group
    /// after applying the group transform.
    ///
    /// Returns `None` when the group owns no solids or all of them are
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the group or one of its solids is not in the
    /// store.
    pub fn execute(&self, store: &SceneStore) -> Result<Option<Aabb>> {
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
        Ok(bounds)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::{Matrix4, Point3, Vector3};
    use crate::scene::{ArtworkKey, GroupData, SolidData};

    fn quad(z: f64) -> SolidData {
        let positions = vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(2.0, 0.0, z),
            Point3::new(2.0, 1.0, z),
            Point3::new(0.0, 1.0, z),
        ];
        SolidData::new(positions, vec![[0, 1, 2], [0, 2, 3]])
    }

    #[test]
    fn merges_solids_under_the_group_transform() {
        let mut store = SceneStore::new();
        let a = store.add_solid(quad(0.0));
        let b = store.add_solid(quad(3.0));

        let mut group = GroupData::new(ArtworkKey::from_name("bounds"));
        group.solids = vec![a, b];
        group.transform = Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0));
        let group_id = store.add_group(group);

        let bounds = GroupBounds::new(group_id).execute(&store).unwrap().unwrap();
        assert_relative_eq!(bounds.min.x, 10.0);
        assert_relative_eq!(bounds.max.x, 12.0);
        assert_relative_eq!(bounds.min.z, 0.0);
        assert_relative_eq!(bounds.max.z, 3.0);
    }

    #[test]
    fn empty_group_has_no_bounds() {
        let mut store = SceneStore::new();
        let group_id = store.add_group(GroupData::new(ArtworkKey::from_name("empty")));

        let bounds = GroupBounds::new(group_id).execute(&store).unwrap();
        assert!(bounds.is_none());
    }
}
