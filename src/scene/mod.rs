pub mod group;
pub mod solid;
pub mod target;

pub use group::{ArtworkKey, GroupData, GroupId};
pub use solid::{EdgeCensus, SolidData, SolidId};
pub use target::TargetMesh;

use crate::error::SceneError;
use slotmap::SlotMap;

/// Central arena that owns all scene entities.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation.
#[derive(Debug, Default)]
pub struct SceneStore {
    solids: SlotMap<SolidId, SolidData>,
    groups: SlotMap<GroupId, GroupData>,
}

impl SceneStore {
    /// Creates a new, empty scene store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Solid operations ---

    /// Inserts a solid and returns its ID.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, SceneError> {
        self.solids
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound("solid".into()))
    }

    /// Returns a mutable reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid_mut(&mut self, id: SolidId) -> Result<&mut SolidData, SceneError> {
        self.solids
            .get_mut(id)
            .ok_or_else(|| SceneError::EntityNotFound("solid".into()))
    }

    // --- Group operations ---

    /// Inserts a group and returns its ID.
    pub fn add_group(&mut self, data: GroupData) -> GroupId {
        self.groups.insert(data)
    }

    /// Returns a reference to the group data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn group(&self, id: GroupId) -> Result<&GroupData, SceneError> {
        self.groups
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound("group".into()))
    }

    /// Returns a mutable reference to the group data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn group_mut(&mut self, id: GroupId) -> Result<&mut GroupData, SceneError> {
        self.groups
            .get_mut(id)
            .ok_or_else(|| SceneError::EntityNotFound("group".into()))
    }

    /// Removes a group and every solid it owns.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn remove_group(&mut self, id: GroupId) -> Result<(), SceneError> {
        let data = self
            .groups
            .remove(id)
            .ok_or_else(|| SceneError::EntityNotFound("group".into()))?;
        for solid in data.solids {
            self.solids.remove(solid);
        }
        Ok(())
    }

    /// Number of solids currently stored.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    /// Number of groups currently stored.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn triangle_solid() -> SolidData {
        SolidData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn add_and_fetch_solid() {
        let mut store = SceneStore::new();
        let id = store.add_solid(triangle_solid());
        assert_eq!(store.solid(id).unwrap().triangle_count(), 1);
        store.solid_mut(id).unwrap().recompute_normals();
    }

    #[test]
    fn stale_solid_id_is_an_error() {
        let mut store = SceneStore::new();
        let id = store.add_solid(triangle_solid());
        let group = store.add_group(GroupData::new(ArtworkKey::from_name("a")));
        store.group_mut(group).unwrap().solids.push(id);
        store.remove_group(group).unwrap();

        match store.solid(id) {
            Err(SceneError::EntityNotFound(kind)) => assert_eq!(kind, "solid"),
            other => panic!("expected EntityNotFound, got {other:?}"),
        }
    }

    #[test]
    fn remove_group_disposes_owned_solids() {
        let mut store = SceneStore::new();
        let first = store.add_solid(triangle_solid());
        let second = store.add_solid(triangle_solid());
        let kept = store.add_solid(triangle_solid());

        let mut data = GroupData::new(ArtworkKey::from_name("a"));
        data.solids = vec![first, second];
        let group = store.add_group(data);

        store.remove_group(group).unwrap();
        assert_eq!(store.solid_count(), 1);
        assert_eq!(store.group_count(), 0);
        assert!(store.solid(kept).is_ok());
        assert!(store.group(group).is_err());
    }

    #[test]
    fn removing_missing_group_fails() {
        let mut store = SceneStore::new();
        let group = store.add_group(GroupData::new(ArtworkKey::from_name("a")));
        store.remove_group(group).unwrap();
        assert!(store.remove_group(group).is_err());
    }
}
