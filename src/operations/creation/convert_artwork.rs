use crate::error::{GeometryError, Result};
use crate::geometry::{build_shapes, sample_contour, split_contours, Contour, SamplerSettings};
use crate::operations::shaping::{ExtrudeSettings, ExtrudeShape};
use crate::operations::transform::NormalizeGroup;
use crate::scene::{ArtworkKey, GroupData, GroupId, SceneStore};

/// Options controlling artwork conversion.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Extrusion depth along +Z, must be positive.
    pub depth: f64,
    /// Sampling and wall quality, at least 1 (typical range 1-100).
    pub precision: u32,
    /// Target footprint: the larger planar dimension after normalization.
    pub size: f64,
    /// Mirror the result across the YZ plane.
    pub mirror: bool,
    /// Display color stored on the group.
    pub color: [f32; 3],
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            depth: 10.0,
            precision: 50,
            size: 100.0,
            mirror: false,
            color: [1.0, 1.0, 1.0],
        }
    }
}

/// Converts path artwork into an extruded, normalized group of solids.
///
/// Conversion is best effort: sub-contours that fail to sample or enclose
/// no area are dropped with a warning, as are shapes the extruder rejects.
/// The operation fails only when nothing survives across all paths.
pub struct ConvertArtwork {
    name: String,
    paths: Vec<String>,
    options: ConvertOptions,
    previous: Option<GroupId>,
}

impl ConvertArtwork {
    /// Creates a new `ConvertArtwork` operation.
    #[must_use]
    pub fn new(name: &str, paths: Vec<String>, options: ConvertOptions) -> Self {
        Self {
            name: name.to_owned(),
            paths,
            options,
            previous: None,
        }
    }

    /// Removes this group before inserting the converted one, so a
    /// re-conversion never leaves stale geometry in the store.
    #[must_use]
    pub fn replacing(mut self, previous: GroupId) -> Self {
        self.previous = Some(previous);
        self
    }

    /// Executes the conversion, returning the id of the assembled group.
    ///
    /// Each path is split into sub-contours, sampled, classified into
    /// outer-and-hole shapes by containment depth, extruded, and gathered
    /// into one group. The group transform is then normalized to the target
    /// footprint size.
    ///
    /// # Errors
    ///
    /// Returns an error if the group to replace is stale or if no shape
    /// survives conversion across all input paths.
    pub fn execute(&self, store: &mut SceneStore) -> Result<GroupId> {
        if let Some(previous) = self.previous {
            store.remove_group(previous)?;
        }

        let sampler = SamplerSettings::new(self.options.precision);
        let settings = ExtrudeSettings::from_precision(self.options.depth, self.options.precision);

        let mut solids = Vec::new();
        for path in &self.paths {
            let mut contours = Vec::new();
            for sub in split_contours(path) {
                let points = match sample_contour(&sub, &sampler) {
                    Ok(points) => points,
                    Err(err) => {
                        tracing::warn!("dropping sub-contour that failed to sample: {err}");
                        continue;
                    }
                };
                match Contour::new(points) {
                    Ok(contour) => contours.push(contour),
                    Err(err) => {
                        tracing::warn!("dropping degenerate sub-contour: {err}");
                    }
                }
            }

            for shape in build_shapes(contours) {
                match ExtrudeShape::new(shape, settings).execute(store) {
                    Ok(solid) => solids.push(solid),
                    Err(err) => {
                        tracing::warn!("skipping shape that failed to extrude: {err}");
                    }
                }
            }
        }

        if solids.is_empty() {
            return Err(GeometryError::NoShapes.into());
        }

        let mut group = GroupData::new(ArtworkKey::from_name(&self.name));
        group.color = self.options.color;
        group.solids = solids;
        let group_id = store.add_group(group);

        NormalizeGroup::new(group_id, self.options.size)
            .mirrored(self.options.mirror)
            .execute(store)?;
        Ok(group_id)
    }
}
