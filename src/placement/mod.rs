mod decal;
mod fit;
mod pose;

pub use decal::BuildDecal;
pub use fit::{FindMaxScale, FitParams, ScaleCache};
pub use pose::{DecalPose, DecalSize};

use crate::error::{PlacementError, Result};
use crate::math::aabb_3d::Aabb;
use crate::math::{Point3, Vector3};
use crate::operations::query::PlacementRegion;
use crate::scene::{ArtworkKey, SolidData, TargetMesh};

/// Smallest scale a consumer may apply.
const SCALE_FLOOR: f64 = 0.3;

/// Largest tangent step that may cross the placement-region boundary.
const MOVE_ALLOWANCE: f64 = 2.0;

/// Placement lifecycle of the active artwork.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementState {
    /// No artwork selected yet.
    Unplaced,
    /// Artwork selected but not attached to the surface.
    Flat,
    /// Artwork projected onto the target surface.
    Projected {
        /// Surface hit point.
        point: Point3,
        /// Surface normal at the hit.
        normal: Vector3,
        /// Decal scale applied at this placement.
        scale: f64,
    },
}

/// World axis whose step is projected onto the surface tangent plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAxis {
    X,
    Y,
    Z,
}

impl MoveAxis {
    fn direction(self) -> Vector3 {
        match self {
            Self::X => Vector3::new(1.0, 0.0, 0.0),
            Self::Y => Vector3::new(0.0, 1.0, 0.0),
            Self::Z => Vector3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// The placement moved; carries the updated state.
    Moved(PlacementState),
    /// The move would leave the placement region by too much.
    Rejected,
}

#[derive(Debug, Clone)]
struct ActiveArtwork {
    key: ArtworkKey,
    aspect: f64,
}

/// Interactive placement of one artwork on one target mesh.
///
/// The session owns the target, the scale cache, and the placement state
/// machine (`Unplaced` until an artwork is selected, `Flat` until a
/// projection ray hits the surface, then `Projected`). Every query that
/// needs a surface point reprojects from the stored hit, never from stale
/// derived geometry.
#[derive(Debug)]
pub struct PlacementSession {
    target: TargetMesh,
    artwork: Option<ActiveArtwork>,
    state: PlacementState,
    cache: ScaleCache,
}

impl PlacementSession {
    /// Creates a session for a target mesh.
    #[must_use]
    pub fn new(target: TargetMesh) -> Self {
        Self {
            target,
            artwork: None,
            state: PlacementState::Unplaced,
            cache: ScaleCache::new(),
        }
    }

    /// The target being decorated.
    #[must_use]
    pub fn target(&self) -> &TargetMesh {
        &self.target
    }

    /// Current placement state.
    #[must_use]
    pub fn state(&self) -> PlacementState {
        self.state
    }

    /// The fit-search cache, exposed so scans stay observable.
    #[must_use]
    pub fn cache(&self) -> &ScaleCache {
        &self.cache
    }

    /// Selects the artwork to place, dropping all prior placement state.
    ///
    /// The scale cache is cleared and the state returns to `Flat`. A
    /// non-positive aspect ratio falls back to 1 with a warning.
    pub fn select_artwork(&mut self, key: ArtworkKey, aspect: f64) {
        let aspect = if aspect > 0.0 {
            aspect
        } else {
            tracing::warn!("artwork aspect {aspect} is not positive, using 1");
            1.0
        };
        self.artwork = Some(ActiveArtwork { key, aspect });
        self.cache.clear();
        self.state = PlacementState::Flat;
    }

    /// Projects the artwork onto the surface along a ray.
    ///
    /// A hit stores the surface point and normal, preserving the current
    /// scale. Returns `None` when no artwork is selected or the ray misses;
    /// a miss degrades a previous projection back to `Flat`.
    pub fn project(&mut self, origin: &Point3, direction: &Vector3) -> Option<PlacementState> {
        self.artwork.as_ref()?;
        match self.target.raycast(origin, direction) {
            Some(hit) => {
                let scale = match self.state {
                    PlacementState::Projected { scale, .. } => scale,
                    PlacementState::Unplaced | PlacementState::Flat => 1.0,
                };
                self.state = PlacementState::Projected {
                    point: hit.point,
                    normal: hit.normal,
                    scale,
                };
                Some(self.state)
            }
            None => {
                if matches!(self.state, PlacementState::Projected { .. }) {
                    tracing::debug!("projection ray missed, falling back to flat presentation");
                    self.state = PlacementState::Flat;
                }
                None
            }
        }
    }

    /// Re-derives the placement from the target bounding-box center,
    /// casting along +Z and preserving the current scale.
    ///
    /// Returns `None` without touching state when the ray misses or no
    /// artwork is selected.
    pub fn center(&mut self) -> Option<PlacementState> {
        self.artwork.as_ref()?;
        let origin = self.target.aabb().center();
        let hit = self.target.raycast(&origin, &Vector3::new(0.0, 0.0, 1.0))?;
        let scale = match self.state {
            PlacementState::Projected { scale, .. } => scale,
            PlacementState::Unplaced | PlacementState::Flat => 1.0,
        };
        self.state = PlacementState::Projected {
            point: hit.point,
            normal: hit.normal,
            scale,
        };
        Some(self.state)
    }

    /// Applies a scale, clamped to the floor, and returns the value in
    /// effect. Only a projected placement stores it.
    pub fn set_scale(&mut self, scale: f64) -> f64 {
        let applied = scale.max(SCALE_FLOOR);
        if let PlacementState::Projected { scale: current, .. } = &mut self.state {
            *current = applied;
        }
        applied
    }

    /// Finds the largest scale that keeps the decal inside the placement
    /// region, cached per artwork.
    ///
    /// # Errors
    ///
    /// Returns an error if no artwork is selected or nothing is projected.
    pub fn find_max_scale(&mut self) -> Result<f64> {
        let artwork = self
            .artwork
            .as_ref()
            .ok_or_else(|| PlacementError::InvalidInput("no artwork selected".into()))?;
        let PlacementState::Projected { point, .. } = self.state else {
            return Err(PlacementError::NotProjected.into());
        };
        Ok(FindMaxScale::new(point, artwork.aspect).execute(
            &self.target,
            &mut self.cache,
            &artwork.key,
        ))
    }

    /// Moves the placement along a world axis, projected onto the surface
    /// tangent plane.
    ///
    /// A move whose decal box leaves the placement region is still accepted
    /// when the tangent step is small; larger boundary-crossing moves are
    /// rejected and leave the state untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if no artwork is selected or nothing is projected.
    pub fn move_by(&mut self, axis: MoveAxis, delta: f64) -> Result<MoveOutcome> {
        let artwork = self
            .artwork
            .as_ref()
            .ok_or_else(|| PlacementError::InvalidInput("no artwork selected".into()))?;
        let PlacementState::Projected {
            point,
            normal,
            scale,
        } = self.state
        else {
            return Err(PlacementError::NotProjected.into());
        };

        let step = axis.direction() * delta;
        let tangent = step - normal * step.dot(&normal);
        let candidate = point + tangent;

        let half = DecalSize::derive(&self.target.aabb(), artwork.aspect, scale).half_extents();
        let test = Aabb::new(candidate - half, candidate + half);
        let region = PlacementRegion::new().execute(&self.target);
        if !region.contains_with_margin(&test, FitParams::default().tolerance) {
            let magnitude = tangent.norm();
            if magnitude > MOVE_ALLOWANCE {
                tracing::warn!("rejecting move of {magnitude:.2} units outside the placement region");
                return Ok(MoveOutcome::Rejected);
            }
            tracing::debug!("allowing small move of {magnitude:.2} units past the region edge");
        }

        self.state = PlacementState::Projected {
            point: candidate,
            normal,
            scale,
        };
        Ok(MoveOutcome::Moved(self.state))
    }

    /// The pose frame of the current projection.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is projected.
    pub fn pose(&self) -> Result<DecalPose> {
        let PlacementState::Projected { point, normal, .. } = self.state else {
            return Err(PlacementError::NotProjected.into());
        };
        Ok(DecalPose::new(point, normal))
    }

    /// Decal dimensions for the current projection and artwork.
    ///
    /// # Errors
    ///
    /// Returns an error if no artwork is selected or nothing is projected.
    pub fn decal_size(&self) -> Result<DecalSize> {
        let artwork = self
            .artwork
            .as_ref()
            .ok_or_else(|| PlacementError::InvalidInput("no artwork selected".into()))?;
        let PlacementState::Projected { scale, .. } = self.state else {
            return Err(PlacementError::NotProjected.into());
        };
        Ok(DecalSize::derive(&self.target.aabb(), artwork.aspect, scale))
    }

    /// Builds the decal mesh for the current projection.
    ///
    /// # Errors
    ///
    /// Returns an error if no artwork is selected or nothing is projected.
    pub fn build_decal(&self) -> Result<SolidData> {
        let pose = self.pose()?;
        let size = self.decal_size()?;
        Ok(BuildDecal::new(pose, size).execute(&self.target))
    }
}
