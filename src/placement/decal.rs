use crate::math::Point3;
use crate::scene::{SolidData, TargetMesh};

use super::pose::{DecalPose, DecalSize};

/// Lift applied along the surface normal before clipping, keeping the decal
/// clear of the surface it was cut from.
const SURFACE_OFFSET: f64 = 0.1;

/// Cuts a decal out of the target surface with an oriented-box clip.
///
/// Every target triangle is mapped into the pose frame and clipped against
/// the six half-spaces of the box spanned by the decal size around the
/// offset pose point (Sutherland-Hodgman). Clipped polygons are fanned into
/// triangles and emitted in world space.
pub struct BuildDecal {
    pose: DecalPose,
    size: DecalSize,
}

impl BuildDecal {
    /// Creates a new `BuildDecal` operation.
    #[must_use]
    pub fn new(pose: DecalPose, size: DecalSize) -> Self {
        Self { pose, size }
    }

    /// Executes the clip, producing the decal mesh in world space.
    ///
    /// The result is empty when the clip box misses the surface entirely.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, target: &TargetMesh) -> SolidData {
        let pose = self.pose.offset_along_normal(SURFACE_OFFSET);
        let half = self.size.half_extents();

        let mut positions = Vec::new();
        let mut indices = Vec::new();
        let mut polygon: Vec<Point3> = Vec::with_capacity(8);
        let mut scratch: Vec<Point3> = Vec::with_capacity(8);

        for triangle in target.triangles() {
            polygon.clear();
            polygon.extend(triangle.iter().map(|p| pose.to_local(p)));

            for axis in 0..3 {
                clip_axis(&mut polygon, &mut scratch, axis, half[axis], 1.0);
                clip_axis(&mut polygon, &mut scratch, axis, half[axis], -1.0);
            }
            if polygon.len() < 3 {
                continue;
            }

            let base = positions.len() as u32;
            positions.extend(polygon.iter().map(|p| pose.to_world(p)));
            for i in 1..polygon.len() - 1 {
                indices.push([base, base + i as u32, base + i as u32 + 1]);
            }
        }

        SolidData::new(positions, indices)
    }
}

/// Clips the polygon against one face of the box, `sign * p[axis] <= limit`.
fn clip_axis(
    polygon: &mut Vec<Point3>,
    scratch: &mut Vec<Point3>,
    axis: usize,
    limit: f64,
    sign: f64,
) {
    scratch.clear();
    for i in 0..polygon.len() {
        let current = polygon[i];
        let next = polygon[(i + 1) % polygon.len()];
        let d_current = limit - sign * current[axis];
        let d_next = limit - sign * next[axis];

        if d_current >= 0.0 {
            scratch.push(current);
            if d_next < 0.0 {
                scratch.push(cross_point(&current, &next, d_current, d_next));
            }
        } else if d_next >= 0.0 {
            scratch.push(cross_point(&current, &next, d_current, d_next));
        }
    }
    std::mem::swap(polygon, scratch);
}

/// Point where the edge crosses the clip plane.
fn cross_point(from: &Point3, to: &Point3, d_from: f64, d_to: f64) -> Point3 {
    let t = d_from / (d_from - d_to);
    from + (to - from) * t
}
