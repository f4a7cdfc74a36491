use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::FRAC_PI_2;

use spade::handles::{FixedFaceHandle, FixedVertexHandle};
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{Result, SolidError};
use crate::geometry::Shape;
use crate::math::polygon_2d::outward_ring_normals;
use crate::math::{Point2, Point3, Vector2, TOLERANCE};
use crate::scene::{SceneStore, SolidData, SolidId};

/// Parameters controlling extrusion quality.
#[derive(Debug, Clone, Copy)]
pub struct ExtrudeSettings {
    /// Extrusion depth along +Z.
    pub depth: f64,
    /// Number of quad rows along the side walls.
    pub steps: u32,
    /// Rounded-edge profile applied at both caps, off by default.
    pub bevel: Option<BevelParams>,
}

impl ExtrudeSettings {
    /// Derives wall quality from the conversion precision.
    #[must_use]
    pub fn from_precision(depth: f64, precision: u32) -> Self {
        Self {
            depth,
            steps: precision.div_ceil(30).max(2),
            bevel: None,
        }
    }

    /// Enables the rounded-edge profile, sized for the same precision.
    #[must_use]
    pub fn with_bevel(mut self, precision: u32) -> Self {
        self.bevel = Some(BevelParams::from_precision(precision));
        self
    }
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self::from_precision(10.0, 50)
    }
}

/// Quarter-round profile bridging each cap to the side walls.
///
/// The profile reaches `thickness` beyond each cap plane and expands
/// straight wall runs by `size`, so a beveled solid is `2 * thickness`
/// taller and up to `2 * size` wider than its plain counterpart.
#[derive(Debug, Clone, Copy)]
pub struct BevelParams {
    /// How far beyond each cap plane the profile reaches.
    pub thickness: f64,
    /// Outward expansion of the side walls at their widest.
    pub size: f64,
    /// Number of rings approximating the quarter round.
    pub segments: u32,
}

impl BevelParams {
    /// Derives the ring count from the conversion precision.
    #[must_use]
    pub fn from_precision(precision: u32) -> Self {
        Self {
            thickness: 0.1,
            size: 0.1,
            segments: precision.div_ceil(12).max(4),
        }
    }
}

impl Default for BevelParams {
    fn default() -> Self {
        Self::from_precision(50)
    }
}

/// Extrudes a classified shape into a closed solid mesh.
///
/// Both caps are triangulated with a constrained Delaunay triangulation
/// over the outer ring and every hole ring, keeping odd-depth faces of
/// the even-odd flood fill. Side walls connect consecutive boundary
/// rings; cap triangles reuse the boundary ring vertices, so a
/// successful extrusion is watertight.
pub struct ExtrudeShape {
    shape: Shape,
    settings: ExtrudeSettings,
}

impl ExtrudeShape {
    /// Creates a new `ExtrudeShape` operation.
    #[must_use]
    pub fn new(shape: Shape, settings: ExtrudeSettings) -> Self {
        Self { shape, settings }
    }

    /// Executes the extrusion, creating the solid in the scene store.
    ///
    /// # Errors
    ///
    /// Returns [`SolidError::Degenerate`] for a non-positive depth,
    /// [`SolidError::Triangulation`] if cap triangulation fails, and
    /// [`SolidError::EmptyMesh`] if assembly produced no triangles.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, store: &mut SceneStore) -> Result<SolidId> {
        if self.settings.depth <= TOLERANCE {
            return Err(SolidError::Degenerate(format!(
                "extrusion depth {} is not positive",
                self.settings.depth
            ))
            .into());
        }

        // Rings in material convention: outer counter-clockwise, holes
        // clockwise. Shape construction already enforced the windings.
        let mut loops: Vec<&[Point2]> = vec![self.shape.outer().points()];
        for hole in self.shape.holes() {
            loops.push(hole.points());
        }

        // One shared 2D triangulation serves both caps.
        let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
        let mut loop_handles = Vec::with_capacity(loops.len());
        for ring in &loops {
            let points_2d: Vec<SpadePoint2<f64>> =
                ring.iter().map(|p| SpadePoint2::new(p.x, p.y)).collect();
            loop_handles.push(insert_constraint_loop(&mut cdt, &points_2d)?);
        }

        let interior_faces = classify_interior_faces(&cdt);
        if interior_faces.is_empty() {
            return Err(
                SolidError::Triangulation("no triangle lies inside the shape".into()).into(),
            );
        }

        let ring_normals: Vec<Vec<Vector2>> = loops
            .iter()
            .map(|ring| outward_ring_normals(ring))
            .collect();

        // Vertex rings from the bottom cap boundary to the top cap
        // boundary; rings[r][l][i] is the buffer index of vertex i of
        // loop l on profile ring r.
        let profile = self.profile();
        let mut positions: Vec<Point3> = Vec::new();
        let mut indices: Vec<[u32; 3]> = Vec::new();
        let mut rings: Vec<Vec<Vec<u32>>> = Vec::with_capacity(profile.len());

        for &(expand, z) in &profile {
            let mut ring_ids = Vec::with_capacity(loops.len());
            for (ring, normals) in loops.iter().zip(&ring_normals) {
                let mut ids = Vec::with_capacity(ring.len());
                for (p, n) in ring.iter().zip(normals) {
                    ids.push(positions.len() as u32);
                    positions.push(Point3::new(p.x + n.x * expand, p.y + n.y * expand, z));
                }
                ring_ids.push(ids);
            }
            rings.push(ring_ids);
        }

        for pair in rings.windows(2) {
            stitch_rings(&mut indices, &pair[0], &pair[1]);
        }

        // Weld the caps onto the first and last rings.
        let bottom_map = handle_index_map(&loop_handles, &rings[0]);
        let top_map = handle_index_map(&loop_handles, &rings[rings.len() - 1]);

        for face in cdt.inner_faces() {
            if !interior_faces.contains(&face.fix().index()) {
                continue;
            }
            let verts = face.vertices();
            let handles = [
                verts[0].fix().index(),
                verts[1].fix().index(),
                verts[2].fix().index(),
            ];
            let tri = cap_triangle(&handles, &bottom_map)?;
            // The triangulation is counter-clockwise; the bottom cap faces -Z.
            indices.push([tri[0], tri[2], tri[1]]);
            indices.push(cap_triangle(&handles, &top_map)?);
        }

        if indices.is_empty() {
            return Err(SolidError::EmptyMesh.into());
        }

        Ok(store.add_solid(SolidData::new(positions, indices)))
    }

    /// Ring profile from the bottom cap boundary to the top cap
    /// boundary, as `(outward expansion, z)` pairs.
    fn profile(&self) -> Vec<(f64, f64)> {
        let depth = self.settings.depth;
        let steps = self.settings.steps.max(1);
        let mut rings = Vec::new();

        match self.settings.bevel {
            Some(bevel) => {
                let segments = bevel.segments.max(1);
                // Out and up from the bottom cap to the wall foot; the cap
                // ring itself stays on the unexpanded contour.
                for j in 0..segments {
                    let t = f64::from(j) / f64::from(segments);
                    rings.push((
                        bevel.size * (t * FRAC_PI_2).sin(),
                        -bevel.thickness * (t * FRAC_PI_2).cos(),
                    ));
                }
                // Wall rows run between the cap planes at full expansion.
                for k in 0..=steps {
                    rings.push((bevel.size, depth * f64::from(k) / f64::from(steps)));
                }
                // In and up from the wall top to the top cap.
                for j in (0..segments).rev() {
                    let t = f64::from(j) / f64::from(segments);
                    rings.push((
                        bevel.size * (t * FRAC_PI_2).sin(),
                        depth + bevel.thickness * (t * FRAC_PI_2).cos(),
                    ));
                }
            }
            None => {
                for k in 0..=steps {
                    rings.push((0.0, depth * f64::from(k) / f64::from(steps)));
                }
            }
        }
        rings
    }
}

/// Connects two consecutive rings with outward-facing quads.
///
/// The quad orientation assumes rings are visited along the outward
/// surface walk (bottom cap boundary toward top cap boundary), which
/// keeps walls, flares, and hole tunnels facing out of the material.
fn stitch_rings(indices: &mut Vec<[u32; 3]>, from: &[Vec<u32>], to: &[Vec<u32>]) {
    for (a, b) in from.iter().zip(to) {
        let n = a.len();
        for i in 0..n {
            let j = (i + 1) % n;
            indices.push([a[i], a[j], b[j]]);
            indices.push([a[i], b[j], b[i]]);
        }
    }
}

/// Maps CDT vertex handles to the buffer indices of one boundary ring.
fn handle_index_map(
    loop_handles: &[Vec<FixedVertexHandle>],
    ring: &[Vec<u32>],
) -> HashMap<usize, u32> {
    let mut map = HashMap::new();
    for (handles, ids) in loop_handles.iter().zip(ring) {
        for (handle, &id) in handles.iter().zip(ids) {
            map.entry(handle.index()).or_insert(id);
        }
    }
    map
}

/// Resolves one CDT face to mesh indices through the boundary ring map.
fn cap_triangle(handles: &[usize; 3], map: &HashMap<usize, u32>) -> Result<[u32; 3]> {
    let mut tri = [0u32; 3];
    for (slot, handle) in handles.iter().enumerate() {
        tri[slot] = map.get(handle).copied().ok_or_else(|| {
            SolidError::Triangulation("cap vertex not on any constraint loop".into())
        })?;
    }
    Ok(tri)
}

/// Inserts a closed polygon as constraint edges into the CDT.
fn insert_constraint_loop(
    cdt: &mut ConstrainedDelaunayTriangulation<SpadePoint2<f64>>,
    points: &[SpadePoint2<f64>],
) -> Result<Vec<FixedVertexHandle>> {
    if points.len() < 3 {
        return Err(
            SolidError::Triangulation("constraint loop needs at least 3 points".into()).into(),
        );
    }

    let mut handles = Vec::with_capacity(points.len());
    for &pt in points {
        let h = cdt
            .insert(pt)
            .map_err(|e: InsertionError| SolidError::Triangulation(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(
                SolidError::Triangulation("constraint edges intersect".into()).into(),
            );
        }
        cdt.add_constraint(from, to);
    }

    Ok(handles)
}

/// Classifies which inner faces of the CDT are inside the shape using flood-fill.
///
/// Starts from faces adjacent to the outer (infinite) face at depth 0. Each time
/// a constraint edge is crossed, depth increments. Odd depth = interior.
fn classify_interior_faces(
    cdt: &ConstrainedDelaunayTriangulation<SpadePoint2<f64>>,
) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depths: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<spade::handles::InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    // Seed: inner faces adjacent to the outer face via directed edges
    for edge in cdt.directed_edges() {
        if edge.face().fix() == outer_fix {
            let rev_face = edge.rev().face();
            if let Some(inner) = rev_face.as_inner() {
                let idx = inner.fix().index();
                if depths.contains_key(&idx) {
                    continue;
                }
                let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                depths.insert(idx, depth);
                if depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((inner.fix(), depth));
            }
        }
    }

    // BFS flood-fill
    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let neighbor = edge.rev().face();
            if let Some(inner_neighbor) = neighbor.as_inner() {
                let n_idx = inner_neighbor.fix().index();
                if depths.contains_key(&n_idx) {
                    continue;
                }
                let new_depth = if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                    depth + 1
                } else {
                    depth
                };
                depths.insert(n_idx, new_depth);
                if new_depth % 2 == 1 {
                    interior.insert(n_idx);
                }
                queue.push_back((inner_neighbor.fix(), new_depth));
            }
        }
    }

    interior
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Contour;
    use approx::assert_relative_eq;

    fn square_ring(origin: f64, side: f64) -> Vec<Point2> {
        vec![
            Point2::new(origin, origin),
            Point2::new(origin + side, origin),
            Point2::new(origin + side, origin + side),
            Point2::new(origin, origin + side),
        ]
    }

    fn square_shape(side: f64) -> Shape {
        Shape::new(Contour::new(square_ring(0.0, side)).unwrap(), vec![])
    }

    fn settings(depth: f64) -> ExtrudeSettings {
        ExtrudeSettings::from_precision(depth, 50)
    }

    // ── Plain prisms ───────────────────────────────────────────

    #[test]
    fn square_prism_is_watertight() {
        let mut store = SceneStore::new();
        let id = ExtrudeShape::new(square_shape(10.0), settings(5.0))
            .execute(&mut store)
            .unwrap();

        let solid = store.solid(id).unwrap();
        let census = solid.edge_census();
        assert_eq!(census.boundary, 0, "prism has cracked edges");
        // 2 cap triangles per cap + 4 edges * 2 wall rows * 2 triangles
        assert_eq!(solid.triangle_count(), 20);
    }

    #[test]
    fn square_prism_volume_matches_box() {
        let mut store = SceneStore::new();
        let id = ExtrudeShape::new(square_shape(10.0), settings(5.0))
            .execute(&mut store)
            .unwrap();

        let solid = store.solid(id).unwrap();
        assert_relative_eq!(solid.volume(), 500.0, epsilon = 1e-6);
        let aabb = solid.aabb().unwrap();
        assert_relative_eq!(aabb.min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.max.z, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn triangle_prism_volume_is_base_times_depth() {
        let outer = Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 3.0),
        ])
        .unwrap();
        let mut store = SceneStore::new();
        let id = ExtrudeShape::new(Shape::new(outer, vec![]), settings(2.0))
            .execute(&mut store)
            .unwrap();

        let solid = store.solid(id).unwrap();
        assert_relative_eq!(solid.volume(), 12.0, epsilon = 1e-6);
    }

    #[test]
    fn prism_normals_are_unit_and_outward() {
        let mut store = SceneStore::new();
        let id = ExtrudeShape::new(square_shape(2.0), settings(2.0))
            .execute(&mut store)
            .unwrap();

        let solid = store.solid(id).unwrap();
        let center = Point3::new(1.0, 1.0, 1.0);
        for (position, normal) in solid.positions.iter().zip(&solid.normals) {
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-9);
            assert!(
                normal.dot(&(position - center)) > 0.0,
                "normal {normal:?} at {position:?} points inward"
            );
        }
    }

    // ── Holes ──────────────────────────────────────────────────

    #[test]
    fn hole_reduces_volume_and_stays_watertight() {
        let outer = Contour::new(square_ring(0.0, 10.0)).unwrap();
        let hole = Contour::new(square_ring(3.0, 4.0)).unwrap();
        let shape = Shape::new(outer, vec![hole]);

        let mut store = SceneStore::new();
        let id = ExtrudeShape::new(shape, settings(5.0))
            .execute(&mut store)
            .unwrap();

        let solid = store.solid(id).unwrap();
        assert_relative_eq!(solid.volume(), (100.0 - 16.0) * 5.0, epsilon = 1e-6);
        assert_eq!(solid.edge_census().boundary, 0);
    }

    // ── Bevel ──────────────────────────────────────────────────

    #[test]
    fn bevel_expands_bounds_beyond_both_caps() {
        let mut store = SceneStore::new();
        let id = ExtrudeShape::new(square_shape(10.0), settings(5.0).with_bevel(50))
            .execute(&mut store)
            .unwrap();

        let solid = store.solid(id).unwrap();
        let aabb = solid.aabb().unwrap();
        assert_relative_eq!(aabb.min.z, -0.1, epsilon = 1e-9);
        assert_relative_eq!(aabb.max.z, 5.1, epsilon = 1e-9);
        // Corners expand along unit vertex normals, so a square corner
        // reaches size / sqrt(2) per axis rather than the full size.
        let corner_reach = 0.1 * std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(aabb.min.x, -corner_reach, epsilon = 1e-9);
        assert_relative_eq!(aabb.max.x, 10.0 + corner_reach, epsilon = 1e-9);
    }

    #[test]
    fn bevel_stays_watertight_and_adds_volume() {
        let mut store = SceneStore::new();
        let plain = ExtrudeShape::new(square_shape(10.0), settings(5.0))
            .execute(&mut store)
            .unwrap();
        let beveled = ExtrudeShape::new(square_shape(10.0), settings(5.0).with_bevel(50))
            .execute(&mut store)
            .unwrap();

        let plain_volume = store.solid(plain).unwrap().volume();
        let beveled_solid = store.solid(beveled).unwrap();
        assert_eq!(beveled_solid.edge_census().boundary, 0);
        assert!(
            beveled_solid.volume() > plain_volume,
            "flared walls must enclose more than {plain_volume}"
        );
    }

    #[test]
    fn bevel_caps_sit_on_the_unexpanded_contour() {
        let mut store = SceneStore::new();
        let id = ExtrudeShape::new(square_shape(10.0), settings(5.0).with_bevel(50))
            .execute(&mut store)
            .unwrap();

        let solid = store.solid(id).unwrap();
        let corner_reach = 0.1 * std::f64::consts::FRAC_1_SQRT_2;
        for p in &solid.positions {
            // The extreme layers carry the caps on the original footprint.
            if p.z < -0.1 + 1e-9 || p.z > 5.1 - 1e-9 {
                assert!(
                    p.x > -1e-9 && p.x < 10.0 + 1e-9 && p.y > -1e-9 && p.y < 10.0 + 1e-9,
                    "cap vertex {p:?} escaped the footprint"
                );
            }
            // Full expansion occurs only between the cap planes.
            if p.x > 10.0 + corner_reach - 1e-9 {
                assert!(
                    p.z > -1e-9 && p.z < 5.0 + 1e-9,
                    "widest vertex {p:?} lies beyond a cap plane"
                );
            }
        }
    }

    // ── Error cases ────────────────────────────────────────────

    #[test]
    fn non_positive_depth_is_rejected() {
        let mut store = SceneStore::new();
        let result = ExtrudeShape::new(square_shape(1.0), settings(0.0)).execute(&mut store);
        match result {
            Err(crate::error::DecalisError::Solid(SolidError::Degenerate(_))) => {}
            other => panic!("expected Degenerate, got {other:?}"),
        }
    }

    #[test]
    fn zero_steps_still_produces_a_closed_solid() {
        let mut settings = settings(3.0);
        settings.steps = 0;
        let mut store = SceneStore::new();
        let id = ExtrudeShape::new(square_shape(4.0), settings)
            .execute(&mut store)
            .unwrap();

        let solid = store.solid(id).unwrap();
        assert_eq!(solid.edge_census().boundary, 0);
        assert_relative_eq!(solid.volume(), 48.0, epsilon = 1e-6);
    }
}
