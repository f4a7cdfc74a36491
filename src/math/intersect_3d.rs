use super::{Point3, Vector3, TOLERANCE};

/// A ray/triangle intersection.
#[derive(Debug, Clone, Copy)]
pub struct RayTriangleHit {
    /// Ray parameter at the hit (`point = origin + dir * t`).
    pub t: f64,
    /// Hit point.
    pub point: Point3,
    /// Unit normal of the triangle, from its vertex winding.
    pub normal: Vector3,
}

/// Intersects a ray `origin + t * dir` with triangle `(a, b, c)`.
///
/// Möller–Trumbore, without backface culling: target meshes arrive with
/// arbitrary winding and rays may start inside them. Hits at `t <= TOLERANCE`
/// (behind or on the origin) are rejected.
#[must_use]
pub fn ray_triangle_intersect(
    origin: &Point3,
    dir: &Vector3,
    a: &Point3,
    b: &Point3,
    c: &Point3,
) -> Option<RayTriangleHit> {
    let e1 = b - a;
    let e2 = c - a;

    let pvec = dir.cross(&e2);
    let det = e1.dot(&pvec);
    if det.abs() < TOLERANCE {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = origin - a;
    let u = tvec.dot(&pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(&e1);
    let v = dir.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(&qvec) * inv_det;
    if t <= TOLERANCE {
        return None;
    }

    let normal = e1.cross(&e2);
    let len = normal.norm();
    if len < TOLERANCE {
        return None;
    }

    Some(RayTriangleHit {
        t,
        point: origin + dir * t,
        normal: normal / len,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    #[test]
    fn ray_hits_triangle_center() {
        let hit = ray_triangle_intersect(
            &p(0.25, 0.25, 5.0),
            &v(0.0, 0.0, -1.0),
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((hit.t - 5.0).abs() < TOLERANCE);
        assert!((hit.point.z).abs() < TOLERANCE);
        assert!((hit.normal.z - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn ray_misses_outside_triangle() {
        let hit = ray_triangle_intersect(
            &p(2.0, 2.0, 5.0),
            &v(0.0, 0.0, -1.0),
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn ray_parallel_to_triangle_misses() {
        let hit = ray_triangle_intersect(
            &p(0.0, 0.0, 5.0),
            &v(1.0, 0.0, 0.0),
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn hit_behind_origin_rejected() {
        let hit = ray_triangle_intersect(
            &p(0.25, 0.25, -5.0),
            &v(0.0, 0.0, -1.0),
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn backface_hit_accepted() {
        // same triangle, ray from below: hits the winding's back side
        let hit = ray_triangle_intersect(
            &p(0.25, 0.25, -5.0),
            &v(0.0, 0.0, 1.0),
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((hit.t - 5.0).abs() < TOLERANCE);
        // normal still reports the winding side
        assert!((hit.normal.z - 1.0).abs() < TOLERANCE);
    }
}
