use super::{Point2, Vector2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Tests whether a point lies inside a closed polygon (even-odd crossing rule).
///
/// Points on an edge may land on either side; callers probing ring
/// containment should use interior representative points.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let t = (point.y - pi.y) / (pj.y - pi.y);
            let x = pi.x + t * (pj.x - pi.x);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Computes per-vertex normals pointing out of the enclosed material.
///
/// Assumes the ring follows the material convention (outer rings
/// counter-clockwise, hole rings clockwise), under which the right-hand
/// normal of the travel direction leaves the material for both ring kinds.
/// Each vertex normal averages its two adjacent edge normals; a collapsed
/// average (spike vertex) falls back to the incoming edge normal.
#[must_use]
pub fn outward_ring_normals(points: &[Point2]) -> Vec<Vector2> {
    let n = points.len();
    let mut edge_normals = Vec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        let d = points[j] - points[i];
        let len = d.norm();
        if len < TOLERANCE {
            edge_normals.push(Vector2::zeros());
        } else {
            edge_normals.push(Vector2::new(d.y / len, -d.x / len));
        }
    }

    let mut normals = Vec::with_capacity(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let avg = edge_normals[prev] + edge_normals[i];
        let len = avg.norm();
        if len < TOLERANCE {
            normals.push(edge_normals[prev]);
        } else {
            normals.push(avg / len);
        }
    }
    normals
}
