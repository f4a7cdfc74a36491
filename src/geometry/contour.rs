use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{point_in_polygon, signed_area_2d};
use crate::math::{Point2, TOLERANCE};

/// Traversal direction of a closed contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

/// Role a contour plays within a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourRole {
    Outer,
    Hole,
}

impl ContourRole {
    /// The winding convention required for this role: outer boundaries run
    /// counter-clockwise, holes run clockwise.
    #[must_use]
    pub fn required_winding(self) -> Winding {
        match self {
            Self::Outer => Winding::CounterClockwise,
            Self::Hole => Winding::Clockwise,
        }
    }
}

/// A closed ring of 2D points.
///
/// The ring is implicitly closed: the last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point2>,
}

impl Contour {
    /// Builds a contour from an ordered point ring.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewPoints`] for rings under 3 points and
    /// [`GeometryError::ZeroArea`] for rings that enclose nothing.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                count: points.len(),
            }
            .into());
        }
        if signed_area_2d(&points).abs() < TOLERANCE {
            return Err(GeometryError::ZeroArea.into());
        }
        Ok(Self { points })
    }

    /// The ring's points in traversal order.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Signed area by the shoelace formula; positive for counter-clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    /// Enclosed area, direction-independent. Diagnostic only.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn winding(&self) -> Winding {
        if self.signed_area() > 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    /// Re-orients the contour for a role, reversing the point order when the
    /// sampled winding disagrees. Applying the same role twice is a no-op.
    #[must_use]
    pub fn into_role(mut self, role: ContourRole) -> Self {
        if self.winding() != role.required_winding() {
            self.points.reverse();
        }
        self
    }

    /// Tests whether another contour lies inside this one.
    ///
    /// Probes with one vertex of `other`; valid for rings that do not cross,
    /// which is what path sub-contours produce.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        point_in_polygon(&other.points[0], &self.points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square(origin: f64, side: f64) -> Vec<Point2> {
        vec![
            Point2::new(origin, origin),
            Point2::new(origin + side, origin),
            Point2::new(origin + side, origin + side),
            Point2::new(origin, origin + side),
        ]
    }

    #[test]
    fn winding_detection() {
        let ccw = Contour::new(square(0.0, 1.0)).unwrap();
        assert_eq!(ccw.winding(), Winding::CounterClockwise);

        let mut pts = square(0.0, 1.0);
        pts.reverse();
        let cw = Contour::new(pts).unwrap();
        assert_eq!(cw.winding(), Winding::Clockwise);
    }

    #[test]
    fn outer_role_forces_ccw() {
        let mut pts = square(0.0, 1.0);
        pts.reverse();
        let contour = Contour::new(pts).unwrap().into_role(ContourRole::Outer);
        assert_eq!(contour.winding(), Winding::CounterClockwise);
    }

    #[test]
    fn hole_role_forces_cw() {
        let contour = Contour::new(square(0.0, 1.0))
            .unwrap()
            .into_role(ContourRole::Hole);
        assert_eq!(contour.winding(), Winding::Clockwise);
    }

    #[test]
    fn role_assignment_is_idempotent() {
        let once = Contour::new(square(0.0, 1.0))
            .unwrap()
            .into_role(ContourRole::Hole);
        let twice = once.clone().into_role(ContourRole::Hole);
        assert_eq!(once, twice);
    }

    #[test]
    fn signed_area_magnitude() {
        let contour = Contour::new(square(0.0, 3.0)).unwrap();
        assert!((contour.area() - 9.0).abs() < TOLERANCE);
    }

    #[test]
    fn too_few_points_rejected() {
        let err = Contour::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]).unwrap_err();
        match err {
            crate::DecalisError::Geometry(GeometryError::TooFewPoints { count }) => {
                assert_eq!(count, 2);
            }
            other => panic!("expected TooFewPoints, got {other:?}"),
        }
    }

    #[test]
    fn collinear_ring_rejected() {
        let err = Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ])
        .unwrap_err();
        match err {
            crate::DecalisError::Geometry(GeometryError::ZeroArea) => {}
            other => panic!("expected ZeroArea, got {other:?}"),
        }
    }

    #[test]
    fn containment_probe() {
        let outer = Contour::new(square(0.0, 10.0)).unwrap();
        let inner = Contour::new(square(2.0, 2.0)).unwrap();
        let apart = Contour::new(square(20.0, 2.0)).unwrap();
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&apart));
    }
}
