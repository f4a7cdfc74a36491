use super::{Point3, Vector3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a box from explicit corners.
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Computes the bounding box of a point set, or `None` if it is empty.
    #[must_use]
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some(Self { min, max })
    }

    /// Returns the smallest box enclosing both `self` and `other`.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        Point3::new(
            f64::midpoint(self.min.x, self.max.x),
            f64::midpoint(self.min.y, self.max.y),
            f64::midpoint(self.min.z, self.max.z),
        )
    }

    /// Extent of the box along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Returns the box with each axis extent rescaled around the center.
    #[must_use]
    pub fn scaled_around_center(&self, factors: Vector3) -> Self {
        let center = self.center();
        let half = self.size().component_mul(&factors) * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Tests whether `other` lies inside `self`, expanded per axis by
    /// `margin` (`x`/`y`/`z` components may differ).
    #[must_use]
    pub fn contains_with_margin(&self, other: &Self, margin: Vector3) -> bool {
        other.min.x >= self.min.x - margin.x
            && other.max.x <= self.max.x + margin.x
            && other.min.y >= self.min.y - margin.y
            && other.max.y <= self.max.y + margin.y
            && other.min.z >= self.min.z - margin.z
            && other.max.z <= self.max.z + margin.z
    }
}
