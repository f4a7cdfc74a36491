use crate::math::aabb_3d::Aabb;
use crate::math::{Matrix4, Point3, Vector3, TOLERANCE};

/// An oriented frame on the target surface where artwork is applied.
///
/// The frame looks from the hit point against the surface normal, so local
/// +Z is the outward normal and the decal projects along -Z into the
/// surface.
#[derive(Debug, Clone, Copy)]
pub struct DecalPose {
    point: Point3,
    x_axis: Vector3,
    y_axis: Vector3,
    z_axis: Vector3,
}

impl DecalPose {
    /// Builds the frame for a surface hit.
    ///
    /// Up is `(0, 1, 0)`; when the normal is parallel to it the frame falls
    /// back to up `(0, 0, 1)` so the basis stays well formed. A degenerate
    /// normal yields the identity frame.
    #[must_use]
    pub fn new(point: Point3, normal: Vector3) -> Self {
        let len = normal.norm();
        let z_axis = if len > TOLERANCE {
            normal / len
        } else {
            Vector3::new(0.0, 0.0, 1.0)
        };

        let mut up = Vector3::new(0.0, 1.0, 0.0);
        if z_axis.cross(&up).norm() < TOLERANCE {
            up = Vector3::new(0.0, 0.0, 1.0);
        }
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis);

        Self {
            point,
            x_axis,
            y_axis,
            z_axis,
        }
    }

    /// Anchor point of the frame on the surface.
    #[must_use]
    pub fn point(&self) -> Point3 {
        self.point
    }

    /// Outward surface normal (local +Z).
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        self.z_axis
    }

    /// In-plane axis running along the decal width.
    #[must_use]
    pub fn x_axis(&self) -> Vector3 {
        self.x_axis
    }

    /// In-plane axis running along the decal height.
    #[must_use]
    pub fn y_axis(&self) -> Vector3 {
        self.y_axis
    }

    /// Same frame with the anchor shifted along the normal.
    #[must_use]
    pub fn offset_along_normal(&self, distance: f64) -> Self {
        Self {
            point: self.point + self.z_axis * distance,
            ..*self
        }
    }

    /// Rotation part of the pose, frame axes as matrix columns.
    #[must_use]
    #[rustfmt::skip]
    pub fn rotation(&self) -> Matrix4 {
        Matrix4::new(
            self.x_axis.x, self.y_axis.x, self.z_axis.x, 0.0,
            self.x_axis.y, self.y_axis.y, self.z_axis.y, 0.0,
            self.x_axis.z, self.y_axis.z, self.z_axis.z, 0.0,
            0.0,           0.0,           0.0,           1.0,
        )
    }

    /// Maps a world point into frame-local coordinates.
    #[must_use]
    pub fn to_local(&self, world: &Point3) -> Point3 {
        let rel = world - self.point;
        Point3::new(
            rel.dot(&self.x_axis),
            rel.dot(&self.y_axis),
            rel.dot(&self.z_axis),
        )
    }

    /// Maps a frame-local point back into world coordinates.
    #[must_use]
    pub fn to_world(&self, local: &Point3) -> Point3 {
        self.point + self.x_axis * local.x + self.y_axis * local.y + self.z_axis * local.z
    }
}

/// Decal dimensions derived from the target footprint and the artwork
/// aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct DecalSize {
    /// Extent along the pose x axis.
    pub width: f64,
    /// Extent along the pose y axis.
    pub height: f64,
    /// Projection depth along the pose z axis.
    pub depth: f64,
}

impl DecalSize {
    /// Derives decal dimensions from the target bounds.
    ///
    /// Height at scale 1 is half the smaller planar target dimension, width
    /// follows the artwork aspect ratio, and the projection depth is half
    /// the smaller footprint side.
    #[must_use]
    pub fn derive(target: &Aabb, aspect: f64, scale: f64) -> Self {
        let extent = target.size();
        let base = extent.x.min(extent.y) * 0.5;
        let height = base * scale;
        let width = height * aspect;
        let depth = width.min(height) * 0.5;
        Self {
            width,
            height,
            depth,
        }
    }

    /// Half extents of the clip box centered on the pose point.
    #[must_use]
    pub fn half_extents(&self) -> Vector3 {
        Vector3::new(self.width * 0.5, self.height * 0.5, self.depth * 0.5)
    }
}
