//! Geometry primitives: rigid placements, planes, axes and bounding boxes
//!
//! All angles taken by public constructors are in degrees; internal storage is
//! quaternions and radians.

use std::fmt;
use std::ops::Mul;

use glam::{DAffine2, DMat3, DMat4, DQuat, DVec2, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

use crate::kernel::{CadError, CadResult};

/// A rigid transform (position + orientation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Translation part
    pub position: DVec3,
    /// Rotation part (unit quaternion)
    pub orientation: DQuat,
}

impl Default for Location {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Location {
    /// The identity placement
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        orientation: DQuat::IDENTITY,
    };

    /// Create a location from a position and an orientation
    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation: orientation.normalize(),
        }
    }

    /// Pure translation
    pub fn from_translation(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
        }
    }

    /// Pure translation from components
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::from_translation(DVec3::new(x, y, z))
    }

    /// Rotation about an axis through the origin
    pub fn from_axis_angle(axis: DVec3, degrees: f64) -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::from_axis_angle(axis.normalize(), degrees.to_radians()),
        }
    }

    /// Rotation from intrinsic X, Y, Z angles
    pub fn from_euler(x_degrees: f64, y_degrees: f64, z_degrees: f64) -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::from_euler(
                EulerRot::XYZ,
                x_degrees.to_radians(),
                y_degrees.to_radians(),
                z_degrees.to_radians(),
            ),
        }
    }

    /// Inverse transform
    pub fn inverse(&self) -> Self {
        let inv = self.orientation.inverse();
        Self {
            position: inv * -self.position,
            orientation: inv,
        }
    }

    /// Apply to a point
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.position + self.orientation * point
    }

    /// Apply to a direction (rotation only)
    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.orientation * vector
    }

    /// Local X axis expressed in the parent frame
    pub fn x_dir(&self) -> DVec3 {
        self.orientation * DVec3::X
    }

    /// Local Y axis expressed in the parent frame
    pub fn y_dir(&self) -> DVec3 {
        self.orientation * DVec3::Y
    }

    /// Local Z axis expressed in the parent frame
    pub fn z_dir(&self) -> DVec3 {
        self.orientation * DVec3::Z
    }

    /// Homogeneous matrix form
    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.orientation, self.position)
    }

    /// Compare two placements within a positional and rotational tolerance
    pub fn approx_eq(&self, other: &Location, linear_tolerance: f64, angular_tolerance: f64) -> bool {
        self.position.distance(other.position) <= linear_tolerance
            && self.orientation.angle_between(other.orientation) <= angular_tolerance
    }

    /// Restrict to a transform of the XY plane: in-plane translation and the
    /// twist about Z
    pub fn planar(&self) -> Self {
        let x = self.x_dir();
        let angle = x.y.atan2(x.x);
        Self {
            position: DVec3::new(self.position.x, self.position.y, 0.0),
            orientation: DQuat::from_rotation_z(angle),
        }
    }
}

impl Mul for Location {
    type Output = Location;

    fn mul(self, rhs: Location) -> Location {
        Location {
            position: self.transform_point(rhs.position),
            orientation: (self.orientation * rhs.orientation).normalize(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, z) = self.orientation.to_euler(EulerRot::XYZ);
        write!(
            f,
            "Location(({:.4}, {:.4}, {:.4}), ({:.2}, {:.2}, {:.2}))",
            self.position.x,
            self.position.y,
            self.position.z,
            x.to_degrees(),
            y.to_degrees(),
            z.to_degrees()
        )
    }
}

/// An oriented plane: origin, local X direction and normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Origin of the plane
    pub origin: DVec3,
    /// Local X direction (unit, perpendicular to `z_dir`)
    pub x_dir: DVec3,
    /// Plane normal (unit)
    pub z_dir: DVec3,
}

impl Default for Plane {
    fn default() -> Self {
        Self::XY
    }
}

impl Plane {
    /// The XY plane at the origin
    pub const XY: Plane = Plane {
        origin: DVec3::ZERO,
        x_dir: DVec3::X,
        z_dir: DVec3::Z,
    };

    /// The XZ plane at the origin (normal -Y)
    pub const XZ: Plane = Plane {
        origin: DVec3::ZERO,
        x_dir: DVec3::X,
        z_dir: DVec3::NEG_Y,
    };

    /// The YZ plane at the origin (normal +X)
    pub const YZ: Plane = Plane {
        origin: DVec3::ZERO,
        x_dir: DVec3::Y,
        z_dir: DVec3::X,
    };

    /// Create a plane, orthogonalizing `x_dir` against `z_dir`
    pub fn new(origin: DVec3, x_dir: DVec3, z_dir: DVec3) -> CadResult<Self> {
        let z = z_dir.normalize_or_zero();
        if z == DVec3::ZERO {
            return Err(CadError::InvalidParameter("Plane normal is zero".into()));
        }
        let x = (x_dir - z * x_dir.dot(z)).normalize_or_zero();
        if x == DVec3::ZERO {
            return Err(CadError::InvalidParameter(
                "Plane x direction is parallel to its normal".into(),
            ));
        }
        Ok(Self {
            origin,
            x_dir: x,
            z_dir: z,
        })
    }

    /// Create a plane from a normal only, picking any perpendicular X direction
    pub fn from_normal(origin: DVec3, normal: DVec3) -> CadResult<Self> {
        let z = normal.normalize_or_zero();
        if z == DVec3::ZERO {
            return Err(CadError::InvalidParameter("Plane normal is zero".into()));
        }
        Self::new(origin, z.any_orthonormal_vector(), z)
    }

    /// Plane whose axes are the axes of `location`
    pub fn from_location(location: &Location) -> Self {
        Self {
            origin: location.position,
            x_dir: location.x_dir(),
            z_dir: location.z_dir(),
        }
    }

    /// Local Y direction
    pub fn y_dir(&self) -> DVec3 {
        self.z_dir.cross(self.x_dir)
    }

    /// The placement mapping plane-local coordinates to world coordinates
    pub fn location(&self) -> Location {
        let basis = DMat3::from_cols(self.x_dir, self.y_dir(), self.z_dir);
        Location::new(self.origin, DQuat::from_mat3(&basis))
    }

    /// This plane moved by `location`
    pub fn moved(&self, location: &Location) -> Self {
        Self::from_location(&(*location * self.location()))
    }

    /// Reflection of `point` through this plane
    pub fn mirror_point(&self, point: DVec3) -> DVec3 {
        point - 2.0 * (point - self.origin).dot(self.z_dir) * self.z_dir
    }

    /// Reflection of a direction through this plane
    pub fn mirror_vector(&self, v: DVec3) -> DVec3 {
        v - 2.0 * v.dot(self.z_dir) * self.z_dir
    }

    /// `other` reflected through this plane. The reflected plane keeps the
    /// image of the X and Z axes, so its local Y axis is the negated image
    /// of the original one.
    pub fn mirror_plane(&self, other: &Plane) -> Plane {
        Plane {
            origin: self.mirror_point(other.origin),
            x_dir: self.mirror_vector(other.x_dir),
            z_dir: self.mirror_vector(other.z_dir),
        }
    }

    /// Parallel plane offset along the normal
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + self.z_dir * distance,
            ..*self
        }
    }

    /// World point to plane-local coordinates
    pub fn to_local(&self, point: DVec3) -> DVec3 {
        let d = point - self.origin;
        DVec3::new(d.dot(self.x_dir), d.dot(self.y_dir()), d.dot(self.z_dir))
    }

    /// Plane-local 2D coordinates to world point
    pub fn to_world(&self, point: DVec2) -> DVec3 {
        self.origin + self.x_dir * point.x + self.y_dir() * point.y
    }

    /// Signed distance of a point from the plane
    pub fn distance_to(&self, point: DVec3) -> f64 {
        (point - self.origin).dot(self.z_dir)
    }

    /// Same supporting plane and same normal orientation
    pub fn is_coplanar(&self, other: &Plane, tolerance: f64) -> bool {
        self.z_dir.dot(other.z_dir) >= 1.0 - tolerance && self.distance_to(other.origin).abs() <= tolerance
    }

    /// 2D transform taking `other`-local coordinates into this plane's local
    /// coordinates. Only meaningful for coplanar planes.
    pub fn transform_from(&self, other: &Plane) -> DAffine2 {
        let sx = self.x_dir;
        let sy = self.y_dir();
        let ox = other.x_dir;
        let oy = other.y_dir();
        let t = other.origin - self.origin;
        DAffine2::from_cols(
            DVec2::new(ox.dot(sx), ox.dot(sy)),
            DVec2::new(oy.dot(sx), oy.dot(sy)),
            DVec2::new(t.dot(sx), t.dot(sy)),
        )
    }

    /// Best-fit plane through an ordered loop of points (Newell's method)
    pub fn from_points(points: &[DVec3]) -> CadResult<Self> {
        if points.len() < 3 {
            return Err(CadError::InvalidProfile(
                "At least three points are needed to define a plane".into(),
            ));
        }
        let mut normal = DVec3::ZERO;
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        let origin = points[0];
        let x_dir = points
            .iter()
            .map(|p| *p - origin)
            .find(|d| d.length() > 1e-12)
            .unwrap_or(DVec3::X);
        Self::new(origin, x_dir, normal)
    }
}

/// An axis: a point and a direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// A point on the axis
    pub origin: DVec3,
    /// Unit direction
    pub direction: DVec3,
}

impl Axis {
    /// X axis at origin
    pub const X: Axis = Axis {
        origin: DVec3::ZERO,
        direction: DVec3::X,
    };

    /// Y axis at origin
    pub const Y: Axis = Axis {
        origin: DVec3::ZERO,
        direction: DVec3::Y,
    };

    /// Z axis at origin
    pub const Z: Axis = Axis {
        origin: DVec3::ZERO,
        direction: DVec3::Z,
    };

    /// Create an axis from origin and direction
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// This axis moved by `location`
    pub fn moved(&self, location: &Location) -> Self {
        Self {
            origin: location.transform_point(self.origin),
            direction: location.transform_vector(self.direction),
        }
    }
}

/// Alignment of an object's bounding box relative to its placement origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    /// Minimum side at the origin
    Min,
    /// Centered on the origin
    #[default]
    Center,
    /// Maximum side at the origin
    Max,
}

impl Align {
    /// Shift that moves an extent `[min, max]` to this alignment
    pub fn offset(self, min: f64, max: f64) -> f64 {
        match self {
            Align::Min => -min,
            Align::Center => -(min + max) / 2.0,
            Align::Max => -max,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundBox {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl BoundBox {
    /// Box spanning two corners
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points, `None` for no points
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Box size per axis
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Box center
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Volume of the box
    pub fn volume(&self) -> f64 {
        let s = self.size();
        s.x * s.y * s.z
    }

    /// Smallest box containing both
    pub fn union(&self, other: &BoundBox) -> BoundBox {
        BoundBox::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Overlap of two boxes, `None` if they are disjoint
    pub fn intersection(&self, other: &BoundBox) -> Option<BoundBox> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min.x <= max.x && min.y <= max.y && min.z <= max.z).then_some(BoundBox::new(min, max))
    }

    /// Bounding box of this box after a rigid transform
    pub fn transformed(&self, location: &Location) -> BoundBox {
        let corners = self.corners().map(|c| location.transform_point(c));
        let (min, max) = corners
            .iter()
            .fold((corners[0], corners[0]), |(min, max), p| (min.min(*p), max.max(*p)));
        BoundBox::new(min, max)
    }

    /// Bounds of the box reflected through `plane`
    pub fn mirrored(&self, plane: &Plane) -> BoundBox {
        let corners = self.corners().map(|c| plane.mirror_point(c));
        let (min, max) = corners
            .iter()
            .fold((corners[0], corners[0]), |(min, max), p| (min.min(*p), max.max(*p)));
        BoundBox::new(min, max)
    }

    /// The eight corners
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }

    /// Check if a point lies inside or on the box
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Offset that aligns this box per axis
    pub fn align_offset(&self, align: [Align; 3]) -> DVec3 {
        DVec3::new(
            align[0].offset(self.min.x, self.max.x),
            align[1].offset(self.min.y, self.max.y),
            align[2].offset(self.min.z, self.max.z),
        )
    }
}
