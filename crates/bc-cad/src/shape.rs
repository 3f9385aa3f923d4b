//! Shape types
//!
//! A [`Shape`] carries its geometry by value. Curves are explicit edges,
//! faces are planar regions and solids are implicit CSG volumes that the
//! kernel classifies by point membership.

use std::f64::consts::TAU;
use std::fmt;

use glam::{DAffine2, DVec2, DVec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{BoundBox, Location, Plane};

/// Topological dimension of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dim {
    /// Curves (edges, wires)
    One = 1,
    /// Surfaces (faces)
    Two = 2,
    /// Volumes (solids)
    Three = 3,
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", *self as u8)
    }
}

/// Topological kind of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// A single edge
    Edge,
    /// A connected chain of edges
    Wire,
    /// A planar face
    Face,
    /// A solid
    Solid,
    /// Disconnected edges
    Compound,
}

/// A single edge curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    /// Straight segment
    Line {
        /// Start point
        start: DVec3,
        /// End point
        end: DVec3,
    },
    /// Circular arc in the XY plane of `frame`, centered at its origin
    Arc {
        /// Arc frame (center and orientation)
        frame: Location,
        /// Radius
        radius: f64,
        /// Start angle in radians, measured from the frame X axis
        start_angle: f64,
        /// Signed sweep in radians
        sweep: f64,
    },
}

impl Curve {
    /// Point at normalized parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f64) -> DVec3 {
        match self {
            Curve::Line { start, end } => start.lerp(*end, t),
            Curve::Arc {
                frame,
                radius,
                start_angle,
                sweep,
            } => {
                let a = start_angle + sweep * t;
                frame.transform_point(DVec3::new(radius * a.cos(), radius * a.sin(), 0.0))
            }
        }
    }

    /// Start point
    pub fn start(&self) -> DVec3 {
        self.point_at(0.0)
    }

    /// End point
    pub fn end(&self) -> DVec3 {
        self.point_at(1.0)
    }

    /// Curve length
    pub fn length(&self) -> f64 {
        match self {
            Curve::Line { start, end } => start.distance(*end),
            Curve::Arc { radius, sweep, .. } => radius * sweep.abs(),
        }
    }

    /// Same curve with reversed direction
    pub fn reversed(&self) -> Curve {
        match self {
            Curve::Line { start, end } => Curve::Line {
                start: *end,
                end: *start,
            },
            Curve::Arc {
                frame,
                radius,
                start_angle,
                sweep,
            } => Curve::Arc {
                frame: *frame,
                radius: *radius,
                start_angle: start_angle + sweep,
                sweep: -sweep,
            },
        }
    }

    /// Curve moved by a rigid transform
    pub fn transformed(&self, location: &Location) -> Curve {
        match self {
            Curve::Line { start, end } => Curve::Line {
                start: location.transform_point(*start),
                end: location.transform_point(*end),
            },
            Curve::Arc {
                frame,
                radius,
                start_angle,
                sweep,
            } => Curve::Arc {
                frame: *location * *frame,
                radius: *radius,
                start_angle: *start_angle,
                sweep: *sweep,
            },
        }
    }

    /// Curve reflected through `plane`, keeping its direction
    pub fn mirrored(&self, plane: &Plane) -> Curve {
        match self {
            Curve::Line { start, end } => Curve::Line {
                start: plane.mirror_point(*start),
                end: plane.mirror_point(*end),
            },
            Curve::Arc {
                frame,
                radius,
                start_angle,
                sweep,
            } => Curve::Arc {
                // the mirrored frame has its Y axis flipped, so angles negate
                frame: plane.mirror_plane(&Plane::from_location(frame)).location(),
                radius: *radius,
                start_angle: -start_angle,
                sweep: -sweep,
            },
        }
    }

    /// Polyline approximation with `segments` pieces for arcs
    pub fn sample(&self, segments: u32) -> Vec<DVec3> {
        match self {
            Curve::Line { start, end } => vec![*start, *end],
            Curve::Arc { sweep, .. } => {
                let n = ((segments as f64 * sweep.abs() / TAU).ceil() as u32).max(2);
                (0..=n).map(|i| self.point_at(i as f64 / n as f64)).collect()
            }
        }
    }

    /// Geometric equality regardless of direction
    pub fn approx_eq(&self, other: &Curve, tolerance: f64) -> bool {
        let same = |a: &Curve, b: &Curve| {
            [0.0, 0.5, 1.0]
                .iter()
                .all(|t| a.point_at(*t).distance(b.point_at(*t)) <= tolerance)
        };
        same(self, other) || same(self, &other.reversed())
    }
}

/// A planar region in 2D plane-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Region {
    /// Rectangle centered at the origin
    Rect {
        /// Extent along X
        width: f64,
        /// Extent along Y
        height: f64,
    },
    /// Circle centered at the origin
    Circle {
        /// Radius
        radius: f64,
    },
    /// Axis-aligned ellipse centered at the origin
    Ellipse {
        /// Semi-axis along X
        x_radius: f64,
        /// Semi-axis along Y
        y_radius: f64,
    },
    /// Simple polygon (even-odd fill)
    Polygon {
        /// Vertices in order, implicitly closed
        points: Vec<DVec2>,
    },
    /// A region under a 2D transform
    Placed {
        /// Inner region
        region: Box<Region>,
        /// Transform from inner to outer coordinates
        transform: DAffine2,
    },
    /// Points in either region
    Union(Box<Region>, Box<Region>),
    /// Points in the first region but not the second
    Difference(Box<Region>, Box<Region>),
    /// Points in both regions
    Intersection(Box<Region>, Box<Region>),
}

impl Region {
    /// Wrap with a 2D transform
    pub fn placed(self, transform: DAffine2) -> Region {
        if transform == DAffine2::IDENTITY {
            return self;
        }
        Region::Placed {
            region: Box::new(self),
            transform,
        }
    }

    /// Point membership
    pub fn contains(&self, p: DVec2) -> bool {
        match self {
            Region::Rect { width, height } => p.x.abs() <= width / 2.0 && p.y.abs() <= height / 2.0,
            Region::Circle { radius } => p.length_squared() <= radius * radius,
            Region::Ellipse { x_radius, y_radius } => {
                (p.x / x_radius).powi(2) + (p.y / y_radius).powi(2) <= 1.0
            }
            Region::Polygon { points } => polygon_contains(points, p),
            Region::Placed { region, transform } => {
                region.contains(transform.inverse().transform_point2(p))
            }
            Region::Union(a, b) => a.contains(p) || b.contains(p),
            Region::Difference(a, b) => a.contains(p) && !b.contains(p),
            Region::Intersection(a, b) => a.contains(p) && b.contains(p),
        }
    }

    /// Conservative 2D bounds as `(min, max)`, `None` if provably empty
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        match self {
            Region::Rect { width, height } => {
                let h = DVec2::new(width / 2.0, height / 2.0);
                Some((-h, h))
            }
            Region::Circle { radius } => Some((DVec2::splat(-radius), DVec2::splat(*radius))),
            Region::Ellipse { x_radius, y_radius } => {
                let h = DVec2::new(*x_radius, *y_radius);
                Some((-h, h))
            }
            Region::Polygon { points } => {
                let first = *points.first()?;
                Some(
                    points
                        .iter()
                        .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
                )
            }
            Region::Placed { region, transform } => {
                let (min, max) = region.bounds()?;
                let corners = [
                    DVec2::new(min.x, min.y),
                    DVec2::new(max.x, min.y),
                    DVec2::new(min.x, max.y),
                    DVec2::new(max.x, max.y),
                ]
                .map(|c| transform.transform_point2(c));
                Some(
                    corners
                        .iter()
                        .fold((corners[0], corners[0]), |(lo, hi), c| (lo.min(*c), hi.max(*c))),
                )
            }
            Region::Union(a, b) => match (a.bounds(), b.bounds()) {
                (Some((a0, a1)), Some((b0, b1))) => Some((a0.min(b0), a1.max(b1))),
                (Some(x), None) | (None, Some(x)) => Some(x),
                (None, None) => None,
            },
            Region::Difference(a, _) => a.bounds(),
            Region::Intersection(a, b) => {
                let (a0, a1) = a.bounds()?;
                let (b0, b1) = b.bounds()?;
                let (lo, hi) = (a0.max(b0), a1.min(b1));
                (lo.x <= hi.x && lo.y <= hi.y).then_some((lo, hi))
            }
        }
    }
}

fn polygon_contains(points: &[DVec2], p: DVec2) -> bool {
    let mut inside = false;
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + n - 1) % n];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// An implicit solid volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Volume {
    /// Box centered at the origin
    Cuboid {
        /// Extent along X
        length: f64,
        /// Extent along Y
        width: f64,
        /// Extent along Z
        height: f64,
    },
    /// Cylinder along Z centered at the origin
    Cylinder {
        /// Radius
        radius: f64,
        /// Height
        height: f64,
    },
    /// Sphere centered at the origin
    Sphere {
        /// Radius
        radius: f64,
    },
    /// Truncated cone along Z centered at the origin
    Cone {
        /// Radius at `-height / 2`
        bottom_radius: f64,
        /// Radius at `+height / 2`
        top_radius: f64,
        /// Height
        height: f64,
    },
    /// Torus around Z centered at the origin
    Torus {
        /// Distance from the center to the tube center
        major_radius: f64,
        /// Tube radius
        minor_radius: f64,
    },
    /// Region in the XY plane swept along Z between `start` and `end`
    Prism {
        /// Cross-section
        region: Region,
        /// Lower Z
        start: f64,
        /// Upper Z
        end: f64,
    },
    /// Region in the XY plane revolved about the Y axis by `angle` radians
    Revolution {
        /// Profile (x is the radial distance, y the axial position)
        region: Region,
        /// Revolution angle in radians
        angle: f64,
    },
    /// A volume under a rigid transform
    Placed {
        /// Inner volume
        volume: Box<Volume>,
        /// Transform from inner to outer coordinates
        location: Location,
    },
    /// A volume reflected through a plane
    Mirrored {
        /// Inner volume
        volume: Box<Volume>,
        /// Mirror plane
        plane: Plane,
    },
    /// Points in either volume
    Union(Box<Volume>, Box<Volume>),
    /// Points in the first volume but not the second
    Difference(Box<Volume>, Box<Volume>),
    /// Points in both volumes
    Intersection(Box<Volume>, Box<Volume>),
}

impl Volume {
    /// Wrap with a rigid transform
    pub fn placed(self, location: Location) -> Volume {
        if location == Location::IDENTITY {
            return self;
        }
        Volume::Placed {
            volume: Box::new(self),
            location,
        }
    }

    /// Wrap with a reflection through `plane`
    pub fn mirrored(self, plane: Plane) -> Volume {
        Volume::Mirrored {
            volume: Box::new(self),
            plane,
        }
    }

    /// Point membership
    pub fn contains(&self, p: DVec3) -> bool {
        match self {
            Volume::Cuboid {
                length,
                width,
                height,
            } => p.x.abs() <= length / 2.0 && p.y.abs() <= width / 2.0 && p.z.abs() <= height / 2.0,
            Volume::Cylinder { radius, height } => {
                p.z.abs() <= height / 2.0 && p.x * p.x + p.y * p.y <= radius * radius
            }
            Volume::Sphere { radius } => p.length_squared() <= radius * radius,
            Volume::Cone {
                bottom_radius,
                top_radius,
                height,
            } => {
                if p.z.abs() > height / 2.0 {
                    return false;
                }
                let t = p.z / height + 0.5;
                let r = bottom_radius + (top_radius - bottom_radius) * t;
                p.x * p.x + p.y * p.y <= r * r
            }
            Volume::Torus {
                major_radius,
                minor_radius,
            } => {
                let q = (p.x * p.x + p.y * p.y).sqrt() - major_radius;
                q * q + p.z * p.z <= minor_radius * minor_radius
            }
            Volume::Prism { region, start, end } => {
                p.z >= *start && p.z <= *end && region.contains(DVec2::new(p.x, p.y))
            }
            Volume::Revolution { region, angle } => {
                let r = (p.x * p.x + p.z * p.z).sqrt();
                let theta = (-p.z).atan2(p.x).rem_euclid(TAU);
                let opposite = (theta + std::f64::consts::PI).rem_euclid(TAU);
                let within = |a: f64| a <= *angle + 1e-12 || *angle >= TAU - 1e-12;
                (within(theta) && region.contains(DVec2::new(r, p.y)))
                    || (within(opposite) && region.contains(DVec2::new(-r, p.y)))
            }
            Volume::Placed { volume, location } => {
                volume.contains(location.inverse().transform_point(p))
            }
            Volume::Mirrored { volume, plane } => volume.contains(plane.mirror_point(p)),
            Volume::Union(a, b) => a.contains(p) || b.contains(p),
            Volume::Difference(a, b) => a.contains(p) && !b.contains(p),
            Volume::Intersection(a, b) => a.contains(p) && b.contains(p),
        }
    }

    /// Conservative bounds, `None` if provably empty
    pub fn bounds(&self) -> Option<BoundBox> {
        match self {
            Volume::Cuboid {
                length,
                width,
                height,
            } => {
                let h = DVec3::new(length / 2.0, width / 2.0, height / 2.0);
                Some(BoundBox::new(-h, h))
            }
            Volume::Cylinder { radius, height } => {
                let h = DVec3::new(*radius, *radius, height / 2.0);
                Some(BoundBox::new(-h, h))
            }
            Volume::Sphere { radius } => Some(BoundBox::new(DVec3::splat(-radius), DVec3::splat(*radius))),
            Volume::Cone {
                bottom_radius,
                top_radius,
                height,
            } => {
                let r = bottom_radius.max(*top_radius);
                let h = DVec3::new(r, r, height / 2.0);
                Some(BoundBox::new(-h, h))
            }
            Volume::Torus {
                major_radius,
                minor_radius,
            } => {
                let r = major_radius + minor_radius;
                let h = DVec3::new(r, r, *minor_radius);
                Some(BoundBox::new(-h, h))
            }
            Volume::Prism { region, start, end } => {
                let (min, max) = region.bounds()?;
                Some(BoundBox::new(
                    DVec3::new(min.x, min.y, *start),
                    DVec3::new(max.x, max.y, *end),
                ))
            }
            Volume::Revolution { region, .. } => {
                let (min, max) = region.bounds()?;
                let r = min.x.abs().max(max.x.abs());
                Some(BoundBox::new(
                    DVec3::new(-r, min.y, -r),
                    DVec3::new(r, max.y, r),
                ))
            }
            Volume::Placed { volume, location } => Some(volume.bounds()?.transformed(location)),
            Volume::Mirrored { volume, plane } => Some(volume.bounds()?.mirrored(plane)),
            Volume::Union(a, b) => match (a.bounds(), b.bounds()) {
                (Some(x), Some(y)) => Some(x.union(&y)),
                (Some(x), None) | (None, Some(x)) => Some(x),
                (None, None) => None,
            },
            Volume::Difference(a, _) => a.bounds(),
            Volume::Intersection(a, b) => a.bounds()?.intersection(&b.bounds()?),
        }
    }
}

/// Geometry payload of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// One or more edges
    Edges(Vec<Curve>),
    /// A planar face
    Face {
        /// Supporting plane
        plane: Plane,
        /// Region in plane-local coordinates
        region: Region,
    },
    /// A solid volume
    Solid(Volume),
}

/// A shape value handed between builders and the kernel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier
    pub id: Uuid,
    /// Optional user label
    pub label: Option<String>,
    geometry: Geometry,
}

impl Shape {
    /// Wrap geometry in a new shape
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: None,
            geometry,
        }
    }

    /// Shape made of edges
    pub fn from_curves(curves: Vec<Curve>) -> Self {
        Self::new(Geometry::Edges(curves))
    }

    /// Planar face
    pub fn from_region(plane: Plane, region: Region) -> Self {
        Self::new(Geometry::Face { plane, region })
    }

    /// Solid
    pub fn from_volume(volume: Volume) -> Self {
        Self::new(Geometry::Solid(volume))
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Geometry payload
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Topological dimension
    pub fn dim(&self) -> Dim {
        match self.geometry {
            Geometry::Edges(_) => Dim::One,
            Geometry::Face { .. } => Dim::Two,
            Geometry::Solid(_) => Dim::Three,
        }
    }

    /// Topological kind
    pub fn kind(&self) -> ShapeKind {
        match &self.geometry {
            Geometry::Edges(curves) if curves.len() == 1 => ShapeKind::Edge,
            Geometry::Edges(curves) => {
                let chained = curves
                    .windows(2)
                    .all(|w| w[0].end().distance(w[1].start()) <= 1e-9);
                if chained {
                    ShapeKind::Wire
                } else {
                    ShapeKind::Compound
                }
            }
            Geometry::Face { .. } => ShapeKind::Face,
            Geometry::Solid(_) => ShapeKind::Solid,
        }
    }

    /// Edges of a 1D shape
    pub fn curves(&self) -> &[Curve] {
        match &self.geometry {
            Geometry::Edges(curves) => curves,
            _ => &[],
        }
    }

    /// Copy of this shape under a rigid transform (keeps the label, new id)
    pub fn moved(&self, location: &Location) -> Shape {
        let geometry = match &self.geometry {
            Geometry::Edges(curves) => {
                Geometry::Edges(curves.iter().map(|c| c.transformed(location)).collect())
            }
            Geometry::Face { plane, region } => Geometry::Face {
                plane: plane.moved(location),
                region: region.clone(),
            },
            Geometry::Solid(volume) => Geometry::Solid(volume.clone().placed(*location)),
        };
        Shape {
            id: Uuid::new_v4(),
            label: self.label.clone(),
            geometry,
        }
    }

    /// Copy of this shape reflected through `plane` (keeps the label, new id)
    pub fn mirrored(&self, plane: &Plane) -> Shape {
        let geometry = match &self.geometry {
            Geometry::Edges(curves) => {
                Geometry::Edges(curves.iter().map(|c| c.mirrored(plane)).collect())
            }
            Geometry::Face {
                plane: support,
                region,
            } => Geometry::Face {
                plane: plane.mirror_plane(support),
                region: region
                    .clone()
                    .placed(DAffine2::from_scale(DVec2::new(1.0, -1.0))),
            },
            Geometry::Solid(volume) => Geometry::Solid(volume.clone().mirrored(*plane)),
        };
        Shape {
            id: Uuid::new_v4(),
            label: self.label.clone(),
            geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_curve_reversed_equal() {
        let a = Curve::Line {
            start: DVec3::ZERO,
            end: DVec3::X,
        };
        assert!(a.approx_eq(&a.reversed(), 1e-9));
        let arc = Curve::Arc {
            frame: Location::IDENTITY,
            radius: 2.0,
            start_angle: 0.0,
            sweep: std::f64::consts::FRAC_PI_2,
        };
        assert_relative_eq!(arc.end().y, 2.0, epsilon = 1e-9);
        assert_relative_eq!(arc.length(), std::f64::consts::PI, epsilon = 1e-9);
        assert!(arc.approx_eq(&arc.reversed(), 1e-9));
    }

    #[test]
    fn test_region_placed_and_booleans() {
        let square = Region::Rect {
            width: 2.0,
            height: 2.0,
        };
        let shifted = square
            .clone()
            .placed(DAffine2::from_translation(DVec2::new(1.0, 0.0)));
        assert!(shifted.contains(DVec2::new(1.8, 0.0)));
        assert!(!shifted.contains(DVec2::new(-0.5, 0.0)));

        let cut = Region::Difference(Box::new(square), Box::new(shifted));
        assert!(cut.contains(DVec2::new(-0.5, 0.0)));
        assert!(!cut.contains(DVec2::new(0.5, 0.0)));
    }

    #[test]
    fn test_polygon_contains() {
        let tri = Region::Polygon {
            points: vec![DVec2::ZERO, DVec2::new(4.0, 0.0), DVec2::new(0.0, 4.0)],
        };
        assert!(tri.contains(DVec2::new(1.0, 1.0)));
        assert!(!tri.contains(DVec2::new(3.0, 3.0)));
    }

    #[test]
    fn test_revolution_contains() {
        let profile = Region::Rect {
            width: 1.0,
            height: 2.0,
        }
        .placed(DAffine2::from_translation(DVec2::new(3.0, 0.0)));
        let ring = Volume::Revolution {
            region: profile,
            angle: TAU,
        };
        assert!(ring.contains(DVec3::new(0.0, 0.5, 3.2)));
        assert!(ring.contains(DVec3::new(-3.2, 0.0, 0.0)));
        assert!(!ring.contains(DVec3::ZERO));
    }

    #[test]
    fn test_volume_bounds_intersection_empty() {
        let a = Volume::Cuboid {
            length: 1.0,
            width: 1.0,
            height: 1.0,
        };
        let b = a.clone().placed(Location::from_xyz(5.0, 0.0, 0.0));
        let both = Volume::Intersection(Box::new(a), Box::new(b));
        assert!(both.bounds().is_none());
    }

    #[test]
    fn test_mirrored_shapes() {
        let mirror = Plane::YZ;
        let block = Shape::from_volume(
            Volume::Cuboid {
                length: 1.0,
                width: 1.0,
                height: 1.0,
            }
            .placed(Location::from_xyz(2.0, 0.0, 0.0)),
        );
        let Geometry::Solid(volume) = block.mirrored(&mirror).geometry().clone() else {
            panic!("mirrored solid is not a solid");
        };
        assert!(volume.contains(DVec3::new(-2.0, 0.3, 0.0)));
        assert!(!volume.contains(DVec3::new(2.0, 0.0, 0.0)));
        let bb = volume.bounds().unwrap();
        assert_relative_eq!(bb.min.x, -2.5, epsilon = 1e-12);
        assert_relative_eq!(bb.max.x, -1.5, epsilon = 1e-12);

        let arc = Curve::Arc {
            frame: Location::from_xyz(1.0, 0.0, 0.0),
            radius: 1.0,
            start_angle: 0.0,
            sweep: std::f64::consts::FRAC_PI_2,
        };
        let image = arc.mirrored(&mirror);
        for t in [0.0, 0.3, 1.0] {
            let expected = mirror.mirror_point(arc.point_at(t));
            assert!(image.point_at(t).distance(expected) < 1e-9);
        }
    }

    #[test]
    fn test_mirrored_face_keeps_points() {
        let tri = Region::Polygon {
            points: vec![DVec2::ZERO, DVec2::new(2.0, 0.0), DVec2::new(0.0, 1.0)],
        };
        let face = Shape::from_region(Plane::XY.offset(1.0), tri);
        let Geometry::Face { plane, region } = face.mirrored(&Plane::XZ).geometry().clone() else {
            panic!("mirrored face is not a face");
        };
        // (0.5, 0.5, 1) reflects to (0.5, -0.5, 1)
        let world = DVec3::new(0.5, -0.5, 1.0);
        let local = plane.location().inverse().transform_point(world);
        assert_relative_eq!(local.z, 0.0, epsilon = 1e-12);
        assert!(region.contains(DVec2::new(local.x, local.y)));
        let outside = plane
            .location()
            .inverse()
            .transform_point(DVec3::new(0.5, 0.5, 1.0));
        assert!(!region.contains(DVec2::new(outside.x, outside.y)));
    }

    #[test]
    fn test_shape_kind() {
        let wire = Shape::from_curves(vec![
            Curve::Line {
                start: DVec3::ZERO,
                end: DVec3::X,
            },
            Curve::Line {
                start: DVec3::X,
                end: DVec3::Y,
            },
        ]);
        assert_eq!(wire.kind(), ShapeKind::Wire);
        assert_eq!(wire.dim(), Dim::One);
        let moved = wire.moved(&Location::from_xyz(0.0, 0.0, 1.0));
        assert_ne!(moved.id, wire.id);
        assert_relative_eq!(moved.curves()[0].start().z, 1.0);
    }
}
