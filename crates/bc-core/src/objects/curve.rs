//! One-dimensional objects

use bc_cad::{CadError, CadKernel, CadResult, Curve, Dim, Location, Shape};
use glam::{DQuat, DVec3};

use super::{BuildObject, require_positive};

/// Straight segment between two points
#[derive(Debug, Clone)]
pub struct Line {
    start: DVec3,
    end: DVec3,
}

impl Line {
    /// Segment from `start` to `end`
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }
}

impl BuildObject for Line {
    fn name(&self) -> &str {
        "Line"
    }

    fn dim(&self) -> Dim {
        Dim::One
    }

    fn shape(&self, _kernel: &dyn CadKernel) -> CadResult<Shape> {
        if self.start.distance(self.end) == 0.0 {
            return Err(CadError::InvalidParameter("Line has zero length".into()));
        }
        Ok(Shape::from_curves(vec![Curve::Line {
            start: self.start,
            end: self.end,
        }]))
    }
}

/// Chain of segments through a list of points
#[derive(Debug, Clone)]
pub struct Polyline {
    points: Vec<DVec3>,
    close: bool,
}

impl Polyline {
    /// Open chain
    pub fn new(points: impl IntoIterator<Item = DVec3>) -> Self {
        Self {
            points: points.into_iter().collect(),
            close: false,
        }
    }

    /// Add a closing segment back to the first point
    pub fn closed(mut self) -> Self {
        self.close = true;
        self
    }
}

impl BuildObject for Polyline {
    fn name(&self) -> &str {
        "Polyline"
    }

    fn dim(&self) -> Dim {
        Dim::One
    }

    fn shape(&self, _kernel: &dyn CadKernel) -> CadResult<Shape> {
        if self.points.len() < 2 {
            return Err(CadError::InvalidParameter(
                "Polyline needs at least two points".into(),
            ));
        }
        let mut points = self.points.clone();
        if self.close {
            points.push(self.points[0]);
        }
        let curves: Vec<Curve> = points
            .windows(2)
            .filter(|w| w[0] != w[1])
            .map(|w| Curve::Line {
                start: w[0],
                end: w[1],
            })
            .collect();
        if curves.is_empty() {
            return Err(CadError::InvalidParameter("Polyline has zero length".into()));
        }
        Ok(Shape::from_curves(curves))
    }
}

/// Segment of given length leaving `start` at an angle in the XY plane
#[derive(Debug, Clone)]
pub struct PolarLine {
    start: DVec3,
    length: f64,
    angle: f64,
}

impl PolarLine {
    /// `angle` in degrees from the X axis
    pub fn new(start: DVec3, length: f64, angle: f64) -> Self {
        Self {
            start,
            length,
            angle,
        }
    }
}

impl BuildObject for PolarLine {
    fn name(&self) -> &str {
        "PolarLine"
    }

    fn dim(&self) -> Dim {
        Dim::One
    }

    fn shape(&self, _kernel: &dyn CadKernel) -> CadResult<Shape> {
        if self.length == 0.0 {
            return Err(CadError::InvalidParameter("PolarLine has zero length".into()));
        }
        let a = self.angle.to_radians();
        let end = self.start + DVec3::new(a.cos(), a.sin(), 0.0) * self.length;
        Ok(Shape::from_curves(vec![Curve::Line {
            start: self.start,
            end,
        }]))
    }
}

/// Circular arc around a center in the XY plane
#[derive(Debug, Clone)]
pub struct CenterArc {
    center: DVec3,
    radius: f64,
    start_angle: f64,
    arc_size: f64,
}

impl CenterArc {
    /// Arc from `start_angle` sweeping `arc_size` degrees (negative sweeps
    /// clockwise)
    pub fn new(center: DVec3, radius: f64, start_angle: f64, arc_size: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            arc_size,
        }
    }
}

impl BuildObject for CenterArc {
    fn name(&self) -> &str {
        "CenterArc"
    }

    fn dim(&self) -> Dim {
        Dim::One
    }

    fn shape(&self, _kernel: &dyn CadKernel) -> CadResult<Shape> {
        require_positive("radius", self.radius)?;
        if self.arc_size == 0.0 || self.arc_size.abs() > 360.0 {
            return Err(CadError::InvalidParameter(format!(
                "Arc size {} must be in [-360, 360] and non-zero",
                self.arc_size
            )));
        }
        Ok(Shape::from_curves(vec![Curve::Arc {
            frame: Location::new(self.center, DQuat::IDENTITY),
            radius: self.radius,
            start_angle: self.start_angle.to_radians(),
            sweep: self.arc_size.to_radians(),
        }]))
    }
}
