//! Two-dimensional objects
//!
//! All sketch objects live on the sketch-local XY plane.

use std::f64::consts::TAU;

use bc_cad::{Align, CadError, CadKernel, CadResult, Dim, Plane, Region, Shape};
use glam::{DAffine2, DVec2};

use super::{BuildObject, aligned, require_positive};

fn planar_face(
    kernel: &dyn CadKernel,
    region: Region,
    rotation: f64,
    align: [Align; 2],
) -> CadResult<Shape> {
    let region = region.placed(DAffine2::from_angle(rotation.to_radians()));
    let face = Shape::from_region(Plane::XY, region);
    aligned(kernel, face, [align[0], align[1], Align::Center])
}

/// Axis-aligned rectangle
#[derive(Debug, Clone)]
pub struct Rectangle {
    width: f64,
    height: f64,
    rotation: f64,
    align: [Align; 2],
}

impl Rectangle {
    /// Centered rectangle
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            rotation: 0.0,
            align: [Align::Center; 2],
        }
    }

    /// Rotate about the sketch Z axis (degrees)
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the alignment
    pub fn with_align(mut self, align: [Align; 2]) -> Self {
        self.align = align;
        self
    }
}

impl BuildObject for Rectangle {
    fn name(&self) -> &str {
        "Rectangle"
    }

    fn dim(&self) -> Dim {
        Dim::Two
    }

    fn shape(&self, kernel: &dyn CadKernel) -> CadResult<Shape> {
        require_positive("width", self.width)?;
        require_positive("height", self.height)?;
        let region = Region::Rect {
            width: self.width,
            height: self.height,
        };
        planar_face(kernel, region, self.rotation, self.align)
    }
}

/// Circle
#[derive(Debug, Clone)]
pub struct Circle {
    radius: f64,
    align: [Align; 2],
}

impl Circle {
    /// Centered circle
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            align: [Align::Center; 2],
        }
    }

    /// Set the alignment
    pub fn with_align(mut self, align: [Align; 2]) -> Self {
        self.align = align;
        self
    }
}

impl BuildObject for Circle {
    fn name(&self) -> &str {
        "Circle"
    }

    fn dim(&self) -> Dim {
        Dim::Two
    }

    fn shape(&self, kernel: &dyn CadKernel) -> CadResult<Shape> {
        require_positive("radius", self.radius)?;
        planar_face(kernel, Region::Circle { radius: self.radius }, 0.0, self.align)
    }
}

/// Ellipse
#[derive(Debug, Clone)]
pub struct Ellipse {
    x_radius: f64,
    y_radius: f64,
    rotation: f64,
    align: [Align; 2],
}

impl Ellipse {
    /// Centered ellipse
    pub fn new(x_radius: f64, y_radius: f64) -> Self {
        Self {
            x_radius,
            y_radius,
            rotation: 0.0,
            align: [Align::Center; 2],
        }
    }

    /// Rotate about the sketch Z axis (degrees)
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the alignment
    pub fn with_align(mut self, align: [Align; 2]) -> Self {
        self.align = align;
        self
    }
}

impl BuildObject for Ellipse {
    fn name(&self) -> &str {
        "Ellipse"
    }

    fn dim(&self) -> Dim {
        Dim::Two
    }

    fn shape(&self, kernel: &dyn CadKernel) -> CadResult<Shape> {
        require_positive("x_radius", self.x_radius)?;
        require_positive("y_radius", self.y_radius)?;
        let region = Region::Ellipse {
            x_radius: self.x_radius,
            y_radius: self.y_radius,
        };
        planar_face(kernel, region, self.rotation, self.align)
    }
}

/// Polygon through the given points
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<DVec2>,
    rotation: f64,
    align: [Align; 2],
}

impl Polygon {
    /// Polygon, implicitly closed
    pub fn new(points: impl IntoIterator<Item = DVec2>) -> Self {
        Self {
            points: points.into_iter().collect(),
            rotation: 0.0,
            align: [Align::Center; 2],
        }
    }

    /// Rotate about the sketch Z axis (degrees)
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the alignment
    pub fn with_align(mut self, align: [Align; 2]) -> Self {
        self.align = align;
        self
    }
}

impl BuildObject for Polygon {
    fn name(&self) -> &str {
        "Polygon"
    }

    fn dim(&self) -> Dim {
        Dim::Two
    }

    fn shape(&self, kernel: &dyn CadKernel) -> CadResult<Shape> {
        if self.points.len() < 3 {
            return Err(CadError::InvalidProfile(
                "Polygon needs at least three points".into(),
            ));
        }
        let region = Region::Polygon {
            points: self.points.clone(),
        };
        planar_face(kernel, region, self.rotation, self.align)
    }
}

/// Regular polygon inscribed in (or circumscribing) a circle
#[derive(Debug, Clone)]
pub struct RegularPolygon {
    radius: f64,
    side_count: u32,
    major_radius: bool,
    rotation: f64,
    align: [Align; 2],
}

impl RegularPolygon {
    /// Polygon whose vertices lie on a circle of `radius`
    pub fn new(radius: f64, side_count: u32) -> Self {
        Self {
            radius,
            side_count,
            major_radius: true,
            rotation: 0.0,
            align: [Align::Center; 2],
        }
    }

    /// Interpret the radius as the apothem instead of the circumradius
    pub fn with_minor_radius(mut self) -> Self {
        self.major_radius = false;
        self
    }

    /// Rotate about the sketch Z axis (degrees)
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the alignment
    pub fn with_align(mut self, align: [Align; 2]) -> Self {
        self.align = align;
        self
    }
}

impl BuildObject for RegularPolygon {
    fn name(&self) -> &str {
        "RegularPolygon"
    }

    fn dim(&self) -> Dim {
        Dim::Two
    }

    fn shape(&self, kernel: &dyn CadKernel) -> CadResult<Shape> {
        require_positive("radius", self.radius)?;
        if self.side_count < 3 {
            return Err(CadError::InvalidParameter(format!(
                "RegularPolygon needs at least three sides, got {}",
                self.side_count
            )));
        }
        let n = self.side_count as f64;
        let circumradius = if self.major_radius {
            self.radius
        } else {
            self.radius / (std::f64::consts::PI / n).cos()
        };
        let points = (0..self.side_count)
            .map(|i| {
                let a = TAU * i as f64 / n;
                DVec2::new(a.cos(), a.sin()) * circumradius
            })
            .collect();
        planar_face(kernel, Region::Polygon { points }, self.rotation, self.align)
    }
}
