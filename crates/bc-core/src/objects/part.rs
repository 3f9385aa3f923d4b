//! Three-dimensional objects

use bc_cad::{Align, CadError, CadKernel, CadResult, Dim, Shape, Volume};

use super::{BuildObject, aligned, require_positive};

macro_rules! solid_object {
    ($ty:ident) => {
        impl $ty {
            /// Set the alignment
            pub fn with_align(mut self, align: [Align; 3]) -> Self {
                self.align = align;
                self
            }
        }

        impl BuildObject for $ty {
            fn name(&self) -> &str {
                stringify!($ty)
            }

            fn dim(&self) -> Dim {
                Dim::Three
            }

            fn shape(&self, kernel: &dyn CadKernel) -> CadResult<Shape> {
                let solid = Shape::from_volume(self.volume()?);
                aligned(kernel, solid, self.align)
            }
        }
    };
}

/// Rectangular box
#[derive(Debug, Clone)]
pub struct Cuboid {
    length: f64,
    width: f64,
    height: f64,
    align: [Align; 3],
}

impl Cuboid {
    /// Centered box with extents along X, Y and Z
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            align: [Align::Center; 3],
        }
    }

    fn volume(&self) -> CadResult<Volume> {
        require_positive("length", self.length)?;
        require_positive("width", self.width)?;
        require_positive("height", self.height)?;
        Ok(Volume::Cuboid {
            length: self.length,
            width: self.width,
            height: self.height,
        })
    }
}

solid_object!(Cuboid);

/// Cylinder along Z
#[derive(Debug, Clone)]
pub struct Cylinder {
    radius: f64,
    height: f64,
    align: [Align; 3],
}

impl Cylinder {
    /// Centered cylinder
    pub fn new(radius: f64, height: f64) -> Self {
        Self {
            radius,
            height,
            align: [Align::Center; 3],
        }
    }

    fn volume(&self) -> CadResult<Volume> {
        require_positive("radius", self.radius)?;
        require_positive("height", self.height)?;
        Ok(Volume::Cylinder {
            radius: self.radius,
            height: self.height,
        })
    }
}

solid_object!(Cylinder);

/// Sphere
#[derive(Debug, Clone)]
pub struct Sphere {
    radius: f64,
    align: [Align; 3],
}

impl Sphere {
    /// Centered sphere
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            align: [Align::Center; 3],
        }
    }

    fn volume(&self) -> CadResult<Volume> {
        require_positive("radius", self.radius)?;
        Ok(Volume::Sphere {
            radius: self.radius,
        })
    }
}

solid_object!(Sphere);

/// Truncated cone along Z
#[derive(Debug, Clone)]
pub struct Cone {
    bottom_radius: f64,
    top_radius: f64,
    height: f64,
    align: [Align; 3],
}

impl Cone {
    /// Centered cone; one of the radii may be zero
    pub fn new(bottom_radius: f64, top_radius: f64, height: f64) -> Self {
        Self {
            bottom_radius,
            top_radius,
            height,
            align: [Align::Center; 3],
        }
    }

    fn volume(&self) -> CadResult<Volume> {
        require_positive("height", self.height)?;
        if self.bottom_radius < 0.0
            || self.top_radius < 0.0
            || self.bottom_radius.max(self.top_radius) <= 0.0
        {
            return Err(CadError::InvalidParameter(format!(
                "Cone radii {} and {} must be non-negative and not both zero",
                self.bottom_radius, self.top_radius
            )));
        }
        Ok(Volume::Cone {
            bottom_radius: self.bottom_radius,
            top_radius: self.top_radius,
            height: self.height,
        })
    }
}

solid_object!(Cone);

/// Torus around Z
#[derive(Debug, Clone)]
pub struct Torus {
    major_radius: f64,
    minor_radius: f64,
    align: [Align; 3],
}

impl Torus {
    /// Centered torus
    pub fn new(major_radius: f64, minor_radius: f64) -> Self {
        Self {
            major_radius,
            minor_radius,
            align: [Align::Center; 3],
        }
    }

    fn volume(&self) -> CadResult<Volume> {
        require_positive("major_radius", self.major_radius)?;
        require_positive("minor_radius", self.minor_radius)?;
        if self.minor_radius >= self.major_radius {
            return Err(CadError::InvalidParameter(
                "Torus minor radius must be smaller than the major radius".into(),
            ));
        }
        Ok(Volume::Torus {
            major_radius: self.major_radius,
            minor_radius: self.minor_radius,
        })
    }
}

solid_object!(Torus);
