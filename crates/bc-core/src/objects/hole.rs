//! Holes drilled down the local -Z axis
//!
//! Hole objects subtract by default. Without an explicit depth they cut
//! through the whole accumulated part: the depth is the diagonal of the
//! part's bounding box.

use bc_cad::{CadError, CadKernel, CadResult, Dim, Location, Shape, Volume};

use super::{BuildObject, require_positive};
use crate::mode::Mode;

/// Depth to drill, falling back to the target's bounding box diagonal
fn resolve_depth(
    name: &str,
    depth: Option<f64>,
    kernel: &dyn CadKernel,
    target: Option<&Shape>,
) -> CadResult<f64> {
    let depth = match (depth, target) {
        (Some(depth), _) => depth,
        (None, Some(target)) => kernel.bounding_box(target)?.size().length(),
        (None, None) => {
            return Err(CadError::InvalidParameter(format!(
                "{name} without a depth needs a non-empty part to drill through"
            )));
        }
    };
    require_positive("depth", depth)?;
    Ok(depth)
}

/// Cylinder of `radius` spanning `top - height ..= top` along Z
fn bore(radius: f64, height: f64, top: f64) -> Volume {
    Volume::Cylinder { radius, height }.placed(Location::from_xyz(0.0, 0.0, top - height / 2.0))
}

fn drilled(kernel: &dyn CadKernel, name: &str, volume: Volume) -> CadResult<Shape> {
    let solid = Shape::from_volume(volume).with_label(name);
    if !kernel.is_valid(&solid) {
        return Err(CadError::Degenerate(format!("{name} has no volume")));
    }
    Ok(solid)
}

macro_rules! hole_object {
    ($ty:ident) => {
        impl $ty {
            /// Drill to this depth instead of through the part
            pub fn with_depth(mut self, depth: f64) -> Self {
                self.depth = Some(depth);
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

            fn default_mode(&self) -> Option<Mode> {
                Some(Mode::Subtract)
            }

            fn shape(&self, kernel: &dyn CadKernel) -> CadResult<Shape> {
                self.shape_in(kernel, None)
            }

            fn shape_in(&self, kernel: &dyn CadKernel, target: Option<&Shape>) -> CadResult<Shape> {
                let depth = resolve_depth(self.name(), self.depth, kernel, target)?;
                drilled(kernel, self.name(), self.volume(depth)?)
            }
        }
    };
}

/// Plain cylindrical hole
#[derive(Debug, Clone)]
pub struct Hole {
    radius: f64,
    depth: Option<f64>,
}

impl Hole {
    /// Through hole of `radius`
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            depth: None,
        }
    }

    fn volume(&self, depth: f64) -> CadResult<Volume> {
        require_positive("radius", self.radius)?;
        Ok(bore(self.radius, depth, 0.0))
    }
}

hole_object!(Hole);

/// Hole with a wider flat-bottomed recess at the top
#[derive(Debug, Clone)]
pub struct CounterBoreHole {
    radius: f64,
    counter_bore_radius: f64,
    counter_bore_depth: f64,
    depth: Option<f64>,
}

impl CounterBoreHole {
    /// Through hole with a counterbore
    pub fn new(radius: f64, counter_bore_radius: f64, counter_bore_depth: f64) -> Self {
        Self {
            radius,
            counter_bore_radius,
            counter_bore_depth,
            depth: None,
        }
    }

    fn volume(&self, depth: f64) -> CadResult<Volume> {
        require_positive("radius", self.radius)?;
        require_positive("counter_bore_depth", self.counter_bore_depth)?;
        if self.counter_bore_radius <= self.radius {
            return Err(CadError::InvalidParameter(format!(
                "counterbore radius {} must exceed the hole radius {}",
                self.counter_bore_radius, self.radius
            )));
        }
        Ok(Volume::Union(
            Box::new(bore(self.radius, depth, 0.0)),
            Box::new(bore(self.counter_bore_radius, self.counter_bore_depth, 0.0)),
        ))
    }
}

hole_object!(CounterBoreHole);

/// Hole with a conical recess at the top
#[derive(Debug, Clone)]
pub struct CounterSinkHole {
    radius: f64,
    counter_sink_radius: f64,
    counter_sink_angle: f64,
    depth: Option<f64>,
}

impl CounterSinkHole {
    /// Through hole with a countersink of 82 degrees included angle
    pub fn new(radius: f64, counter_sink_radius: f64) -> Self {
        Self {
            radius,
            counter_sink_radius,
            counter_sink_angle: 82.0,
            depth: None,
        }
    }

    /// Included angle of the countersink cone in degrees
    pub fn with_angle(mut self, degrees: f64) -> Self {
        self.counter_sink_angle = degrees;
        self
    }

    fn volume(&self, depth: f64) -> CadResult<Volume> {
        require_positive("radius", self.radius)?;
        if self.counter_sink_radius <= self.radius {
            return Err(CadError::InvalidParameter(format!(
                "countersink radius {} must exceed the hole radius {}",
                self.counter_sink_radius, self.radius
            )));
        }
        if !(self.counter_sink_angle > 0.0 && self.counter_sink_angle < 180.0) {
            return Err(CadError::InvalidParameter(format!(
                "countersink angle must lie in (0, 180), got {}",
                self.counter_sink_angle
            )));
        }
        let height = (self.counter_sink_radius - self.radius)
            / (self.counter_sink_angle / 2.0).to_radians().tan();
        let sink = Volume::Cone {
            bottom_radius: self.radius,
            top_radius: self.counter_sink_radius,
            height,
        }
        .placed(Location::from_xyz(0.0, 0.0, -height / 2.0));
        Ok(Volume::Union(
            Box::new(bore(self.radius, depth, 0.0)),
            Box::new(sink),
        ))
    }
}

hole_object!(CounterSinkHole);
