//! Construction objects
//!
//! Objects describe a shape in builder-local coordinates. A [`Session`]
//! resolves the target builder, places one instance per active location and
//! folds the instances in.
//!
//! [`Session`]: crate::Session

mod curve;
mod hole;
mod part;
mod sketch;

use bc_cad::{Align, CadKernel, CadResult, Dim, Location, Shape};

use crate::mode::Mode;

pub use curve::{CenterArc, Line, PolarLine, Polyline};
pub use hole::{CounterBoreHole, CounterSinkHole, Hole};
pub use part::{Cone, Cuboid, Cylinder, Sphere, Torus};
pub use sketch::{Circle, Ellipse, Polygon, Rectangle, RegularPolygon};

/// Something that can be constructed inside a builder
pub trait BuildObject {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Dimension of the produced shape
    fn dim(&self) -> Dim;

    /// Produce the shape in builder-local coordinates
    fn shape(&self, kernel: &dyn CadKernel) -> CadResult<Shape>;

    /// Mode used when the call does not name one, instead of the builder's
    fn default_mode(&self) -> Option<Mode> {
        None
    }

    /// Produce the shape for a builder whose accumulated shape is `target`
    fn shape_in(&self, kernel: &dyn CadKernel, _target: Option<&Shape>) -> CadResult<Shape> {
        self.shape(kernel)
    }
}

/// Shift `shape` so its bounding box sits at `align` around the origin
pub(crate) fn aligned(kernel: &dyn CadKernel, shape: Shape, align: [Align; 3]) -> CadResult<Shape> {
    let bounds = kernel.bounding_box(&shape)?;
    let offset = bounds.align_offset(align);
    if offset.length_squared() == 0.0 {
        return Ok(shape);
    }
    Ok(shape.moved(&Location::from_translation(offset)))
}

pub(crate) fn require_positive(name: &str, value: f64) -> CadResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(bc_cad::CadError::InvalidParameter(format!(
            "{name} must be positive, got {value}"
        )))
    }
}
