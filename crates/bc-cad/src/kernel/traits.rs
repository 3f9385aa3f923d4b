//! CAD Kernel trait definitions
//!
//! These traits define the interface the builder framework consumes from a
//! geometry engine.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::{Axis, BoundBox};
use crate::shape::{Dim, Shape};

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: Dim, right: Dim },

    #[error("Degenerate result: {0}")]
    Degenerate(String),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// Boolean operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanType {
    /// Union (add)
    Union,
    /// Subtraction (cut)
    Subtract,
    /// Intersection (common)
    Intersect,
}

/// Result of classifying a point against a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointClass {
    /// The point lies in the shape (on the curve, on the face, in the solid)
    Inside,
    /// The point lies outside the shape
    Outside,
}

/// The main CAD kernel trait
///
/// Implementations provide the geometry operations the builders delegate to.
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Perform a boolean operation on two shapes of equal dimension
    fn boolean(&self, a: &Shape, b: &Shape, op: BooleanType) -> CadResult<Shape>;

    /// Extrude a face along its normal
    ///
    /// # Arguments
    /// * `face` - The planar face to extrude
    /// * `amount` - Signed extrusion distance
    /// * `both` - Extrude symmetrically to both sides
    fn extrude(&self, face: &Shape, amount: f64, both: bool) -> CadResult<Shape>;

    /// Revolve a face around an axis lying in its plane
    ///
    /// # Arguments
    /// * `face` - The planar face to revolve
    /// * `axis` - The rotation axis
    /// * `degrees` - The rotation angle in degrees
    fn revolve(&self, face: &Shape, axis: &Axis, degrees: f64) -> CadResult<Shape>;

    /// Build faces from closed loops of edges
    fn make_face(&self, edges: &[Shape]) -> CadResult<Vec<Shape>>;

    /// Axis-aligned bounds of a shape
    fn bounding_box(&self, shape: &Shape) -> CadResult<BoundBox>;

    /// Length, area or volume depending on the shape's dimension
    fn measure(&self, shape: &Shape) -> CadResult<f64>;

    /// Classify a point against a shape
    fn classify(&self, shape: &Shape, point: DVec3) -> CadResult<PointClass>;

    /// Check that a shape is well formed and non-empty
    fn is_valid(&self, shape: &Shape) -> bool;
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

impl NullKernel {
    fn unavailable<T>() -> CadResult<T> {
        Err(CadError::KernelNotAvailable("No CAD kernel available".into()))
    }
}

impl CadKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn boolean(&self, _a: &Shape, _b: &Shape, _op: BooleanType) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn extrude(&self, _face: &Shape, _amount: f64, _both: bool) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn revolve(&self, _face: &Shape, _axis: &Axis, _degrees: f64) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn make_face(&self, _edges: &[Shape]) -> CadResult<Vec<Shape>> {
        Self::unavailable()
    }

    fn bounding_box(&self, _shape: &Shape) -> CadResult<BoundBox> {
        Self::unavailable()
    }

    fn measure(&self, _shape: &Shape) -> CadResult<f64> {
        Self::unavailable()
    }

    fn classify(&self, _shape: &Shape, _point: DVec3) -> CadResult<PointClass> {
        Self::unavailable()
    }

    fn is_valid(&self, _shape: &Shape) -> bool {
        false
    }
}

/// Get the default CAD kernel
pub fn default_kernel() -> Box<dyn CadKernel> {
    Box::new(super::CsgKernel::default())
}
