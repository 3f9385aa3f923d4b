//! CAD Kernel Abstraction and Geometry Values
//!
//! This crate provides:
//! - Placement and reference geometry (locations, planes, axes, bounds)
//! - Shape values carried between builders (edges, faces, solids)
//! - Abstract CAD kernel trait for boolean, extrude, revolve and queries
//! - A CSG reference kernel usable without an external engine
//! - Unit constants

pub mod geom;
pub mod kernel;
pub mod shape;
pub mod units;

// Re-exports for convenience
pub use geom::{Align, Axis, BoundBox, Location, Plane};
pub use kernel::{
    BooleanType, CadError, CadKernel, CadResult, CsgKernel, CsgSettings, NullKernel, PointClass,
    default_kernel,
};
pub use shape::{Curve, Dim, Geometry, Region, Shape, ShapeKind, Volume};
