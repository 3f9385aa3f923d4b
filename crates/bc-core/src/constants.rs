//! Global constants for bc-core

/// Default positional tolerance for placement de-duplication (mm)
pub const LINEAR_TOLERANCE: f64 = 1e-6;

/// Default rotational tolerance for placement de-duplication (rad)
pub const ANGULAR_TOLERANCE: f64 = 1e-6;

/// Default angular span of a polar array (degrees)
pub const FULL_TURN_DEGREES: f64 = 360.0;
