//! Unit constants
//!
//! Lengths are expressed in millimetres, masses in grams.

/// Millimetre
pub const MM: f64 = 1.0;
/// Centimetre
pub const CM: f64 = 10.0 * MM;
/// Metre
pub const M: f64 = 1000.0 * MM;
/// Inch
pub const IN: f64 = 25.4 * MM;
/// Foot
pub const FT: f64 = 12.0 * IN;

/// Gram
pub const G: f64 = 1.0;
/// Kilogram
pub const KG: f64 = 1000.0 * G;
/// Pound
pub const LB: f64 = 453.592_37 * G;
