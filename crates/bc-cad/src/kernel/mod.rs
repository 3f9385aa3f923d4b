//! CAD kernel abstraction
//!
//! The builders talk to geometry through [`CadKernel`]. [`CsgKernel`] is the
//! built-in reference engine, [`NullKernel`] stands in when none is wanted.

mod csg;
mod traits;

pub use csg::{CsgKernel, CsgSettings};
pub use traits::{
    BooleanType, CadError, CadKernel, CadResult, NullKernel, PointClass, default_kernel,
};
