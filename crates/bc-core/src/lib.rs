//! Builder Context Core
//!
//! This crate contains the context-driven construction layer:
//! - Session: stack of line, sketch and part builders
//! - Mode: how new geometry merges into a builder
//! - Locations: stacked placement generators
//! - Objects and operations that feed builders
//! - Joints, placed parts and assemblies

pub mod assembly;
pub mod builder;
pub mod config;
pub mod constants;
pub mod error;
pub mod joint;
pub mod locations;
pub mod mode;
pub mod objects;
pub mod operations;

pub use assembly::*;
pub use builder::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use joint::*;
pub use locations::*;
pub use mode::*;
pub use objects::*;
pub use operations::*;
