//! Builder errors

use std::fmt;

use bc_cad::{CadError, Dim};
use thiserror::Error;

use crate::builder::BuilderKind;
use crate::mode::Mode;

/// Source position of the user call that raised an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// Source file
    pub file: &'static str,
    /// Line number
    pub line: u32,
    /// Column number
    pub column: u32,
}

impl CallSite {
    /// Capture the location of the nearest non-`#[track_caller]` caller
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Errors raised by builders, location stacks and joints
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    #[error("No active builder for {object} at {site}")]
    NoActiveContext { object: String, site: CallSite },

    #[error("{mode} of {object} into an empty {kind:?} builder at {site}")]
    InvalidModeForEmptyBuilder {
        object: String,
        mode: Mode,
        kind: BuilderKind,
        site: CallSite,
    },

    #[error("Location generator {generator} produced no placements at {site}")]
    EmptyLocationSet { generator: String, site: CallSite },

    #[error("{kind:?} builder cannot accept {object} ({dim}) at {site}")]
    IncompatibleDimension {
        object: String,
        dim: Dim,
        kind: BuilderKind,
        site: CallSite,
    },

    #[error("Joint {joint}: value {value} outside [{min}, {max}]")]
    ParameterOutOfBounds {
        joint: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{kind:?} builder produced degenerate geometry: {reason} at {site}")]
    DegenerateGeometry {
        kind: BuilderKind,
        reason: String,
        site: CallSite,
    },

    #[error("Joint {joint}: {reason}")]
    InvalidJointParameter { joint: String, reason: String },

    #[error("Joints {parent} and {child} cannot be connected: {reason}")]
    IncompatibleJoints {
        parent: String,
        child: String,
        reason: String,
    },

    #[error("Joint not found: {0}")]
    JointNotFound(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("{operation} has nothing to consume in the {kind:?} builder at {site}")]
    MissingInput {
        operation: String,
        kind: BuilderKind,
        site: CallSite,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("CAD kernel error: {0}")]
    Cad(#[from] CadError),
}

/// Result type for builder operations
pub type BuildResult<T> = Result<T, BuildError>;
