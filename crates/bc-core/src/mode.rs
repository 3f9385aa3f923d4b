//! Mode algebra
//!
//! A [`Mode`] decides how a newly built shape merges into a builder's
//! accumulated result.
//!
//! `Add` and `Intersect` are associative and commutative over a sequence of
//! folds, so their result does not depend on construction order. `Subtract`
//! is order-dependent: `(A - B) + C` and `(A + C) - B` differ wherever `C`
//! overlaps `B`. Folds are always applied in construction order and never
//! reordered.

use std::fmt;

use bc_cad::{BooleanType, CadError, CadKernel, Shape};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Combination mode for a construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Union with the accumulated shape
    #[default]
    Add,
    /// Remove from the accumulated shape
    Subtract,
    /// Keep only the overlap with the accumulated shape
    Intersect,
    /// Discard the accumulated shape and keep the new one
    Replace,
    /// Keep the new shape aside without touching the accumulated shape
    Private,
}

impl Mode {
    /// Kernel boolean behind this mode, if any
    pub fn boolean_type(self) -> Option<BooleanType> {
        match self {
            Mode::Add => Some(BooleanType::Union),
            Mode::Subtract => Some(BooleanType::Subtract),
            Mode::Intersect => Some(BooleanType::Intersect),
            Mode::Replace | Mode::Private => None,
        }
    }

    /// Whether this mode needs a non-empty accumulated shape
    pub fn requires_accumulated(self) -> bool {
        matches!(self, Mode::Subtract | Mode::Intersect)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Add => "ADD",
            Mode::Subtract => "SUBTRACT",
            Mode::Intersect => "INTERSECT",
            Mode::Replace => "REPLACE",
            Mode::Private => "PRIVATE",
        };
        f.write_str(name)
    }
}

/// Outcome of a fold
#[derive(Debug, Clone)]
pub enum Fold {
    /// New accumulated shape
    Accumulate(Shape),
    /// Accumulated shape unchanged, shape kept aside
    Private(Shape),
}

/// Errors of the mode algebra
#[derive(Debug, Clone, Error)]
pub enum ModeError {
    #[error("{0} needs a non-empty accumulated shape")]
    EmptyAccumulator(Mode),

    #[error("Kernel error: {0}")]
    Kernel(#[from] CadError),
}

/// Fold `new_shape` into `accumulated` under `mode`
pub fn combine(
    kernel: &dyn CadKernel,
    accumulated: Option<&Shape>,
    new_shape: Shape,
    mode: Mode,
) -> Result<Fold, ModeError> {
    if mode == Mode::Private {
        return Ok(Fold::Private(new_shape));
    }
    let (Some(op), Some(current)) = (mode.boolean_type(), accumulated) else {
        return if mode.requires_accumulated() {
            Err(ModeError::EmptyAccumulator(mode))
        } else {
            Ok(Fold::Accumulate(new_shape))
        };
    };
    Ok(Fold::Accumulate(kernel.boolean(current, &new_shape, op)?))
}

/// Fold a sequence of shapes in order, starting from `accumulated`
pub fn combine_all(
    kernel: &dyn CadKernel,
    accumulated: Option<Shape>,
    shapes: impl IntoIterator<Item = (Shape, Mode)>,
) -> Result<(Option<Shape>, Vec<Shape>), ModeError> {
    let mut current = accumulated;
    let mut private = Vec::new();
    for (shape, mode) in shapes {
        match combine(kernel, current.as_ref(), shape, mode)? {
            Fold::Accumulate(next) => current = Some(next),
            Fold::Private(shape) => private.push(shape),
        }
    }
    Ok((current, private))
}
