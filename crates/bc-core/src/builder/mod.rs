//! Builder contexts
//!
//! A [`Builder`] accumulates geometry of one topological dimension. Builders
//! are only created through a [`Session`], which keeps them on a stack while
//! their scope runs and hands the finished builder back to the caller.

mod session;

use bc_cad::{Dim, Plane, Shape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assembly::Part;
use crate::error::{BuildError, BuildResult, CallSite};
use crate::locations::LocationStack;
use crate::mode::Mode;

pub use session::{ConstructOptions, Session};

/// Kind of builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuilderKind {
    /// Accumulates edges
    Line,
    /// Accumulates planar faces
    Sketch,
    /// Accumulates solids
    Part,
}

impl BuilderKind {
    /// Dimension of the accumulated shape
    pub fn dim(self) -> Dim {
        match self {
            BuilderKind::Line => Dim::One,
            BuilderKind::Sketch => Dim::Two,
            BuilderKind::Part => Dim::Three,
        }
    }

    /// Whether objects of `dim` may be constructed in this builder
    pub fn accepts(self, dim: Dim) -> bool {
        dim <= self.dim()
    }
}

/// Identifier of a builder, usable as an explicit construction target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuilderId(Uuid);

impl BuilderId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// How a finished sketch folds into an enclosing part builder
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SketchFold {
    /// Faces become pending faces of the part, consumed by a later operation
    #[default]
    Pending,
    /// Faces are extruded and the solids folded with the sketch's mode
    Extrude {
        /// Extrusion distance along the face normal
        amount: f64,
        /// Extrude symmetrically to both sides
        both: bool,
    },
}

/// Options of a builder context
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderOptions {
    /// Mode used to fold the finished shape into the enclosing builder
    pub mode: Mode,
    /// Mode for constructions that do not name one
    pub default_mode: Mode,
    /// Workplanes objects are placed on (line and part builders) or the
    /// finished sketch is placed on (sketch builders)
    pub workplanes: Vec<Plane>,
    /// Sketch-into-part fold rule
    pub sketch_fold: SketchFold,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Add,
            default_mode: Mode::Add,
            workplanes: vec![Plane::XY],
            sketch_fold: SketchFold::Pending,
        }
    }
}

impl BuilderOptions {
    /// Set the exit fold mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the default construction mode
    pub fn with_default_mode(mut self, mode: Mode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Replace the workplanes
    pub fn with_workplanes(mut self, workplanes: impl IntoIterator<Item = Plane>) -> Self {
        self.workplanes = workplanes.into_iter().collect();
        self
    }

    /// Set the sketch-into-part fold rule
    pub fn with_sketch_fold(mut self, fold: SketchFold) -> Self {
        self.sketch_fold = fold;
        self
    }
}

/// One entry of a builder's fold log
#[derive(Debug, Clone, PartialEq)]
pub struct FoldRecord {
    /// Name of the constructed object
    pub object: String,
    /// Dimension of the constructed shapes
    pub dim: Dim,
    /// Mode applied
    pub mode: Mode,
    /// Number of placed instances
    pub instances: usize,
}

/// A scoped geometry accumulator
#[derive(Debug, Clone)]
pub struct Builder {
    id: BuilderId,
    kind: BuilderKind,
    options: BuilderOptions,
    pub(crate) shape: Option<Shape>,
    pub(crate) pending_edges: Vec<Shape>,
    pub(crate) pending_faces: Vec<Shape>,
    pub(crate) private: Vec<Shape>,
    pub(crate) last: Vec<Shape>,
    pub(crate) log: Vec<FoldRecord>,
    pub(crate) locations: LocationStack,
}

impl Builder {
    pub(crate) fn new(kind: BuilderKind, options: BuilderOptions) -> Self {
        Self {
            id: BuilderId::new(),
            kind,
            options,
            shape: None,
            pending_edges: Vec::new(),
            pending_faces: Vec::new(),
            private: Vec::new(),
            last: Vec::new(),
            log: Vec::new(),
            locations: LocationStack::new(),
        }
    }

    /// Identifier
    pub fn id(&self) -> BuilderId {
        self.id
    }

    /// Kind
    pub fn kind(&self) -> BuilderKind {
        self.kind
    }

    /// Options the builder was opened with
    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Accumulated shape
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// Edges waiting for an operation
    pub fn pending_edges(&self) -> &[Shape] {
        &self.pending_edges
    }

    /// Faces waiting for an operation
    pub fn pending_faces(&self) -> &[Shape] {
        &self.pending_faces
    }

    /// Shapes constructed with [`Mode::Private`]
    pub fn private_shapes(&self) -> &[Shape] {
        &self.private
    }

    /// Shapes produced by the most recent construction or operation
    pub fn last_shapes(&self) -> &[Shape] {
        &self.last
    }

    /// Folds in construction order
    pub fn fold_log(&self) -> &[FoldRecord] {
        &self.log
    }

    /// The builder's location stack
    pub fn location_stack(&self) -> &LocationStack {
        &self.locations
    }

    /// Take the accumulated shape
    pub fn into_shape(self) -> Option<Shape> {
        self.shape
    }

    /// Convert a finished part builder into a [`Part`] at the identity
    /// placement
    #[track_caller]
    pub fn into_part(self, label: impl Into<String>) -> BuildResult<Part> {
        let site = CallSite::caller();
        match self.shape {
            Some(shape) if shape.dim() == Dim::Three => Ok(Part::new(label, shape)),
            Some(shape) => Err(BuildError::IncompatibleDimension {
                object: "part".into(),
                dim: shape.dim(),
                kind: self.kind,
                site,
            }),
            None => Err(BuildError::DegenerateGeometry {
                kind: self.kind,
                reason: "builder has no shape".into(),
                site,
            }),
        }
    }
}
