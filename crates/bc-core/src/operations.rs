//! Operations on pending geometry
//!
//! Operations consume the pending edges or faces of a builder, hand them to
//! the kernel and fold the results back in.

use bc_cad::{Axis, Dim, Plane, Shape};
use tracing::debug;

use crate::builder::Session;
use crate::error::{BuildError, BuildResult, CallSite};
use crate::mode::Mode;

/// Build faces from the pending edges of the nearest sketch or part builder
#[derive(Debug, Clone, Default)]
pub struct MakeFace {
    /// Mode, instead of the builder's default mode
    pub mode: Option<Mode>,
}

/// Extrude faces into solids in the nearest part builder
#[derive(Debug, Clone)]
pub struct Extrude {
    /// Distance along the face normal
    pub amount: f64,
    /// Extrude symmetrically to both sides
    pub both: bool,
    /// Mode, instead of the builder's default mode
    pub mode: Option<Mode>,
    /// Faces to extrude, instead of the builder's pending faces
    pub faces: Option<Vec<Shape>>,
}

impl Extrude {
    /// Extrude the pending faces by `amount`
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            both: false,
            mode: None,
            faces: None,
        }
    }

    /// Extrude to both sides
    pub fn both(mut self) -> Self {
        self.both = true;
        self
    }

    /// Set the mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Extrude these faces instead of the pending ones
    pub fn with_faces(mut self, faces: Vec<Shape>) -> Self {
        self.faces = Some(faces);
        self
    }
}

/// Revolve faces about an axis in the nearest part builder
#[derive(Debug, Clone)]
pub struct Revolve {
    /// Axis of revolution, lying in the face planes
    pub axis: Axis,
    /// Angle in degrees
    pub degrees: f64,
    /// Mode, instead of the builder's default mode
    pub mode: Option<Mode>,
    /// Faces to revolve, instead of the builder's pending faces
    pub faces: Option<Vec<Shape>>,
}

impl Revolve {
    /// Revolve the pending faces about `axis`
    pub fn new(axis: Axis, degrees: f64) -> Self {
        Self {
            axis,
            degrees,
            mode: None,
            faces: None,
        }
    }

    /// Set the mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Revolve these faces instead of the pending ones
    pub fn with_faces(mut self, faces: Vec<Shape>) -> Self {
        self.faces = Some(faces);
        self
    }
}

/// Reflect shapes through a plane in the builder's own coordinates
#[derive(Debug, Clone)]
pub struct Mirror {
    /// Mirror plane
    pub about: Plane,
    /// Mode, instead of the builder's default mode
    pub mode: Option<Mode>,
    /// Shapes to mirror, instead of the innermost builder's accumulated shape
    pub objects: Option<Vec<Shape>>,
}

impl Mirror {
    /// Mirror the accumulated shape about `about`
    pub fn new(about: Plane) -> Self {
        Self {
            about,
            mode: None,
            objects: None,
        }
    }

    /// Set the mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Mirror these shapes instead of the accumulated one
    pub fn with_objects(mut self, objects: Vec<Shape>) -> Self {
        self.objects = Some(objects);
        self
    }
}

impl Session<'_> {
    /// Turn pending edges into faces
    #[track_caller]
    pub fn make_face(&mut self, op: MakeFace) -> BuildResult<Vec<Shape>> {
        let site = CallSite::caller();
        let index = self.resolve(Dim::Two, None, "MakeFace", site)?;
        let edges = self.take_pending_edges(index);
        if edges.is_empty() {
            return Err(BuildError::MissingInput {
                operation: "MakeFace".into(),
                kind: self.builder_at(index).kind(),
                site,
            });
        }
        let faces = self.kernel().make_face(&edges)?;
        debug!(edges = edges.len(), faces = faces.len(), "make face");
        let mode = op
            .mode
            .unwrap_or(self.builder_at(index).options().default_mode);
        self.fold(index, "MakeFace", faces.clone(), mode, site)?;
        Ok(faces)
    }

    /// Extrude faces into solids
    #[track_caller]
    pub fn extrude(&mut self, op: Extrude) -> BuildResult<Vec<Shape>> {
        let site = CallSite::caller();
        let kernel = self.kernel();
        self.sweep_faces("Extrude", op.faces, op.mode, site, |face| {
            kernel.extrude(face, op.amount, op.both)
        })
    }

    /// Revolve faces into solids
    #[track_caller]
    pub fn revolve(&mut self, op: Revolve) -> BuildResult<Vec<Shape>> {
        let site = CallSite::caller();
        let kernel = self.kernel();
        self.sweep_faces("Revolve", op.faces, op.mode, site, |face| {
            kernel.revolve(face, &op.axis, op.degrees)
        })
    }

    /// Fold mirrored copies of shapes back into a builder
    #[track_caller]
    pub fn mirror(&mut self, op: Mirror) -> BuildResult<Vec<Shape>> {
        let site = CallSite::caller();
        let index = match op.objects.as_ref().and_then(|o| o.iter().map(Shape::dim).max()) {
            Some(dim) => self.resolve(dim, None, "Mirror", site)?,
            None => self
                .depth()
                .checked_sub(1)
                .ok_or_else(|| BuildError::NoActiveContext {
                    object: "Mirror".into(),
                    site,
                })?,
        };
        let objects = match op.objects {
            Some(objects) => objects,
            None => self.builder_at(index).shape().cloned().into_iter().collect(),
        };
        if objects.is_empty() {
            return Err(BuildError::MissingInput {
                operation: "Mirror".into(),
                kind: self.builder_at(index).kind(),
                site,
            });
        }
        let mirrored: Vec<Shape> = objects.iter().map(|s| s.mirrored(&op.about)).collect();
        debug!(count = mirrored.len(), "mirror");
        let mode = op
            .mode
            .unwrap_or(self.builder_at(index).options().default_mode);
        self.fold(index, "Mirror", mirrored.clone(), mode, site)?;
        Ok(mirrored)
    }

    fn sweep_faces<F>(
        &mut self,
        operation: &str,
        faces: Option<Vec<Shape>>,
        mode: Option<Mode>,
        site: CallSite,
        sweep: F,
    ) -> BuildResult<Vec<Shape>>
    where
        F: Fn(&Shape) -> bc_cad::CadResult<Shape>,
    {
        let index = self.resolve(Dim::Three, None, operation, site)?;
        let faces = match faces {
            Some(faces) => faces,
            None => self.take_pending_faces(index),
        };
        if faces.is_empty() {
            return Err(BuildError::MissingInput {
                operation: operation.into(),
                kind: self.builder_at(index).kind(),
                site,
            });
        }
        let solids = faces.iter().map(&sweep).collect::<Result<Vec<_>, _>>()?;
        debug!(operation, faces = faces.len(), "sweep faces");
        let mode = mode.unwrap_or(self.builder_at(index).options().default_mode);
        self.fold(index, operation, solids.clone(), mode, site)?;
        Ok(solids)
    }
}
