//! Builder session
//!
//! A [`Session`] owns the builder stack of one construction. Builder scopes
//! are closures run against the session; the scope guard pops the builder on
//! every exit path, so a failed or panicking scope never leaves stale
//! builders behind.

use bc_cad::{CadError, CadKernel, Dim, Location, Shape};
use tracing::{debug, trace, warn};

use super::{Builder, BuilderId, BuilderKind, BuilderOptions, FoldRecord, SketchFold};
use crate::config::BuildConfig;
use crate::error::{BuildError, BuildResult, CallSite};
use crate::locations::{LocationGenerator, dedup_locations};
use crate::mode::{Fold, Mode, ModeError, combine, combine_all};
use crate::objects::BuildObject;

/// Per-call construction options
#[derive(Debug, Clone, Default)]
pub struct ConstructOptions {
    /// Builder to construct in, instead of the nearest compatible one
    pub target: Option<BuilderId>,
    /// Mode, instead of the target's default mode
    pub mode: Option<Mode>,
    /// Placements, instead of the target's location stack
    pub locations: Option<Vec<Location>>,
}

impl ConstructOptions {
    /// Construct with `mode`
    pub fn mode(mode: Mode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    /// Construct in `target`
    pub fn target(target: BuilderId) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    /// Construct at `locations`
    pub fn locations(locations: impl IntoIterator<Item = Location>) -> Self {
        Self {
            locations: Some(locations.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Also set the mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Builder stack of one construction
pub struct Session<'k> {
    kernel: &'k dyn CadKernel,
    config: BuildConfig,
    stack: Vec<Builder>,
    aborted: Option<Builder>,
}

/// Pops builders above `depth` when dropped
struct BuilderScope<'s, 'k> {
    session: &'s mut Session<'k>,
    depth: usize,
}

impl BuilderScope<'_, '_> {
    fn take(&mut self) -> Option<Builder> {
        self.session.stack.truncate(self.depth + 1);
        if self.session.stack.len() == self.depth + 1 {
            self.session.stack.pop()
        } else {
            None
        }
    }
}

impl Drop for BuilderScope<'_, '_> {
    fn drop(&mut self) {
        self.session.stack.truncate(self.depth);
    }
}

/// Pops location entries of one builder above `depth` when dropped
struct LocationScope<'s, 'k> {
    session: &'s mut Session<'k>,
    builder: usize,
    depth: usize,
}

impl Drop for LocationScope<'_, '_> {
    fn drop(&mut self) {
        if let Some(builder) = self.session.stack.get_mut(self.builder) {
            builder.locations.truncate(self.depth);
        }
    }
}

impl<'k> Session<'k> {
    /// Session with the default configuration
    pub fn new(kernel: &'k dyn CadKernel) -> Self {
        Self::with_config(kernel, BuildConfig::default())
    }

    /// Session with an explicit configuration
    pub fn with_config(kernel: &'k dyn CadKernel, config: BuildConfig) -> Self {
        Self {
            kernel,
            config,
            stack: Vec::new(),
            aborted: None,
        }
    }

    /// Geometry kernel
    pub fn kernel(&self) -> &'k dyn CadKernel {
        self.kernel
    }

    /// Configuration
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Number of open builders
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Innermost open builder
    pub fn current(&self) -> Option<&Builder> {
        self.stack.last()
    }

    /// Open builder with the given id
    pub fn builder(&self, id: BuilderId) -> Option<&Builder> {
        self.stack.iter().find(|b| b.id() == id)
    }

    /// Partial state of the most recently aborted builder
    pub fn last_aborted(&self) -> Option<&Builder> {
        self.aborted.as_ref()
    }

    /// Run `scope` inside a line builder
    #[track_caller]
    pub fn build_line<F>(&mut self, options: BuilderOptions, scope: F) -> BuildResult<Builder>
    where
        F: FnOnce(&mut Session<'k>) -> BuildResult<()>,
    {
        self.enter(BuilderKind::Line, options, CallSite::caller(), scope)
    }

    /// Run `scope` inside a sketch builder
    #[track_caller]
    pub fn build_sketch<F>(&mut self, options: BuilderOptions, scope: F) -> BuildResult<Builder>
    where
        F: FnOnce(&mut Session<'k>) -> BuildResult<()>,
    {
        self.enter(BuilderKind::Sketch, options, CallSite::caller(), scope)
    }

    /// Run `scope` inside a part builder
    #[track_caller]
    pub fn build_part<F>(&mut self, options: BuilderOptions, scope: F) -> BuildResult<Builder>
    where
        F: FnOnce(&mut Session<'k>) -> BuildResult<()>,
    {
        self.enter(BuilderKind::Part, options, CallSite::caller(), scope)
    }

    fn enter<F>(
        &mut self,
        kind: BuilderKind,
        options: BuilderOptions,
        site: CallSite,
        scope: F,
    ) -> BuildResult<Builder>
    where
        F: FnOnce(&mut Session<'k>) -> BuildResult<()>,
    {
        if options.workplanes.is_empty() {
            return Err(BuildError::EmptyLocationSet {
                generator: "workplanes".into(),
                site,
            });
        }
        let depth = self.stack.len();
        let builder = Builder::new(kind, options);
        debug!(?kind, depth, id = ?builder.id(), "enter builder");
        self.stack.push(builder);

        let (result, builder) = {
            let mut guard = BuilderScope {
                session: &mut *self,
                depth,
            };
            let result = scope(&mut *guard.session);
            (result, guard.take())
        };
        let Some(builder) = builder else {
            return Err(BuildError::NoActiveContext {
                object: format!("{kind:?} builder"),
                site,
            });
        };

        if let Err(err) = result {
            return Err(self.abort(builder, err));
        }
        if let Some(shape) = builder.shape() {
            if !self.kernel.is_valid(shape) {
                let err = BuildError::DegenerateGeometry {
                    kind,
                    reason: format!("{:?} result is empty or invalid", shape.kind()),
                    site,
                };
                return Err(self.abort(builder, err));
            }
        }
        if let Err(err) = self.fold_into_parent(&builder, site) {
            return Err(self.abort(builder, err));
        }
        debug!(?kind, depth, folds = builder.fold_log().len(), "exit builder");
        Ok(builder)
    }

    fn abort(&mut self, builder: Builder, err: BuildError) -> BuildError {
        warn!(kind = ?builder.kind(), error = %err, "builder scope aborted");
        self.aborted = Some(builder);
        err
    }

    /// Run `scope` with the placements of `generator` pushed onto the
    /// innermost builder's location stack
    #[track_caller]
    pub fn locate<T, F>(&mut self, generator: &dyn LocationGenerator, scope: F) -> BuildResult<T>
    where
        F: FnOnce(&mut Session<'k>) -> BuildResult<T>,
    {
        let site = CallSite::caller();
        let index = match self.stack.len() {
            0 => {
                return Err(BuildError::NoActiveContext {
                    object: generator.name().to_string(),
                    site,
                });
            }
            n => n - 1,
        };
        let locations = &mut self.stack[index].locations;
        let depth = locations.depth();
        locations.push(generator)?;
        debug!(generator = generator.name(), depth = depth + 1, "push locations");

        let mut guard = LocationScope {
            session: &mut *self,
            builder: index,
            depth,
        };
        let result = scope(&mut *guard.session);
        drop(guard);
        result
    }

    /// Construct `object` in the nearest compatible builder
    #[track_caller]
    pub fn add(&mut self, object: &dyn BuildObject) -> BuildResult<Vec<Shape>> {
        self.add_with(object, ConstructOptions::default())
    }

    /// Construct `object` with per-call options
    #[track_caller]
    pub fn add_with(
        &mut self,
        object: &dyn BuildObject,
        options: ConstructOptions,
    ) -> BuildResult<Vec<Shape>> {
        let site = CallSite::caller();
        let dim = object.dim();
        let index = self.resolve(dim, options.target, object.name(), site)?;
        let shape = object.shape_in(self.kernel, self.stack[index].shape())?;
        let options = ConstructOptions {
            target: Some(self.stack[index].id()),
            mode: options.mode.or_else(|| object.default_mode()),
            ..options
        };
        self.place(object.name(), dim, shape, options, site)
    }

    /// Fold an existing shape as if it were constructed here
    #[track_caller]
    pub fn add_shape(&mut self, shape: Shape, options: ConstructOptions) -> BuildResult<Vec<Shape>> {
        let site = CallSite::caller();
        let name = shape.label.clone().unwrap_or_else(|| format!("{:?}", shape.kind()));
        self.place(&name, shape.dim(), shape, options, site)
    }

    fn place(
        &mut self,
        object: &str,
        dim: Dim,
        shape: Shape,
        options: ConstructOptions,
        site: CallSite,
    ) -> BuildResult<Vec<Shape>> {
        let index = self.resolve(dim, options.target, object, site)?;
        let placements = self.placements(index, options.locations, site)?;
        let mode = options
            .mode
            .unwrap_or(self.stack[index].options().default_mode);
        let instances: Vec<Shape> = placements.iter().map(|l| shape.moved(l)).collect();
        self.fold(index, object, instances.clone(), mode, site)?;
        Ok(instances)
    }

    /// Index of the builder that takes objects of `dim`
    pub(crate) fn resolve(
        &self,
        dim: Dim,
        target: Option<BuilderId>,
        object: &str,
        site: CallSite,
    ) -> BuildResult<usize> {
        match target {
            Some(id) => {
                let index = self
                    .stack
                    .iter()
                    .position(|b| b.id() == id)
                    .ok_or_else(|| BuildError::NoActiveContext {
                        object: object.to_string(),
                        site,
                    })?;
                let kind = self.stack[index].kind();
                if kind.accepts(dim) {
                    Ok(index)
                } else {
                    Err(BuildError::IncompatibleDimension {
                        object: object.to_string(),
                        dim,
                        kind,
                        site,
                    })
                }
            }
            None => self
                .stack
                .iter()
                .rposition(|b| b.kind().accepts(dim))
                .ok_or_else(|| BuildError::NoActiveContext {
                    object: object.to_string(),
                    site,
                }),
        }
    }

    /// Placements of builder `index`, composed with its workplanes
    fn placements(
        &self,
        index: usize,
        explicit: Option<Vec<Location>>,
        site: CallSite,
    ) -> BuildResult<Vec<Location>> {
        let builder = &self.stack[index];
        let tolerance = &self.config.tolerance;
        let locations = match explicit {
            Some(locations) if locations.is_empty() => {
                return Err(BuildError::EmptyLocationSet {
                    generator: "ConstructOptions".into(),
                    site,
                });
            }
            Some(locations) => locations,
            None => builder.locations.current_locations(tolerance),
        };
        let placed = match builder.kind() {
            BuilderKind::Sketch => locations.iter().map(Location::planar).collect(),
            BuilderKind::Line | BuilderKind::Part => builder
                .options()
                .workplanes
                .iter()
                .flat_map(|plane| {
                    let frame = plane.location();
                    locations.iter().map(move |l| frame * *l)
                })
                .collect(),
        };
        Ok(dedup_locations(placed, tolerance))
    }

    /// Fold placed instances into builder `index`
    pub(crate) fn fold(
        &mut self,
        index: usize,
        object: &str,
        instances: Vec<Shape>,
        mode: Mode,
        site: CallSite,
    ) -> BuildResult<()> {
        let Some(dim) = instances.first().map(Shape::dim) else {
            return Ok(());
        };
        let kernel = self.kernel;
        let builder = &mut self.stack[index];
        let kind = builder.kind();
        let to_build_error = |err: ModeError| match err {
            ModeError::EmptyAccumulator(mode) => BuildError::InvalidModeForEmptyBuilder {
                object: object.to_string(),
                mode,
                kind,
                site,
            },
            ModeError::Kernel(CadError::Degenerate(reason)) => BuildError::DegenerateGeometry {
                kind,
                reason,
                site,
            },
            ModeError::Kernel(err) => BuildError::Cad(err),
        };

        let count = instances.len();
        builder.last = instances.clone();
        if dim == kind.dim() {
            if mode == Mode::Replace {
                let batch = instances.into_iter().map(|s| (s, Mode::Add));
                let (union, _) = combine_all(kernel, None, batch).map_err(to_build_error)?;
                builder.shape = union;
            } else {
                for instance in instances {
                    match combine(kernel, builder.shape.as_ref(), instance, mode)
                        .map_err(to_build_error)?
                    {
                        Fold::Accumulate(shape) => builder.shape = Some(shape),
                        Fold::Private(shape) => builder.private.push(shape),
                    }
                }
            }
        } else if mode == Mode::Private {
            builder.private.extend(instances);
        } else if dim == Dim::One {
            builder.pending_edges.extend(instances);
        } else {
            builder.pending_faces.extend(instances);
        }

        trace!(object, ?kind, %dim, %mode, count, "fold");
        builder.log.push(FoldRecord {
            object: object.to_string(),
            dim,
            mode,
            instances: count,
        });
        Ok(())
    }

    fn fold_into_parent(&mut self, child: &Builder, site: CallSite) -> BuildResult<()> {
        let Some(shape) = child.shape() else {
            return Ok(());
        };
        let Some(index) = self
            .stack
            .iter()
            .rposition(|b| b.kind().accepts(shape.dim()))
        else {
            return Ok(());
        };
        let placements = self.placements(index, None, site)?;
        let parent_kind = self.stack[index].kind();
        let mode = child.options().mode;
        let object = format!("{:?} builder", child.kind());

        let instances = match (child.kind(), parent_kind, child.options().sketch_fold) {
            (BuilderKind::Sketch, BuilderKind::Part, fold) => {
                let faces: Vec<Shape> = placements
                    .iter()
                    .flat_map(|l| {
                        child
                            .options()
                            .workplanes
                            .iter()
                            .map(move |plane| shape.moved(&(*l * plane.location())))
                    })
                    .collect();
                match fold {
                    SketchFold::Pending => faces,
                    SketchFold::Extrude { amount, both } => faces
                        .iter()
                        .map(|face| self.kernel.extrude(face, amount, both))
                        .collect::<Result<Vec<_>, _>>()?,
                }
            }
            _ => placements.iter().map(|l| shape.moved(l)).collect(),
        };
        debug!(child = ?child.kind(), parent = ?parent_kind, %mode, count = instances.len(), "fold into parent");
        self.fold(index, &object, instances, mode, site)
    }

    /// Take the pending edges of builder `index`
    pub(crate) fn take_pending_edges(&mut self, index: usize) -> Vec<Shape> {
        std::mem::take(&mut self.stack[index].pending_edges)
    }

    /// Take the pending faces of builder `index`
    pub(crate) fn take_pending_faces(&mut self, index: usize) -> Vec<Shape> {
        std::mem::take(&mut self.stack[index].pending_faces)
    }

    /// Builder at stack position `index`
    pub(crate) fn builder_at(&self, index: usize) -> &Builder {
        &self.stack[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::{GridLocations, HexLocations, Locations, PolarLocations};
    use crate::objects::{Circle, Cuboid, Cylinder, Line, Rectangle, Sphere};
    use approx::assert_relative_eq;
    use bc_cad::{CsgKernel, NullKernel, Plane, PointClass, Volume};
    use glam::DVec3;

    #[test]
    fn test_add_without_builder() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let err = session.add(&Cuboid::new(1.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, BuildError::NoActiveContext { .. }));
        let err = session
            .locate(&Locations::new([Location::IDENTITY]), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, BuildError::NoActiveContext { .. }));
    }

    #[test]
    fn test_solid_in_sketch_has_no_context() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let err = session
            .build_sketch(BuilderOptions::default(), |s| {
                s.add(&Cuboid::new(1.0, 1.0, 1.0))?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, BuildError::NoActiveContext { .. }));
        assert_eq!(session.depth(), 0);
        assert!(session.last_aborted().is_some());
    }

    #[test]
    fn test_explicit_target_must_accept_dimension() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        session
            .build_part(BuilderOptions::default(), |s| {
                let Some(part) = s.current().map(Builder::id) else {
                    panic!("part builder must be open");
                };
                s.build_line(BuilderOptions::default(), |s| {
                    let line_id = s.current().map(Builder::id);
                    let err = s
                        .add_with(
                            &Cuboid::new(1.0, 1.0, 1.0),
                            ConstructOptions {
                                target: line_id,
                                ..ConstructOptions::default()
                            },
                        )
                        .unwrap_err();
                    assert!(matches!(err, BuildError::IncompatibleDimension { .. }));
                    // Solid goes to the outer part even though a line builder is innermost
                    s.add_with(&Cuboid::new(1.0, 1.0, 1.0), ConstructOptions::target(part))?;
                    s.add(&Line::new(DVec3::ZERO, DVec3::X))?;
                    Ok(())
                })?;
                Ok(())
            })
            .map(|part| {
                assert!(part.shape().is_some());
                assert_eq!(part.pending_edges().len(), 1);
            })
            .unwrap();
    }

    #[test]
    fn test_subtract_into_empty_builder() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let err = session
            .build_part(BuilderOptions::default(), |s| {
                s.add_with(&Cylinder::new(1.0, 2.0), ConstructOptions::mode(Mode::Subtract))?;
                Ok(())
            })
            .unwrap_err();
        match err {
            BuildError::InvalidModeForEmptyBuilder {
                mode, kind, site, ..
            } => {
                assert_eq!(mode, Mode::Subtract);
                assert_eq!(kind, BuilderKind::Part);
                assert!(site.file.ends_with("session.rs"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_grid_of_holes() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let plate = session
            .build_part(BuilderOptions::default(), |s| {
                s.add(&Cuboid::new(40.0, 30.0, 5.0))?;
                s.locate(&GridLocations::new(20.0, 10.0, 2, 2), |s| {
                    s.add_with(&Cylinder::new(2.0, 10.0), ConstructOptions::mode(Mode::Subtract))?;
                    assert_eq!(s.current().map(|b| b.last_shapes().len()), Some(4));
                    Ok(())
                })?;
                assert_eq!(s.current().map(|b| b.location_stack().depth()), Some(0));
                Ok(())
            })
            .unwrap();
        let shape = plate.shape().unwrap();
        for (x, y, class) in [
            (10.0, 5.0, PointClass::Outside),
            (-10.0, -5.0, PointClass::Outside),
            (0.0, 0.0, PointClass::Inside),
            (15.0, 12.0, PointClass::Inside),
        ] {
            assert_eq!(kernel.classify(shape, DVec3::new(x, y, 0.0)).unwrap(), class);
        }
        assert_eq!(plate.fold_log().len(), 2);
        assert_eq!(plate.fold_log()[1].instances, 4);
    }

    #[test]
    fn test_replace_keeps_only_last_batch() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let sketch = session
            .build_sketch(BuilderOptions::default(), |s| {
                s.add(&Rectangle::new(10.0, 10.0))?;
                s.add_with(
                    &Circle::new(1.0),
                    ConstructOptions::locations([
                        Location::from_xyz(-3.0, 0.0, 0.0),
                        Location::from_xyz(3.0, 0.0, 0.0),
                    ])
                    .with_mode(Mode::Replace),
                )?;
                Ok(())
            })
            .unwrap();
        let face = sketch.shape().unwrap();
        let at = |x: f64| kernel.classify(face, DVec3::new(x, 0.0, 0.0)).unwrap();
        assert_eq!(at(-3.0), PointClass::Inside);
        assert_eq!(at(3.0), PointClass::Inside);
        assert_eq!(at(0.0), PointClass::Outside);
    }

    #[test]
    fn test_private_objects_are_kept_aside() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let part = session
            .build_part(BuilderOptions::default(), |s| {
                s.add(&Cuboid::new(2.0, 2.0, 2.0))?;
                s.add_with(&Cuboid::new(9.0, 9.0, 9.0), ConstructOptions::mode(Mode::Private))?;
                s.add_with(&Circle::new(1.0), ConstructOptions::mode(Mode::Private))?;
                Ok(())
            })
            .unwrap();
        assert_eq!(part.private_shapes().len(), 2);
        assert!(part.pending_faces().is_empty());
        let bb = kernel.bounding_box(part.shape().unwrap()).unwrap();
        assert_relative_eq!(bb.max.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sketch_into_part_pending_then_extrude_option() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let part = session
            .build_part(BuilderOptions::default(), |s| {
                s.build_sketch(BuilderOptions::default(), |s| {
                    s.add(&Rectangle::new(4.0, 4.0))?;
                    Ok(())
                })?;
                assert_eq!(s.current().map(|b| b.pending_faces().len()), Some(1));
                assert!(s.current().and_then(Builder::shape).is_none());

                let extrude = SketchFold::Extrude {
                    amount: 2.0,
                    both: false,
                };
                s.build_sketch(BuilderOptions::default().with_sketch_fold(extrude), |s| {
                    s.add(&Circle::new(1.0))?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
        let solid = part.shape().unwrap();
        assert_eq!(
            kernel.classify(solid, DVec3::new(0.0, 0.0, 1.0)).unwrap(),
            PointClass::Inside
        );
        assert_eq!(
            kernel.classify(solid, DVec3::new(1.5, 0.0, 1.0)).unwrap(),
            PointClass::Outside
        );
        assert_eq!(part.pending_faces().len(), 1);
    }

    #[test]
    fn test_sketch_on_offset_workplane_in_polar_array() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let part = session
            .build_part(BuilderOptions::default(), |s| {
                s.locate(&PolarLocations::new(10.0, 4), |s| {
                    let options = BuilderOptions::default()
                        .with_workplanes([Plane::XY.offset(5.0)])
                        .with_sketch_fold(SketchFold::Extrude {
                            amount: 1.0,
                            both: false,
                        });
                    s.build_sketch(options, |s| {
                        s.add(&Circle::new(1.0))?;
                        Ok(())
                    })?;
                    Ok(())
                })
            })
            .unwrap();
        let solid = part.shape().unwrap();
        for (x, y) in [(10.0, 0.0), (0.0, 10.0), (-10.0, 0.0), (0.0, -10.0)] {
            assert_eq!(
                kernel.classify(solid, DVec3::new(x, y, 5.5)).unwrap(),
                PointClass::Inside
            );
        }
        assert_eq!(
            kernel.classify(solid, DVec3::new(10.0, 0.0, 0.5)).unwrap(),
            PointClass::Outside
        );
    }

    #[test]
    fn test_nested_part_folds_with_its_mode() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let outer = session
            .build_part(BuilderOptions::default(), |s| {
                s.add(&Cuboid::new(10.0, 10.0, 10.0))?;
                let inner = s.build_part(BuilderOptions::default().with_mode(Mode::Subtract), |s| {
                    s.add(&Cuboid::new(2.0, 2.0, 20.0))?;
                    Ok(())
                })?;
                assert!(inner.shape().is_some());
                Ok(())
            })
            .unwrap();
        assert_eq!(
            kernel
                .classify(outer.shape().unwrap(), DVec3::ZERO)
                .unwrap(),
            PointClass::Outside
        );
    }

    #[test]
    fn test_failed_scope_keeps_committed_folds() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let result = session.build_part(BuilderOptions::default(), |s| {
            s.add(&Cuboid::new(1.0, 1.0, 1.0))?;
            s.add(&Cuboid::new(-1.0, 1.0, 1.0))?;
            Ok(())
        });
        assert!(matches!(result, Err(BuildError::Cad(_))));
        let aborted = session.last_aborted().unwrap();
        assert!(aborted.shape().is_some());
        assert_eq!(aborted.fold_log().len(), 1);
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn test_empty_fold_is_degenerate_geometry() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let err = session
            .build_part(BuilderOptions::default(), |s| {
                s.add(&Cuboid::new(1.0, 1.0, 1.0))?;
                s.add_with(
                    &Cuboid::new(1.0, 1.0, 1.0),
                    ConstructOptions::locations([Location::from_xyz(10.0, 0.0, 0.0)])
                        .with_mode(Mode::Intersect),
                )?;
                Ok(())
            })
            .unwrap_err();
        match err {
            BuildError::DegenerateGeometry { kind, site, .. } => {
                assert_eq!(kind, BuilderKind::Part);
                assert!(site.file.ends_with("session.rs"));
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(session.last_aborted().map(|b| b.fold_log().len()), Some(1));

        let err = session
            .build_part(BuilderOptions::default(), |s| {
                s.add(&Cuboid::new(1.0, 1.0, 1.0))?;
                s.add_with(&Cuboid::new(2.0, 2.0, 2.0), ConstructOptions::mode(Mode::Subtract))?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, BuildError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_invalid_shape_rejected_on_exit() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let cube = Volume::Cuboid {
            length: 1.0,
            width: 1.0,
            height: 1.0,
        };
        let apart = Volume::Intersection(
            Box::new(cube.clone()),
            Box::new(cube.placed(Location::from_xyz(5.0, 0.0, 0.0))),
        );
        let err = session
            .build_part(BuilderOptions::default(), |s| {
                s.add_shape(Shape::from_volume(apart), ConstructOptions::default())?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::DegenerateGeometry {
                kind: BuilderKind::Part,
                ..
            }
        ));
        assert!(session.last_aborted().and_then(Builder::shape).is_some());
    }

    #[test]
    fn test_far_apart_placements_add() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let part = session
            .build_part(BuilderOptions::default(), |s| {
                s.locate(&GridLocations::new(100.0, 1.0, 2, 1), |s| {
                    s.add(&Cuboid::new(1.0, 1.0, 1.0))?;
                    Ok(())
                })
            })
            .unwrap();
        let solid = part.shape().unwrap();
        for x in [-50.0, 50.0] {
            assert_eq!(
                kernel.classify(solid, DVec3::new(x, 0.0, 0.0)).unwrap(),
                PointClass::Inside
            );
        }
        assert_relative_eq!(kernel.measure(solid).unwrap(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_location_sets_in_session() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let err = session
            .build_part(BuilderOptions::default(), |s| {
                s.locate(&Locations::default(), |_| Ok(()))
            })
            .unwrap_err();
        assert!(matches!(err, BuildError::EmptyLocationSet { .. }));

        let err = session
            .build_part(BuilderOptions::default(), |s| {
                s.add_with(
                    &Cuboid::new(1.0, 1.0, 1.0),
                    ConstructOptions::locations(Vec::<Location>::new()),
                )?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, BuildError::EmptyLocationSet { .. }));

        let options = BuilderOptions::default().with_workplanes(Vec::<Plane>::new());
        let err = session.build_sketch(options, |_| Ok(())).unwrap_err();
        assert!(matches!(err, BuildError::EmptyLocationSet { .. }));
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn test_intersect_in_builder() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let part = session
            .build_part(BuilderOptions::default(), |s| {
                s.add(&Cuboid::new(4.0, 4.0, 4.0))?;
                s.add_with(&Sphere::new(2.5), ConstructOptions::mode(Mode::Intersect))?;
                Ok(())
            })
            .unwrap();
        let solid = part.shape().unwrap();
        assert_eq!(
            kernel.classify(solid, DVec3::new(0.0, 0.0, 1.9)).unwrap(),
            PointClass::Inside
        );
        assert_eq!(
            kernel.classify(solid, DVec3::new(1.9, 1.9, 1.9)).unwrap(),
            PointClass::Outside
        );
        assert_eq!(part.fold_log()[1].mode, Mode::Intersect);
    }

    #[test]
    fn test_hex_pattern_in_sketch() {
        let kernel = CsgKernel::default();
        let mut session = Session::new(&kernel);
        let hex = HexLocations::new(5.0, 3, 2);
        let centers = hex.locations();
        let sketch = session
            .build_sketch(BuilderOptions::default(), |s| {
                s.locate(&hex, |s| {
                    s.add(&Circle::new(2.0))?;
                    Ok(())
                })
            })
            .unwrap();
        assert_eq!(sketch.fold_log()[0].instances, 6);
        let face = sketch.shape().unwrap();
        for center in &centers {
            assert_eq!(
                kernel.classify(face, center.position).unwrap(),
                PointClass::Inside
            );
        }
        let midway = (centers[0].position + centers[1].position) / 2.0;
        assert_eq!(
            kernel.classify(face, midway).unwrap(),
            PointClass::Outside
        );
    }

    #[test]
    fn test_null_kernel_error_surfaces() {
        let kernel = NullKernel;
        let mut session = Session::new(&kernel);
        let err = session
            .build_part(BuilderOptions::default(), |s| {
                s.add(&Cuboid::new(1.0, 1.0, 1.0))?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Cad(bc_cad::CadError::KernelNotAvailable(_))
        ));
    }

    #[test]
    fn test_separate_sessions_on_threads() {
        let kernel = CsgKernel::default();
        let volumes: Vec<f64> = std::thread::scope(|scope| {
            let handles: Vec<_> = [1.0, 2.0]
                .into_iter()
                .map(|size| {
                    let kernel = &kernel;
                    scope.spawn(move || {
                        let mut session = Session::new(kernel);
                        let part = session
                            .build_part(BuilderOptions::default(), |s| {
                                s.add(&Cuboid::new(size, size, size))?;
                                Ok(())
                            })
                            .unwrap();
                        kernel.measure(part.shape().unwrap()).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_relative_eq!(volumes[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(volumes[1], 8.0, epsilon = 1e-9);
    }
}
