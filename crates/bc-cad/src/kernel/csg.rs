//! CSG reference kernel
//!
//! Pure Rust kernel over implicit shapes. Booleans build CSG trees, queries
//! classify points against them. Measurements of composite shapes are
//! estimated by sampling a regular grid over the shape bounds.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::{BooleanType, CadError, CadKernel, CadResult, PointClass};
use crate::geom::{Axis, BoundBox, Location, Plane};
use crate::shape::{Curve, Geometry, Region, Shape, Volume};

/// Sampling and tolerance settings of the CSG kernel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsgSettings {
    /// Grid resolution per axis for volume sampling
    pub volume_samples: u32,
    /// Grid resolution per axis for area sampling
    pub area_samples: u32,
    /// Geometric tolerance
    pub tolerance: f64,
    /// Segments per full turn when sampling arcs
    pub arc_segments: u32,
}

impl Default for CsgSettings {
    fn default() -> Self {
        Self {
            volume_samples: 24,
            area_samples: 96,
            tolerance: 1e-6,
            arc_segments: 48,
        }
    }
}

/// Kernel over implicit CSG shapes
#[derive(Debug, Clone, Default)]
pub struct CsgKernel {
    settings: CsgSettings,
}

impl CsgKernel {
    /// Create a kernel with the given settings
    pub fn new(settings: CsgSettings) -> Self {
        Self { settings }
    }

    /// Current settings
    pub fn settings(&self) -> &CsgSettings {
        &self.settings
    }

    fn tol(&self) -> f64 {
        self.settings.tolerance
    }

    fn contains_curve(&self, curves: &[Curve], curve: &Curve) -> bool {
        curves.iter().any(|c| c.approx_eq(curve, self.tol()))
    }

    fn boolean_edges(&self, a: &[Curve], b: &[Curve], op: BooleanType) -> CadResult<Vec<Curve>> {
        let curves: Vec<Curve> = match op {
            BooleanType::Union => a
                .iter()
                .cloned()
                .chain(b.iter().filter(|c| !self.contains_curve(a, c)).cloned())
                .collect(),
            BooleanType::Subtract => a
                .iter()
                .filter(|c| !self.contains_curve(b, c))
                .cloned()
                .collect(),
            BooleanType::Intersect => a
                .iter()
                .filter(|c| self.contains_curve(b, c))
                .cloned()
                .collect(),
        };
        if curves.is_empty() {
            return Err(CadError::Degenerate(format!("{op:?} of edges is empty")));
        }
        Ok(curves)
    }

    fn boolean_faces(
        &self,
        (plane_a, region_a): (&Plane, &Region),
        (plane_b, region_b): (&Plane, &Region),
        op: BooleanType,
    ) -> CadResult<Region> {
        if !plane_a.is_coplanar(plane_b, self.tol()) {
            return Err(CadError::BooleanFailed(
                "Faces do not share a supporting plane".into(),
            ));
        }
        let b = region_b.clone().placed(plane_a.transform_from(plane_b));
        let (a, b) = (Box::new(region_a.clone()), Box::new(b));
        let region = match op {
            BooleanType::Union => return Ok(Region::Union(a, b)),
            BooleanType::Subtract => Region::Difference(a, b),
            BooleanType::Intersect => Region::Intersection(a, b),
        };
        if self.region_is_empty(&region) {
            return Err(CadError::Degenerate(format!("{op:?} of faces is empty")));
        }
        Ok(region)
    }

    fn boolean_solids(&self, a: &Volume, b: &Volume, op: BooleanType) -> CadResult<Volume> {
        let (ba, bb) = (a.bounds(), b.bounds());
        if op == BooleanType::Intersect
            && matches!((ba, bb), (Some(x), Some(y)) if x.intersection(&y).is_none())
        {
            return Err(CadError::Degenerate("Solids do not overlap".into()));
        }
        let (a, b) = (Box::new(a.clone()), Box::new(b.clone()));
        let volume = match op {
            BooleanType::Union => return Ok(Volume::Union(a, b)),
            BooleanType::Subtract => Volume::Difference(a, b),
            BooleanType::Intersect => Volume::Intersection(a, b),
        };
        if self.volume_is_empty(&volume) {
            return Err(CadError::Degenerate(format!("{op:?} of solids is empty")));
        }
        Ok(volume)
    }

    /// Offset of the boundary samples placed around each leaf
    fn boundary_offset(&self) -> f64 {
        self.tol() * 10.0
    }

    fn region_grid(&self, (min, max): (DVec2, DVec2)) -> (Vec<DVec2>, f64) {
        let n = self.settings.area_samples.max(1);
        let step = (max - min) / n as f64;
        let points = (0..n)
            .flat_map(|i| {
                (0..n).map(move |j| min + step * DVec2::new(i as f64 + 0.5, j as f64 + 0.5))
            })
            .collect();
        (points, step.x * step.y)
    }

    fn volume_grid(&self, bounds: &BoundBox) -> (Vec<DVec3>, f64) {
        let n = self.settings.volume_samples.max(1);
        let step = bounds.size() / n as f64;
        let mut points = Vec::with_capacity((n * n * n) as usize);
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let cell = DVec3::new(i as f64 + 0.5, j as f64 + 0.5, k as f64 + 0.5);
                    points.push(bounds.min + step * cell);
                }
            }
        }
        (points, step.x * step.y * step.z)
    }

    /// A region is empty when no sample around any of its leaves is inside
    fn region_is_empty(&self, region: &Region) -> bool {
        let mut leaves = Vec::new();
        region_leaves(region, &mut leaves);
        let n = self.settings.area_samples.max(1);
        let offset = self.boundary_offset();
        !leaves.iter().any(|(min, max)| {
            let xs = axis_samples(min.x, max.x, n, offset);
            let ys = axis_samples(min.y, max.y, n, offset);
            xs.iter()
                .any(|x| ys.iter().any(|y| region.contains(DVec2::new(*x, *y))))
        })
    }

    /// A volume is empty when no sample around any of its leaves is inside
    fn volume_is_empty(&self, volume: &Volume) -> bool {
        let mut leaves = Vec::new();
        volume_leaves(volume, &mut leaves);
        let n = self.settings.volume_samples.max(1);
        let offset = self.boundary_offset();
        !leaves.iter().any(|bb| {
            let xs = axis_samples(bb.min.x, bb.max.x, n, offset);
            let ys = axis_samples(bb.min.y, bb.max.y, n, offset);
            let zs = axis_samples(bb.min.z, bb.max.z, n, offset);
            xs.iter().any(|x| {
                ys.iter()
                    .any(|y| zs.iter().any(|z| volume.contains(DVec3::new(*x, *y, *z))))
            })
        })
    }

    /// Area shared by two regions, sampled over their common bounds
    fn overlap_area(&self, a: &Region, b: &Region) -> f64 {
        let (Some((a0, a1)), Some((b0, b1))) = (a.bounds(), b.bounds()) else {
            return 0.0;
        };
        let (lo, hi) = (a0.max(b0), a1.min(b1));
        if lo.x >= hi.x || lo.y >= hi.y {
            return 0.0;
        }
        let (points, cell) = self.region_grid((lo, hi));
        points
            .iter()
            .filter(|p| a.contains(**p) && b.contains(**p))
            .count() as f64
            * cell
    }

    /// Volume shared by two solids, sampled over their common bounds
    fn overlap_volume(&self, a: &Volume, b: &Volume) -> f64 {
        let Some(common) = a.bounds().zip(b.bounds()).and_then(|(x, y)| x.intersection(&y))
        else {
            return 0.0;
        };
        let (points, cell) = self.volume_grid(&common);
        points
            .iter()
            .filter(|p| a.contains(**p) && b.contains(**p))
            .count() as f64
            * cell
    }

    fn area(&self, region: &Region) -> f64 {
        match region {
            Region::Rect { width, height } => width * height,
            Region::Circle { radius } => std::f64::consts::PI * radius * radius,
            Region::Ellipse { x_radius, y_radius } => std::f64::consts::PI * x_radius * y_radius,
            Region::Polygon { points } => {
                let n = points.len();
                let twice: f64 = (0..n)
                    .map(|i| points[i].perp_dot(points[(i + 1) % n]))
                    .sum();
                twice.abs() / 2.0
            }
            Region::Placed { region, transform } => {
                self.area(region) * transform.matrix2.determinant().abs()
            }
            Region::Union(a, b) => self.area(a) + self.area(b) - self.overlap_area(a, b),
            Region::Difference(a, b) => (self.area(a) - self.overlap_area(a, b)).max(0.0),
            Region::Intersection(a, b) => self.overlap_area(a, b),
        }
    }

    fn volume(&self, volume: &Volume) -> f64 {
        use std::f64::consts::PI;
        match volume {
            Volume::Cuboid {
                length,
                width,
                height,
            } => length * width * height,
            Volume::Cylinder { radius, height } => PI * radius * radius * height,
            Volume::Sphere { radius } => 4.0 / 3.0 * PI * radius.powi(3),
            Volume::Cone {
                bottom_radius: r1,
                top_radius: r2,
                height,
            } => PI * height / 3.0 * (r1 * r1 + r1 * r2 + r2 * r2),
            Volume::Torus {
                major_radius,
                minor_radius,
            } => 2.0 * PI * PI * major_radius * minor_radius * minor_radius,
            Volume::Prism { region, start, end } => self.area(region) * (end - start),
            Volume::Placed { volume, .. } | Volume::Mirrored { volume, .. } => self.volume(volume),
            Volume::Union(a, b) => self.volume(a) + self.volume(b) - self.overlap_volume(a, b),
            Volume::Difference(a, b) => (self.volume(a) - self.overlap_volume(a, b)).max(0.0),
            Volume::Intersection(a, b) => self.overlap_volume(a, b),
            Volume::Revolution { .. } => match volume.bounds() {
                Some(bounds) => {
                    let (points, cell) = self.volume_grid(&bounds);
                    points.iter().filter(|p| volume.contains(**p)).count() as f64 * cell
                }
                None => 0.0,
            },
        }
    }

    fn curve_contains(&self, curve: &Curve, point: DVec3) -> bool {
        let tol = self.tol();
        match curve {
            Curve::Line { start, end } => {
                let d = *end - *start;
                let len2 = d.length_squared();
                if len2 == 0.0 {
                    return point.distance(*start) <= tol;
                }
                let t = ((point - *start).dot(d) / len2).clamp(0.0, 1.0);
                point.distance(*start + d * t) <= tol
            }
            Curve::Arc {
                frame,
                radius,
                start_angle,
                sweep,
            } => {
                let local = frame.inverse().transform_point(point);
                if local.z.abs() > tol || (local.truncate().length() - radius).abs() > tol {
                    return false;
                }
                let angle = local.y.atan2(local.x);
                let rel = if *sweep >= 0.0 {
                    (angle - start_angle).rem_euclid(std::f64::consts::TAU)
                } else {
                    (start_angle - angle).rem_euclid(std::f64::consts::TAU)
                };
                rel <= sweep.abs() + tol / radius
                    || rel >= std::f64::consts::TAU - tol / radius
            }
        }
    }

    /// Chain curves into closed loops, reversing curves where needed
    fn closed_loops(&self, mut curves: Vec<Curve>) -> CadResult<Vec<Vec<Curve>>> {
        let tol = self.tol();
        let mut loops = Vec::new();
        while !curves.is_empty() {
            let first = curves.remove(0);
            let start = first.start();
            let mut chain = vec![first];
            loop {
                let end = chain[chain.len() - 1].end();
                if end.distance(start) <= tol {
                    break;
                }
                let next = curves.iter().position(|c| {
                    c.start().distance(end) <= tol || c.end().distance(end) <= tol
                });
                match next {
                    Some(i) => {
                        let c = curves.remove(i);
                        if c.start().distance(end) <= tol {
                            chain.push(c);
                        } else {
                            chain.push(c.reversed());
                        }
                    }
                    None => {
                        return Err(CadError::InvalidProfile(format!(
                            "Open wire ends at ({:.4}, {:.4}, {:.4})",
                            end.x, end.y, end.z
                        )));
                    }
                }
            }
            loops.push(chain);
        }
        Ok(loops)
    }

    fn face_from_loop(&self, chain: &[Curve]) -> CadResult<Shape> {
        let points: Vec<DVec3> = chain
            .iter()
            .flat_map(|c| {
                let mut pts = c.sample(self.settings.arc_segments);
                pts.pop();
                pts
            })
            .collect();
        let mut plane = Plane::from_points(&points)?;
        // Normals point along the positive side of their dominant axis
        let n = plane.z_dir;
        let dominant = if n.x.abs() >= n.y.abs() && n.x.abs() >= n.z.abs() {
            n.x
        } else if n.y.abs() >= n.z.abs() {
            n.y
        } else {
            n.z
        };
        if dominant < 0.0 {
            plane = Plane::new(plane.origin, plane.x_dir, -plane.z_dir)?;
        }
        if points
            .iter()
            .any(|p| plane.distance_to(*p).abs() > self.tol())
        {
            return Err(CadError::InvalidProfile("Wire is not planar".into()));
        }
        let local = points.iter().map(|p| plane.to_local(*p).truncate()).collect();
        let region = Region::Polygon { points: local };
        if self.area(&region) <= self.tol() {
            return Err(CadError::Degenerate("Wire encloses no area".into()));
        }
        Ok(Shape::from_region(plane, region))
    }
}

/// Regular interior samples along one axis plus samples just inside and just
/// outside both ends
fn axis_samples(min: f64, max: f64, n: u32, offset: f64) -> Vec<f64> {
    let step = (max - min) / n as f64;
    let mut samples: Vec<f64> = (0..n).map(|i| min + step * (i as f64 + 0.5)).collect();
    samples.extend([min - offset, min + offset, max - offset, max + offset]);
    samples
}

/// Bounds of every primitive in a region tree, in the tree's coordinates
fn region_leaves(region: &Region, out: &mut Vec<(DVec2, DVec2)>) {
    match region {
        Region::Placed { region, transform } => {
            let start = out.len();
            region_leaves(region, out);
            for leaf in &mut out[start..] {
                let (min, max) = *leaf;
                let corners = [
                    DVec2::new(min.x, min.y),
                    DVec2::new(max.x, min.y),
                    DVec2::new(min.x, max.y),
                    DVec2::new(max.x, max.y),
                ]
                .map(|c| transform.transform_point2(c));
                *leaf = corners
                    .iter()
                    .fold((corners[0], corners[0]), |(lo, hi), c| (lo.min(*c), hi.max(*c)));
            }
        }
        Region::Union(a, b) | Region::Difference(a, b) | Region::Intersection(a, b) => {
            region_leaves(a, out);
            region_leaves(b, out);
        }
        leaf => out.extend(leaf.bounds()),
    }
}

/// Bounds of every primitive in a volume tree, in the tree's coordinates
fn volume_leaves(volume: &Volume, out: &mut Vec<BoundBox>) {
    match volume {
        Volume::Placed { volume, location } => {
            let start = out.len();
            volume_leaves(volume, out);
            for leaf in &mut out[start..] {
                *leaf = leaf.transformed(location);
            }
        }
        Volume::Mirrored { volume, plane } => {
            let start = out.len();
            volume_leaves(volume, out);
            for leaf in &mut out[start..] {
                *leaf = leaf.mirrored(plane);
            }
        }
        Volume::Union(a, b) | Volume::Difference(a, b) | Volume::Intersection(a, b) => {
            volume_leaves(a, out);
            volume_leaves(b, out);
        }
        leaf => out.extend(leaf.bounds()),
    }
}

impl CadKernel for CsgKernel {
    fn name(&self) -> &str {
        "csg"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn boolean(&self, a: &Shape, b: &Shape, op: BooleanType) -> CadResult<Shape> {
        if a.dim() != b.dim() {
            return Err(CadError::DimensionMismatch {
                left: a.dim(),
                right: b.dim(),
            });
        }
        tracing::trace!(?op, dim = %a.dim(), "csg boolean");
        let geometry = match (a.geometry(), b.geometry()) {
            (Geometry::Edges(ca), Geometry::Edges(cb)) => {
                Geometry::Edges(self.boolean_edges(ca, cb, op)?)
            }
            (
                Geometry::Face {
                    plane: pa,
                    region: ra,
                },
                Geometry::Face {
                    plane: pb,
                    region: rb,
                },
            ) => Geometry::Face {
                plane: *pa,
                region: self.boolean_faces((pa, ra), (pb, rb), op)?,
            },
            (Geometry::Solid(va), Geometry::Solid(vb)) => {
                Geometry::Solid(self.boolean_solids(va, vb, op)?)
            }
            _ => {
                return Err(CadError::BooleanFailed(
                    "Unsupported geometry combination".into(),
                ));
            }
        };
        let mut shape = Shape::new(geometry);
        shape.label = a.label.clone();
        Ok(shape)
    }

    fn extrude(&self, face: &Shape, amount: f64, both: bool) -> CadResult<Shape> {
        let Geometry::Face { plane, region } = face.geometry() else {
            return Err(CadError::InvalidParameter(format!(
                "Extrude needs a face, got {:?}",
                face.kind()
            )));
        };
        if amount.abs() <= self.tol() {
            return Err(CadError::InvalidParameter(format!(
                "Extrusion amount {amount} is too small"
            )));
        }
        let (start, end) = if both {
            (-amount.abs(), amount.abs())
        } else {
            (amount.min(0.0), amount.max(0.0))
        };
        let prism = Volume::Prism {
            region: region.clone(),
            start,
            end,
        };
        Ok(Shape::from_volume(prism.placed(plane.location())))
    }

    fn revolve(&self, face: &Shape, axis: &Axis, degrees: f64) -> CadResult<Shape> {
        let Geometry::Face { plane, region } = face.geometry() else {
            return Err(CadError::InvalidParameter(format!(
                "Revolve needs a face, got {:?}",
                face.kind()
            )));
        };
        if degrees.abs() <= self.tol() || degrees.abs() > 360.0 + self.tol() {
            return Err(CadError::InvalidParameter(format!(
                "Revolve angle {degrees} must be in (0, 360]"
            )));
        }
        let direction = axis.direction.normalize_or_zero();
        if direction.dot(plane.z_dir).abs() > self.tol()
            || plane.distance_to(axis.origin).abs() > self.tol()
        {
            return Err(CadError::InvalidParameter(
                "Revolve axis must lie in the face plane".into(),
            ));
        }
        // Frame with Y along the axis and Z along the face normal
        let frame = Plane::new(axis.origin, direction.cross(plane.z_dir), plane.z_dir)?;
        let profile = region.clone().placed(frame.transform_from(plane));
        let mut location = frame.location();
        if degrees < 0.0 {
            location = location * Location::from_axis_angle(DVec3::Y, degrees);
        }
        let revolution = Volume::Revolution {
            region: profile,
            angle: degrees.abs().min(360.0).to_radians(),
        };
        Ok(Shape::from_volume(revolution.placed(location)))
    }

    fn make_face(&self, edges: &[Shape]) -> CadResult<Vec<Shape>> {
        let mut curves = Vec::new();
        for edge in edges {
            match edge.geometry() {
                Geometry::Edges(cs) => curves.extend(cs.iter().cloned()),
                _ => {
                    return Err(CadError::InvalidProfile(format!(
                        "Expected edges, got {:?}",
                        edge.kind()
                    )));
                }
            }
        }
        if curves.is_empty() {
            return Err(CadError::InvalidProfile("No edges to build a face".into()));
        }
        self.closed_loops(curves)?
            .iter()
            .map(|chain| self.face_from_loop(chain))
            .collect()
    }

    fn bounding_box(&self, shape: &Shape) -> CadResult<BoundBox> {
        let bounds = match shape.geometry() {
            Geometry::Edges(curves) => BoundBox::from_points(
                curves
                    .iter()
                    .flat_map(|c| c.sample(self.settings.arc_segments)),
            ),
            Geometry::Face { plane, region } => region.bounds().and_then(|(min, max)| {
                BoundBox::from_points(
                    [
                        DVec2::new(min.x, min.y),
                        DVec2::new(max.x, min.y),
                        DVec2::new(min.x, max.y),
                        DVec2::new(max.x, max.y),
                    ]
                    .map(|p| plane.to_world(p)),
                )
            }),
            Geometry::Solid(volume) => volume.bounds(),
        };
        bounds.ok_or_else(|| CadError::Degenerate("Shape has no extent".into()))
    }

    fn measure(&self, shape: &Shape) -> CadResult<f64> {
        Ok(match shape.geometry() {
            Geometry::Edges(curves) => curves.iter().map(Curve::length).sum(),
            Geometry::Face { region, .. } => self.area(region),
            Geometry::Solid(volume) => self.volume(volume),
        })
    }

    fn classify(&self, shape: &Shape, point: DVec3) -> CadResult<PointClass> {
        let inside = match shape.geometry() {
            Geometry::Edges(curves) => curves.iter().any(|c| self.curve_contains(c, point)),
            Geometry::Face { plane, region } => {
                plane.distance_to(point).abs() <= self.tol()
                    && region.contains(plane.to_local(point).truncate())
            }
            Geometry::Solid(volume) => volume.contains(point),
        };
        Ok(if inside {
            PointClass::Inside
        } else {
            PointClass::Outside
        })
    }

    fn is_valid(&self, shape: &Shape) -> bool {
        match shape.geometry() {
            Geometry::Edges(curves) => {
                !curves.is_empty() && curves.iter().all(|c| c.length() > self.tol())
            }
            Geometry::Face { region, .. } => !self.region_is_empty(region),
            Geometry::Solid(volume) => !self.volume_is_empty(volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube(size: f64) -> Shape {
        Shape::from_volume(Volume::Cuboid {
            length: size,
            width: size,
            height: size,
        })
    }

    fn square_edges(size: f64) -> Vec<Shape> {
        let h = size / 2.0;
        let corners = [
            DVec3::new(-h, -h, 0.0),
            DVec3::new(h, -h, 0.0),
            DVec3::new(h, h, 0.0),
            DVec3::new(-h, h, 0.0),
        ];
        // Deliberately out of order and partly reversed
        vec![
            Shape::from_curves(vec![Curve::Line {
                start: corners[2],
                end: corners[1],
            }]),
            Shape::from_curves(vec![Curve::Line {
                start: corners[0],
                end: corners[1],
            }]),
            Shape::from_curves(vec![Curve::Line {
                start: corners[2],
                end: corners[3],
            }]),
            Shape::from_curves(vec![Curve::Line {
                start: corners[3],
                end: corners[0],
            }]),
        ]
    }

    #[test]
    fn test_solid_subtract_classifies() {
        let kernel = CsgKernel::default();
        let big = cube(10.0);
        let hole = Shape::from_volume(Volume::Cylinder {
            radius: 2.0,
            height: 20.0,
        });
        let cut = kernel.boolean(&big, &hole, BooleanType::Subtract).unwrap();
        assert_eq!(kernel.classify(&cut, DVec3::ZERO).unwrap(), PointClass::Outside);
        assert_eq!(
            kernel.classify(&cut, DVec3::new(4.0, 4.0, 0.0)).unwrap(),
            PointClass::Inside
        );
        assert!(kernel.is_valid(&cut));
    }

    #[test]
    fn test_empty_results_are_degenerate() {
        let kernel = CsgKernel::default();
        let a = cube(1.0);
        let far = a.moved(&Location::from_xyz(10.0, 0.0, 0.0));
        assert!(matches!(
            kernel.boolean(&a, &far, BooleanType::Intersect),
            Err(CadError::Degenerate(_))
        ));
        let bigger = cube(2.0);
        assert!(matches!(
            kernel.boolean(&a, &bigger, BooleanType::Subtract),
            Err(CadError::Degenerate(_))
        ));
    }

    #[test]
    fn test_union_of_distant_solids() {
        let kernel = CsgKernel::default();
        let a = cube(1.0);
        let far = a.moved(&Location::from_xyz(100.0, 0.0, 0.0));
        let union = kernel.boolean(&a, &far, BooleanType::Union).unwrap();
        assert!(kernel.is_valid(&union));
        assert_relative_eq!(kernel.measure(&union).unwrap(), 2.0, epsilon = 1e-9);
        assert_eq!(
            kernel.classify(&union, DVec3::new(100.0, 0.0, 0.0)).unwrap(),
            PointClass::Inside
        );
    }

    #[test]
    fn test_thin_wall_survives_subtract() {
        let kernel = CsgKernel::default();
        let block = cube(10.0);
        // Leaves a 0.1 thick wall at x in (4.9, 5]
        let cutter = Shape::from_volume(Volume::Cuboid {
            length: 10.0,
            width: 12.0,
            height: 12.0,
        })
        .moved(&Location::from_xyz(-0.1, 0.0, 0.0));
        let wall = kernel
            .boolean(&block, &cutter, BooleanType::Subtract)
            .unwrap();
        assert!(kernel.is_valid(&wall));
        assert_eq!(
            kernel.classify(&wall, DVec3::new(4.95, 0.0, 0.0)).unwrap(),
            PointClass::Inside
        );
    }

    #[test]
    fn test_distant_faces_union() {
        let kernel = CsgKernel::default();
        let a = Shape::from_region(Plane::XY, Region::Circle { radius: 0.5 });
        let far = a.moved(&Location::from_xyz(0.0, 200.0, 0.0));
        let union = kernel.boolean(&a, &far, BooleanType::Union).unwrap();
        assert!(kernel.is_valid(&union));
        assert_relative_eq!(
            kernel.measure(&union).unwrap(),
            0.5 * std::f64::consts::PI,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_dimension_mismatch() {
        let kernel = CsgKernel::default();
        let face = Shape::from_region(Plane::XY, Region::Circle { radius: 1.0 });
        let err = kernel
            .boolean(&cube(1.0), &face, BooleanType::Union)
            .unwrap_err();
        assert!(matches!(err, CadError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_face_booleans_need_coplanar_faces() {
        let kernel = CsgKernel::default();
        let a = Shape::from_region(Plane::XY, Region::Circle { radius: 1.0 });
        let b = Shape::from_region(Plane::XY.offset(1.0), Region::Circle { radius: 1.0 });
        assert!(matches!(
            kernel.boolean(&a, &b, BooleanType::Union),
            Err(CadError::BooleanFailed(_))
        ));

        let shifted = a.moved(&Location::from_xyz(1.5, 0.0, 0.0));
        let union = kernel.boolean(&a, &shifted, BooleanType::Union).unwrap();
        assert_eq!(
            kernel.classify(&union, DVec3::new(2.2, 0.0, 0.0)).unwrap(),
            PointClass::Inside
        );
    }

    #[test]
    fn test_edge_set_semantics() {
        let kernel = CsgKernel::default();
        let edges = square_edges(2.0);
        let ab = kernel
            .boolean(&edges[0], &edges[1], BooleanType::Union)
            .unwrap();
        let again = kernel.boolean(&ab, &edges[0], BooleanType::Union).unwrap();
        assert_eq!(again.curves().len(), 2);
        let rest = kernel.boolean(&ab, &edges[0], BooleanType::Subtract).unwrap();
        assert_eq!(rest.curves().len(), 1);
    }

    #[test]
    fn test_make_face_and_extrude() {
        let kernel = CsgKernel::default();
        let faces = kernel.make_face(&square_edges(2.0)).unwrap();
        assert_eq!(faces.len(), 1);
        assert_relative_eq!(kernel.measure(&faces[0]).unwrap(), 4.0, epsilon = 1e-9);

        let solid = kernel.extrude(&faces[0], 3.0, false).unwrap();
        assert_relative_eq!(kernel.measure(&solid).unwrap(), 12.0, epsilon = 1e-9);
        assert_eq!(
            kernel.classify(&solid, DVec3::new(0.5, 0.5, 2.5)).unwrap(),
            PointClass::Inside
        );
        assert_eq!(
            kernel.classify(&solid, DVec3::new(0.5, 0.5, -0.5)).unwrap(),
            PointClass::Outside
        );

        let both = kernel.extrude(&faces[0], 3.0, true).unwrap();
        assert_eq!(
            kernel.classify(&both, DVec3::new(0.5, 0.5, -2.5)).unwrap(),
            PointClass::Inside
        );
    }

    #[test]
    fn test_make_face_rejects_open_wire() {
        let kernel = CsgKernel::default();
        let mut edges = square_edges(2.0);
        edges.pop();
        assert!(matches!(
            kernel.make_face(&edges),
            Err(CadError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_revolve_about_in_plane_axis() {
        let kernel = CsgKernel::default();
        let profile = Shape::from_region(
            Plane::XZ,
            Region::Rect {
                width: 1.0,
                height: 1.0,
            }
            .placed(glam::DAffine2::from_translation(DVec2::new(3.0, 0.0))),
        );
        let ring = kernel.revolve(&profile, &Axis::Z, 360.0).unwrap();
        for p in [
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(0.0, 3.0, 0.0),
            DVec3::new(-3.0, 0.0, 0.2),
        ] {
            assert_eq!(kernel.classify(&ring, p).unwrap(), PointClass::Inside);
        }
        assert_eq!(
            kernel.classify(&ring, DVec3::ZERO).unwrap(),
            PointClass::Outside
        );

        let off_plane = Axis::new(DVec3::ZERO, DVec3::Y);
        assert!(kernel.revolve(&profile, &off_plane, 90.0).is_err());
    }

    #[test]
    fn test_measure_primitives() {
        let kernel = CsgKernel::default();
        let sphere = Shape::from_volume(Volume::Sphere { radius: 1.0 });
        assert_relative_eq!(
            kernel.measure(&sphere).unwrap(),
            4.0 / 3.0 * std::f64::consts::PI,
            epsilon = 1e-9
        );
        let bb = kernel
            .bounding_box(&cube(2.0).moved(&Location::from_xyz(1.0, 0.0, 0.0)))
            .unwrap();
        assert_relative_eq!(bb.min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.x, 2.0, epsilon = 1e-9);
    }
}
