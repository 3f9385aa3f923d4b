//! Location stack and placement generators
//!
//! Every builder carries a [`LocationStack`]. Each pushed entry is a non-empty
//! placement set produced by a [`LocationGenerator`]; the effective placements
//! are the cartesian product of all entries, outer composed with inner.

use bc_cad::{Align, Location};
use glam::{DQuat, DVec3};

use crate::config::Tolerance;
use crate::constants::FULL_TURN_DEGREES;
use crate::error::{BuildError, BuildResult, CallSite};

/// Source of a placement set
pub trait LocationGenerator {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Placements in generation order
    fn locations(&self) -> Vec<Location>;
}

/// Explicit list of placements
#[derive(Debug, Clone, Default)]
pub struct Locations {
    locations: Vec<Location>,
}

impl Locations {
    /// Placements given directly
    pub fn new(locations: impl IntoIterator<Item = Location>) -> Self {
        Self {
            locations: locations.into_iter().collect(),
        }
    }

    /// Pure translations to the given points
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        Self::new(points.into_iter().map(Location::from_translation))
    }
}

impl LocationGenerator for Locations {
    fn name(&self) -> &str {
        "Locations"
    }

    fn locations(&self) -> Vec<Location> {
        self.locations.clone()
    }
}

/// Rectangular grid in the XY plane
#[derive(Debug, Clone)]
pub struct GridLocations {
    /// Distance between columns
    pub x_spacing: f64,
    /// Distance between rows
    pub y_spacing: f64,
    /// Number of columns
    pub x_count: u32,
    /// Number of rows
    pub y_count: u32,
    /// Alignment of the grid extent per axis
    pub align: [Align; 2],
}

impl GridLocations {
    /// Centered grid
    pub fn new(x_spacing: f64, y_spacing: f64, x_count: u32, y_count: u32) -> Self {
        Self {
            x_spacing,
            y_spacing,
            x_count,
            y_count,
            align: [Align::Center; 2],
        }
    }

    /// Set the alignment
    pub fn with_align(mut self, align: [Align; 2]) -> Self {
        self.align = align;
        self
    }
}

impl LocationGenerator for GridLocations {
    fn name(&self) -> &str {
        "GridLocations"
    }

    fn locations(&self) -> Vec<Location> {
        let size_x = self.x_spacing * self.x_count.saturating_sub(1) as f64;
        let size_y = self.y_spacing * self.y_count.saturating_sub(1) as f64;
        let offset_x = self.align[0].offset(0.0, size_x);
        let offset_y = self.align[1].offset(0.0, size_y);
        let mut locations = Vec::with_capacity((self.x_count * self.y_count) as usize);
        for i in 0..self.x_count {
            for j in 0..self.y_count {
                locations.push(Location::from_xyz(
                    i as f64 * self.x_spacing + offset_x,
                    j as f64 * self.y_spacing + offset_y,
                    0.0,
                ));
            }
        }
        locations
    }
}

/// Placements on a circle around the Z axis
#[derive(Debug, Clone)]
pub struct PolarLocations {
    /// Circle radius
    pub radius: f64,
    /// Number of placements
    pub count: u32,
    /// Angle of the first placement (degrees)
    pub start_angle: f64,
    /// Angular span (degrees)
    pub angular_range: f64,
    /// Rotate each placement to face outward
    pub rotate: bool,
    /// Put the last placement on the end of the span
    pub endpoint: bool,
}

impl PolarLocations {
    /// Full circle, rotated placements
    pub fn new(radius: f64, count: u32) -> Self {
        Self {
            radius,
            count,
            start_angle: 0.0,
            angular_range: FULL_TURN_DEGREES,
            rotate: true,
            endpoint: false,
        }
    }

    /// Set the start angle and span (degrees)
    pub fn with_range(mut self, start_angle: f64, angular_range: f64) -> Self {
        self.start_angle = start_angle;
        self.angular_range = angular_range;
        self
    }

    /// Set whether placements rotate with their angle
    pub fn with_rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    /// Set whether the span's end receives a placement
    pub fn with_endpoint(mut self, endpoint: bool) -> Self {
        self.endpoint = endpoint;
        self
    }
}

impl LocationGenerator for PolarLocations {
    fn name(&self) -> &str {
        "PolarLocations"
    }

    fn locations(&self) -> Vec<Location> {
        let divisions = self.count.saturating_sub(u32::from(self.endpoint));
        let step = if divisions == 0 {
            0.0
        } else {
            self.angular_range / divisions as f64
        };
        (0..self.count)
            .map(|i| {
                let angle = (self.start_angle + step * i as f64).to_radians();
                let position = DVec3::new(self.radius * angle.cos(), self.radius * angle.sin(), 0.0);
                let orientation = if self.rotate {
                    DQuat::from_rotation_z(angle)
                } else {
                    DQuat::IDENTITY
                };
                Location::new(position, orientation)
            })
            .collect()
    }
}

/// Hexagonally packed placements in the XY plane
#[derive(Debug, Clone)]
pub struct HexLocations {
    /// Apothem (inscribed radius) of the hexagon cells, or the circumradius
    /// when `major_radius` is set
    pub radius: f64,
    /// Number of columns
    pub x_count: u32,
    /// Number of rows
    pub y_count: u32,
    /// Alignment of the pattern extent per axis
    pub align: [Align; 2],
    /// Interpret `radius` as the circumradius
    pub major_radius: bool,
}

impl HexLocations {
    /// Centered pattern sized by the cell apothem
    pub fn new(apothem: f64, x_count: u32, y_count: u32) -> Self {
        Self {
            radius: apothem,
            x_count,
            y_count,
            align: [Align::Center; 2],
            major_radius: false,
        }
    }

    /// Set the alignment
    pub fn with_align(mut self, align: [Align; 2]) -> Self {
        self.align = align;
        self
    }

    /// Interpret the radius as the circumradius
    pub fn with_major_radius(mut self, major_radius: bool) -> Self {
        self.major_radius = major_radius;
        self
    }
}

impl LocationGenerator for HexLocations {
    fn name(&self) -> &str {
        "HexLocations"
    }

    fn locations(&self) -> Vec<Location> {
        let diagonal = if self.major_radius {
            2.0 * self.radius
        } else {
            4.0 * self.radius / 3f64.sqrt()
        };
        let x_spacing = 3.0 * diagonal / 4.0;
        let y_spacing = diagonal * 3f64.sqrt() / 2.0;

        // Even columns first, then odd columns shifted half a row
        let columns = (0..self.x_count)
            .step_by(2)
            .map(|x| (x, y_spacing / 2.0))
            .chain((1..self.x_count).step_by(2).map(|x| (x, y_spacing)));
        let points: Vec<(f64, f64)> = columns
            .flat_map(|(x, shift)| {
                (0..self.y_count).map(move |y| (x as f64 * x_spacing, y as f64 * y_spacing + shift))
            })
            .collect();
        let Some(&(first_x, first_y)) = points.first() else {
            return Vec::new();
        };
        let (min_x, max_x, min_y, max_y) = points.iter().fold(
            (first_x, first_x, first_y, first_y),
            |(lx, hx, ly, hy), (x, y)| (lx.min(*x), hx.max(*x), ly.min(*y), hy.max(*y)),
        );
        let offset_x = self.align[0].offset(min_x, max_x);
        let offset_y = self.align[1].offset(min_y, max_y);
        points
            .into_iter()
            .map(|(x, y)| Location::from_xyz(x + offset_x, y + offset_y, 0.0))
            .collect()
    }
}

/// Stack of placement sets owned by one builder
#[derive(Debug, Clone, Default)]
pub struct LocationStack {
    entries: Vec<Vec<Location>>,
}

impl LocationStack {
    /// Empty stack (a single identity placement)
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the placements of `generator`
    #[track_caller]
    pub fn push(&mut self, generator: &dyn LocationGenerator) -> BuildResult<()> {
        let locations = generator.locations();
        if locations.is_empty() {
            return Err(BuildError::EmptyLocationSet {
                generator: generator.name().to_string(),
                site: CallSite::caller(),
            });
        }
        self.entries.push(locations);
        Ok(())
    }

    /// Drop the innermost placement set
    pub fn pop(&mut self) -> Option<Vec<Location>> {
        self.entries.pop()
    }

    /// Number of pushed sets
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Cut back to `depth` entries
    pub fn truncate(&mut self, depth: usize) {
        self.entries.truncate(depth);
    }

    /// Effective placements: the product of all sets, de-duplicated
    pub fn current_locations(&self, tolerance: &Tolerance) -> Vec<Location> {
        let mut current = vec![Location::IDENTITY];
        for entry in &self.entries {
            current = current
                .iter()
                .flat_map(|outer| entry.iter().map(move |inner| *outer * *inner))
                .collect();
        }
        dedup_locations(current, tolerance)
    }
}

/// Remove placements equal to an earlier one within `tolerance`, keeping order
pub fn dedup_locations(locations: Vec<Location>, tolerance: &Tolerance) -> Vec<Location> {
    let mut unique: Vec<Location> = Vec::with_capacity(locations.len());
    for location in locations {
        if !unique
            .iter()
            .any(|u| u.approx_eq(&location, tolerance.linear, tolerance.angular))
        {
            unique.push(location);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_grid_alignment() {
        let centered = GridLocations::new(10.0, 5.0, 3, 2).locations();
        assert_eq!(centered.len(), 6);
        assert_relative_eq!(centered[0].position.x, -10.0);
        assert_relative_eq!(centered[0].position.y, -2.5);
        // x is the outer loop
        assert_relative_eq!(centered[1].position.x, -10.0);
        assert_relative_eq!(centered[1].position.y, 2.5);

        let cornered = GridLocations::new(10.0, 5.0, 3, 2)
            .with_align([Align::Min, Align::Max])
            .locations();
        assert_relative_eq!(cornered[0].position.x, 0.0);
        assert_relative_eq!(cornered[0].position.y, -5.0);
    }

    #[test]
    fn test_polar_steps() {
        let ring = PolarLocations::new(5.0, 4).locations();
        assert_eq!(ring.len(), 4);
        assert_relative_eq!(ring[1].position.y, 5.0, epsilon = 1e-9);
        let x = ring[1].x_dir();
        assert_relative_eq!(x.y.atan2(x.x), FRAC_PI_2, epsilon = 1e-9);

        let arc = PolarLocations::new(5.0, 3)
            .with_range(0.0, 90.0)
            .with_endpoint(true)
            .with_rotate(false)
            .locations();
        assert_relative_eq!(arc[2].position.y, 5.0, epsilon = 1e-9);
        assert_relative_eq!(arc[1].orientation.w, 1.0);
    }

    #[test]
    fn test_hex_spacing() {
        let hex = HexLocations::new(1.0, 2, 2)
            .with_align([Align::Min, Align::Min])
            .locations();
        assert_eq!(hex.len(), 4);
        let diagonal = 4.0 / 3f64.sqrt();
        // Column 1 starts after column 0
        assert_relative_eq!(hex[2].position.x, 0.75 * diagonal, epsilon = 1e-9);
        assert_relative_eq!(hex[0].position.y, 0.0, epsilon = 1e-9);
        // Neighbouring centers are two apothems apart
        assert_relative_eq!(hex[0].position.distance(hex[2].position), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_generator_rejected() {
        let mut stack = LocationStack::new();
        let err = stack.push(&GridLocations::new(1.0, 1.0, 0, 3)).unwrap_err();
        assert!(matches!(err, BuildError::EmptyLocationSet { .. }));
        assert_eq!(stack.depth(), 0);
        assert!(matches!(
            stack.push(&Locations::default()),
            Err(BuildError::EmptyLocationSet { .. })
        ));
    }

    #[test]
    fn test_polar_times_grid_is_24_distinct() {
        let tolerance = Tolerance::default();
        let mut stack = LocationStack::new();
        stack.push(&PolarLocations::new(50.0, 4)).unwrap();
        stack.push(&GridLocations::new(10.0, 10.0, 3, 2)).unwrap();
        let locations = stack.current_locations(&tolerance);
        assert_eq!(locations.len(), 24);

        // Coincident placements collapse
        let mut stack = LocationStack::new();
        stack
            .push(&Locations::new([Location::IDENTITY, Location::IDENTITY]))
            .unwrap();
        assert_eq!(stack.current_locations(&tolerance).len(), 1);
    }

    #[test]
    fn test_outer_times_inner() {
        let tolerance = Tolerance::default();
        let mut stack = LocationStack::new();
        stack
            .push(&Locations::new([Location::from_axis_angle(DVec3::Z, 90.0)]))
            .unwrap();
        stack
            .push(&Locations::from_points([DVec3::new(10.0, 0.0, 0.0)]))
            .unwrap();
        let locations = stack.current_locations(&tolerance);
        assert_relative_eq!(locations[0].position.y, 10.0, epsilon = 1e-9);
        stack.pop();
        assert_relative_eq!(
            stack.current_locations(&tolerance)[0].position.y,
            0.0,
            epsilon = 1e-9
        );
    }
}
