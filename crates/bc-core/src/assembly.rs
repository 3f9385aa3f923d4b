//! Placed parts and assemblies

use std::collections::BTreeMap;
use std::path::Path;

use bc_cad::{Location, Shape};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{BuildError, BuildResult};
use crate::joint::{self, Connection, Joint, JointValue};

/// A finished solid with its placement and joints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Unique identifier
    pub id: Uuid,
    /// Label, unique within an assembly
    pub label: String,
    shape: Shape,
    location: Location,
    joints: BTreeMap<String, Joint>,
}

impl Part {
    /// Part at the identity placement without joints
    pub fn new(label: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            shape,
            location: Location::IDENTITY,
            joints: BTreeMap::new(),
        }
    }

    /// Shape in part-local coordinates
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// World placement
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Same part at a new placement
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Shape moved to the world placement
    pub fn world_shape(&self) -> Shape {
        self.shape.moved(&self.location)
    }

    /// Attach a joint; labels are unique per part
    pub fn add_joint(&mut self, mut joint: Joint) -> BuildResult<()> {
        if self.joints.contains_key(joint.label()) {
            return Err(BuildError::InvalidJointParameter {
                joint: joint.label().to_string(),
                reason: format!("part {} already has a joint with this label", self.label),
            });
        }
        joint.set_owner(&self.label);
        self.joints.insert(joint.label().to_string(), joint);
        Ok(())
    }

    /// Look up a joint by label
    pub fn joint(&self, label: &str) -> BuildResult<&Joint> {
        self.joints
            .get(label)
            .ok_or_else(|| BuildError::JointNotFound(format!("{}.{label}", self.label)))
    }

    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints.values()
    }

    /// World frame of a joint
    pub fn joint_location(&self, label: &str) -> BuildResult<Location> {
        Ok(self.location * *self.joint(label)?.location())
    }

    fn replace_joint(&mut self, joint: Joint) {
        self.joints.insert(joint.label().to_string(), joint);
    }
}

/// Named collection of parts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assembly {
    /// Assembly name
    pub name: String,
    parts: BTreeMap<String, Part>,
}

impl Assembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: BTreeMap::new(),
        }
    }

    /// Add a part, returning the part it replaces if the label was taken
    pub fn add_part(&mut self, part: Part) -> Option<Part> {
        self.parts.insert(part.label.clone(), part)
    }

    pub fn part(&self, label: &str) -> BuildResult<&Part> {
        self.parts
            .get(label)
            .ok_or_else(|| BuildError::PartNotFound(label.to_string()))
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Connect two parts of this assembly, storing the placed child and the
    /// joint that took the value
    pub fn connect(
        &mut self,
        parent: &str,
        joint_a: &str,
        child: &str,
        joint_b: &str,
        value: JointValue,
    ) -> BuildResult<()> {
        let Connection { placed, joint } = joint::connect(
            self.part(parent)?,
            joint_a,
            self.part(child)?,
            joint_b,
            value,
        )?;
        self.parts.insert(placed.label.clone(), placed);
        let owner = joint.owner().unwrap_or(parent).to_string();
        if let Some(part) = self.parts.get_mut(&owner) {
            part.replace_joint(joint);
        }
        Ok(())
    }

    /// World shapes of all parts, by label
    pub fn world_shapes(&self) -> Vec<(String, Shape)> {
        self.parts
            .values()
            .map(|p| (p.label.clone(), p.world_shape()))
            .collect()
    }

    /// Save to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> BuildResult<()> {
        let path = path.as_ref();
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| BuildError::Serialization(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| BuildError::Io(e.to_string()))?;
        info!("Saved assembly {} to {}", self.name, path.display());
        Ok(())
    }

    /// Load from a RON file
    pub fn load(path: impl AsRef<Path>) -> BuildResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BuildError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| BuildError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::Bounds;
    use bc_cad::{CadKernel, CsgKernel, PointClass, Volume};
    use glam::DVec3;

    fn cube(label: &str) -> Part {
        Part::new(
            label,
            Shape::from_volume(Volume::Cuboid {
                length: 2.0,
                width: 2.0,
                height: 2.0,
            }),
        )
    }

    fn door() -> Assembly {
        let mut frame = cube("frame");
        frame
            .add_joint(Joint::revolute(
                "hinge",
                Location::from_xyz(1.0, 1.0, 0.0),
                Some(Bounds::new(0.0, 90.0)),
            ))
            .unwrap();
        let mut leaf = cube("leaf");
        leaf.add_joint(Joint::rigid("pin", Location::from_xyz(-1.0, 1.0, 0.0)))
            .unwrap();

        let mut assembly = Assembly::new("door");
        assembly.add_part(frame);
        assembly.add_part(leaf);
        assembly
    }

    #[test]
    fn test_joint_owner_and_duplicates() {
        let mut part = cube("block");
        part.add_joint(Joint::rigid("top", Location::from_xyz(0.0, 0.0, 1.0)))
            .unwrap();
        assert_eq!(part.joint("top").unwrap().owner(), Some("block"));
        assert!(part.add_joint(Joint::rigid("top", Location::IDENTITY)).is_err());
        assert!(matches!(
            part.joint("bottom"),
            Err(BuildError::JointNotFound(_))
        ));
    }

    #[test]
    fn test_connect_in_place() {
        let mut assembly = door();
        assembly
            .connect("frame", "hinge", "leaf", "pin", JointValue::Angle(0.0))
            .unwrap();
        let leaf = assembly.part("leaf").unwrap();
        assert!(
            leaf.location()
                .approx_eq(&Location::from_xyz(2.0, 0.0, 0.0), 1e-9, 1e-9)
        );

        let kernel = CsgKernel::default();
        let world = leaf.world_shape();
        assert_eq!(
            kernel.classify(&world, DVec3::new(2.5, 0.0, 0.0)).unwrap(),
            PointClass::Inside
        );
        assert_eq!(
            kernel.classify(&world, DVec3::ZERO).unwrap(),
            PointClass::Outside
        );
        // source part untouched
        assert_eq!(assembly.part("frame").unwrap().location(), &Location::IDENTITY);
    }

    #[test]
    fn test_connect_updates_parent_joint() {
        let mut assembly = door();
        assembly
            .connect("frame", "hinge", "leaf", "pin", JointValue::Angle(45.0))
            .unwrap();
        let hinge = assembly.part("frame").unwrap().joint("hinge").unwrap();
        assert_eq!(hinge.value(), JointValue::Angle(45.0));

        let err = assembly
            .connect("frame", "hinge", "leaf", "pin", JointValue::Angle(120.0))
            .unwrap_err();
        assert!(matches!(err, BuildError::ParameterOutOfBounds { .. }));
        assert!(matches!(
            assembly.connect("frame", "hinge", "ghost", "pin", JointValue::None),
            Err(BuildError::PartNotFound(_))
        ));
    }

    #[test]
    fn test_connect_updates_child_joint() {
        let mut table = cube("table");
        table
            .add_joint(Joint::rigid("top", Location::from_xyz(0.0, 0.0, 1.0)))
            .unwrap();
        let mut knob = cube("knob");
        knob.add_joint(Joint::revolute(
            "spindle",
            Location::from_xyz(0.0, 0.0, -1.0),
            None,
        ))
        .unwrap();
        let mut assembly = Assembly::new("knob");
        assembly.add_part(table);
        assembly.add_part(knob);

        assembly
            .connect("table", "top", "knob", "spindle", JointValue::Angle(30.0))
            .unwrap();
        let knob = assembly.part("knob").unwrap();
        assert_eq!(
            knob.joint("spindle").unwrap().value(),
            JointValue::Angle(30.0)
        );
        assert_eq!(
            assembly.part("table").unwrap().joint("top").unwrap().value(),
            JointValue::None
        );
        let spindle = knob.joint_location("spindle").unwrap();
        assert!(spindle.position.distance(DVec3::new(0.0, 0.0, 1.0)) < 1e-9);
    }

    #[test]
    fn test_world_shapes() {
        let mut assembly = door();
        assembly
            .connect("frame", "hinge", "leaf", "pin", JointValue::Angle(0.0))
            .unwrap();
        let kernel = CsgKernel::default();
        let shapes = assembly.world_shapes();
        let labels: Vec<&str> = shapes.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["frame", "leaf"]);
        let bb = kernel.bounding_box(&shapes[1].1).unwrap();
        assert!((bb.min.x - 1.0).abs() < 1e-9);
        assert!((bb.max.x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_and_load() {
        use tempfile::tempdir;

        let temp = tempdir().unwrap();
        let path = temp.path().join("door.ron");
        let mut assembly = door();
        assembly
            .connect("frame", "hinge", "leaf", "pin", JointValue::Angle(30.0))
            .unwrap();
        assembly.save(&path).unwrap();

        let loaded = Assembly::load(&path).unwrap();
        assert_eq!(loaded.name, "door");
        assert_eq!(loaded.len(), 2);
        let leaf = loaded.part("leaf").unwrap();
        assert!(
            leaf.location()
                .approx_eq(assembly.part("leaf").unwrap().location(), 1e-9, 1e-9)
        );
        assert_eq!(leaf.joint("pin").unwrap().owner(), Some("leaf"));
    }
}
