//! Joints and connections between parts
//!
//! A joint is an attachment frame on a part together with the degrees of
//! freedom it allows. Connecting two joints never changes topology: it only
//! computes a new placement for the child part.

use std::fmt;

use bc_cad::Location;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assembly::Part;
use crate::error::{BuildError, BuildResult};

/// Closed range for a joint parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower limit (degrees or mm)
    pub min: f64,
    /// Upper limit (degrees or mm)
    pub max: f64,
}

impl Bounds {
    /// Create bounds; the limits are sorted
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Whether `value` lies within the bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, joint: &str, value: f64) -> BuildResult<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(BuildError::ParameterOutOfBounds {
                joint: joint.to_string(),
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Degrees of freedom of a joint, with optional bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JointKind {
    /// No freedom
    Rigid,
    /// Rotation about the joint Z axis
    Revolute { angular_range: Option<Bounds> },
    /// Translation along the joint Z axis
    Linear { linear_range: Option<Bounds> },
    /// Translation along and rotation about the joint Z axis
    Cylindrical {
        linear_range: Option<Bounds>,
        angular_range: Option<Bounds>,
    },
    /// Rotation about the joint X, Y and Z axes
    Ball { angular_range: Option<[Bounds; 3]> },
}

impl JointKind {
    /// Short name for messages
    pub fn name(&self) -> &'static str {
        match self {
            JointKind::Rigid => "Rigid",
            JointKind::Revolute { .. } => "Revolute",
            JointKind::Linear { .. } => "Linear",
            JointKind::Cylindrical { .. } => "Cylindrical",
            JointKind::Ball { .. } => "Ball",
        }
    }

    fn initial_value(&self) -> JointValue {
        match self {
            JointKind::Rigid => JointValue::None,
            JointKind::Revolute { .. } => JointValue::Angle(0.0),
            JointKind::Linear { .. } => JointValue::Position(0.0),
            JointKind::Cylindrical { .. } => JointValue::Cylindrical {
                position: 0.0,
                angle: 0.0,
            },
            JointKind::Ball { .. } => JointValue::Ball { angles: [0.0; 3] },
        }
    }
}

/// Parameter value of a joint
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum JointValue {
    /// No value; `connect` keeps the joint's current value
    #[default]
    None,
    /// Angle in degrees
    Angle(f64),
    /// Distance in mm
    Position(f64),
    /// Distance in mm and angle in degrees
    Cylindrical { position: f64, angle: f64 },
    /// Rotations about X, Y and Z in degrees
    Ball { angles: [f64; 3] },
}

impl JointValue {
    fn is_zero(&self) -> bool {
        match *self {
            JointValue::None => true,
            JointValue::Angle(v) | JointValue::Position(v) => v == 0.0,
            JointValue::Cylindrical { position, angle } => position == 0.0 && angle == 0.0,
            JointValue::Ball { angles } => angles.iter().all(|a| *a == 0.0),
        }
    }
}

impl fmt::Display for JointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JointValue::None => write!(f, "none"),
            JointValue::Angle(a) => write!(f, "{a}°"),
            JointValue::Position(p) => write!(f, "{p} mm"),
            JointValue::Cylindrical { position, angle } => write!(f, "{position} mm, {angle}°"),
            JointValue::Ball { angles } => {
                write!(f, "({}°, {}°, {}°)", angles[0], angles[1], angles[2])
            }
        }
    }
}

/// A named attachment frame on a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    label: String,
    owner: Option<String>,
    kind: JointKind,
    location: Location,
    value: JointValue,
}

impl Joint {
    fn with_kind(label: impl Into<String>, location: Location, kind: JointKind) -> Self {
        let value = kind.initial_value();
        Self {
            label: label.into(),
            owner: None,
            kind,
            location,
            value,
        }
    }

    /// Fixed attachment
    pub fn rigid(label: impl Into<String>, location: Location) -> Self {
        Self::with_kind(label, location, JointKind::Rigid)
    }

    /// Hinge about the local Z axis; bounds in degrees
    pub fn revolute(label: impl Into<String>, location: Location, bounds: Option<Bounds>) -> Self {
        Self::with_kind(
            label,
            location,
            JointKind::Revolute {
                angular_range: bounds,
            },
        )
    }

    /// Slider along the local Z axis; bounds in mm
    pub fn linear(label: impl Into<String>, location: Location, bounds: Option<Bounds>) -> Self {
        Self::with_kind(
            label,
            location,
            JointKind::Linear {
                linear_range: bounds,
            },
        )
    }

    /// Slider and hinge about the same local Z axis
    pub fn cylindrical(
        label: impl Into<String>,
        location: Location,
        linear_range: Option<Bounds>,
        angular_range: Option<Bounds>,
    ) -> Self {
        Self::with_kind(
            label,
            location,
            JointKind::Cylindrical {
                linear_range,
                angular_range,
            },
        )
    }

    /// Spherical joint; per-axis bounds in degrees
    pub fn ball(label: impl Into<String>, location: Location, bounds: Option<[Bounds; 3]>) -> Self {
        Self::with_kind(
            label,
            location,
            JointKind::Ball {
                angular_range: bounds,
            },
        )
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Label of the owning part, once attached
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn kind(&self) -> &JointKind {
        &self.kind
    }

    /// Attachment frame relative to the owning part
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Current parameter value
    pub fn value(&self) -> JointValue {
        self.value
    }

    pub(crate) fn set_owner(&mut self, owner: &str) {
        self.owner = Some(owner.to_string());
    }

    /// Transform from this joint's frame to the mated frame for `value`.
    ///
    /// `JointValue::None` means the current value.
    pub fn relative_location(&self, value: &JointValue) -> BuildResult<Location> {
        let value = match value {
            JointValue::None => &self.value,
            other => other,
        };
        let label = self.label.as_str();
        match (&self.kind, *value) {
            (JointKind::Rigid, v) if v.is_zero() => Ok(Location::IDENTITY),
            (JointKind::Rigid, v) => Err(self.invalid(format!("rigid joint takes no value, got {v}"))),
            (JointKind::Revolute { angular_range }, JointValue::Angle(angle)) => {
                if let Some(bounds) = angular_range {
                    bounds.check(label, angle)?;
                }
                Ok(Location::from_axis_angle(DVec3::Z, angle))
            }
            (JointKind::Linear { linear_range }, JointValue::Position(position)) => {
                if let Some(bounds) = linear_range {
                    bounds.check(label, position)?;
                }
                Ok(Location::from_translation(DVec3::Z * position))
            }
            (
                JointKind::Cylindrical {
                    linear_range,
                    angular_range,
                },
                JointValue::Cylindrical { position, angle },
            ) => {
                if let Some(bounds) = linear_range {
                    bounds.check(label, position)?;
                }
                if let Some(bounds) = angular_range {
                    bounds.check(label, angle)?;
                }
                Ok(Location::from_translation(DVec3::Z * position)
                    * Location::from_axis_angle(DVec3::Z, angle))
            }
            (JointKind::Ball { angular_range }, JointValue::Ball { angles }) => {
                if let Some(bounds) = angular_range {
                    for (b, a) in bounds.iter().zip(angles) {
                        b.check(label, a)?;
                    }
                }
                Ok(Location::from_euler(angles[0], angles[1], angles[2]))
            }
            (kind, v) => Err(self.invalid(format!("{} joint cannot take value {v}", kind.name()))),
        }
    }

    fn invalid(&self, reason: String) -> BuildError {
        BuildError::InvalidJointParameter {
            joint: self.label.clone(),
            reason,
        }
    }
}

/// Result of connecting two joints
#[derive(Debug, Clone)]
pub struct Connection {
    /// The child part at its new placement
    pub placed: Part,
    /// The joint carrying the connection value, with that value applied.
    /// This is the parent joint unless the parent joint is rigid and the
    /// child joint is not.
    pub joint: Joint,
}

/// Place `child` so that its joint `joint_b` mates with `joint_a` of `parent`.
///
/// The child location only depends on the parent placement, the joint frames
/// and `value`, so connecting again with the same value gives the same
/// placement. At least one of the two joints must be rigid; `value` drives
/// the other one.
pub fn connect(
    parent: &Part,
    joint_a: &str,
    child: &Part,
    joint_b: &str,
    value: JointValue,
) -> BuildResult<Connection> {
    let ja = parent.joint(joint_a)?;
    let jb = child.joint(joint_b)?;

    let (location, driven) = match (ja.kind(), jb.kind()) {
        (_, JointKind::Rigid) => {
            let relative = ja.relative_location(&value)?;
            (
                *parent.location() * *ja.location() * relative * jb.location().inverse(),
                ja,
            )
        }
        (JointKind::Rigid, _) => {
            let relative = jb.relative_location(&value)?;
            (
                *parent.location() * *ja.location() * relative.inverse() * jb.location().inverse(),
                jb,
            )
        }
        (a, b) => {
            return Err(BuildError::IncompatibleJoints {
                parent: ja.label().to_string(),
                child: jb.label().to_string(),
                reason: format!("{} cannot drive {}, one side must be Rigid", a.name(), b.name()),
            });
        }
    };

    let mut joint = driven.clone();
    if value != JointValue::None {
        joint.value = value;
    }
    debug!(
        parent = %parent.label,
        child = %child.label,
        joint = %joint.label,
        value = %joint.value,
        location = %location,
        "connect"
    );

    Ok(Connection {
        placed: child.clone().with_location(location),
        joint,
    })
}
