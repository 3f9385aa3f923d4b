//! Build configuration file support

use std::path::Path;

use bc_cad::CsgSettings;
use serde::{Deserialize, Serialize};

use crate::constants::{ANGULAR_TOLERANCE, LINEAR_TOLERANCE};
use crate::error::{BuildError, BuildResult};

/// Tolerances used when comparing placements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Positional tolerance (mm)
    pub linear: f64,
    /// Rotational tolerance (rad)
    pub angular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            linear: LINEAR_TOLERANCE,
            angular: ANGULAR_TOLERANCE,
        }
    }
}

/// Session configuration, stored as RON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Placement comparison tolerances
    pub tolerance: Tolerance,
    /// Settings for the CSG reference kernel
    pub kernel: CsgSettings,
}

impl BuildConfig {
    /// Parse a RON document
    pub fn from_ron_str(content: &str) -> BuildResult<Self> {
        ron::from_str(content).map_err(|e| BuildError::Config(e.to_string()))
    }

    /// Load from a RON file
    pub fn load(path: impl AsRef<Path>) -> BuildResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| BuildError::Config(format!("{}: {e}", path.display())))?;
        Self::from_ron_str(&content)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> BuildResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| BuildError::Config(e.to_string()))
    }

    /// Save to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> BuildResult<()> {
        let content = self.to_ron_string()?;
        std::fs::write(path.as_ref(), content).map_err(|e| BuildError::Config(e.to_string()))
    }
}
