//! # Sync Schema
//!
//! Packer configuration loaded from TOML.
//!
//! Nothing about a packer's range, precision or width travels on the wire.
//! Both ends must build their packers from the same schema file; a mismatch
//! is undetectable by the codec and silently corrupts every value after the
//! first disagreement.
//!
//! ```toml
//! [transform.position]
//! min = { x = -512.0, y = -16.0, z = -512.0 }
//! max = { x = 512.0, y = 240.0, z = 512.0 }
//! precision = 0.01
//!
//! [transform.rotation]
//! bits_per_component = 10
//!
//! [scalars.health]
//! min = 0.0
//! max = 100.0
//! precision = 0.5
//!
//! [counters.ammo]
//! small = 4
//! medium = 8
//! large = 16
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tidewire_shared::{Vec3, DEFAULT_QUATERNION_BITS};

use crate::error::{CodecError, CodecResult};
use crate::packing::{
    FloatPacker, PositionPacker, QuaternionPacker, TransformPacker, UIntVariablePacker,
};

/// Range and precision of one scalar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloatPackerConfig {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
    /// Largest acceptable round-trip error.
    pub precision: f32,
}

impl FloatPackerConfig {
    /// Builds the packer.
    ///
    /// # Errors
    ///
    /// Any [`FloatPacker::new`] error.
    pub fn build(&self) -> CodecResult<FloatPacker> {
        FloatPacker::new(self.min, self.max, self.precision)
    }
}

/// Precision of a position: one value for every axis, or one per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisPrecision {
    /// Same precision on x, y and z.
    Uniform(f32),
    /// Separate precision per axis.
    PerAxis(Vec3),
}

impl AxisPrecision {
    /// Per-axis view.
    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        match self {
            Self::Uniform(p) => Vec3::splat(p),
            Self::PerAxis(v) => v,
        }
    }
}

/// Bounding box and precision of a position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionPackerConfig {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
    /// Largest acceptable round-trip error.
    pub precision: AxisPrecision,
}

impl PositionPackerConfig {
    /// Builds the packer.
    ///
    /// # Errors
    ///
    /// Any [`PositionPacker::new`] error.
    pub fn build(&self) -> CodecResult<PositionPacker> {
        PositionPacker::new(self.min, self.max, self.precision.to_vec3())
    }
}

/// Width of a rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuaternionPackerConfig {
    /// Bits per transmitted component.
    #[serde(default = "default_quaternion_bits")]
    pub bits_per_component: u32,
}

const fn default_quaternion_bits() -> u32 {
    DEFAULT_QUATERNION_BITS
}

impl Default for QuaternionPackerConfig {
    fn default() -> Self {
        Self {
            bits_per_component: DEFAULT_QUATERNION_BITS,
        }
    }
}

impl QuaternionPackerConfig {
    /// Builds the packer.
    ///
    /// # Errors
    ///
    /// Any [`QuaternionPacker::new`] error.
    pub fn build(&self) -> CodecResult<QuaternionPacker> {
        QuaternionPacker::new(self.bits_per_component)
    }
}

/// Tier widths of a variable-length integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UIntVariablePackerConfig {
    /// Small tier width.
    pub small: u32,
    /// Medium tier width.
    pub medium: u32,
    /// Large tier width.
    pub large: u32,
}

impl UIntVariablePackerConfig {
    /// Builds the packer.
    ///
    /// # Errors
    ///
    /// Any [`UIntVariablePacker::new`] error.
    pub fn build(&self) -> CodecResult<UIntVariablePacker> {
        UIntVariablePacker::new(self.small, self.medium, self.large)
    }
}

/// Position and rotation settings of synchronized transforms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Position settings.
    pub position: PositionPackerConfig,
    /// Rotation settings.
    #[serde(default)]
    pub rotation: QuaternionPackerConfig,
}

impl TransformConfig {
    /// Builds the packer.
    ///
    /// # Errors
    ///
    /// Any position or rotation construction error.
    pub fn build(&self) -> CodecResult<TransformPacker> {
        Ok(TransformPacker::new(self.position.build()?, self.rotation.build()?))
    }
}

/// Every packer configuration a link uses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncSchema {
    /// Transform settings, if the link carries transforms.
    #[serde(default)]
    pub transform: Option<TransformConfig>,
    /// Named scalar fields.
    #[serde(default)]
    pub scalars: BTreeMap<String, FloatPackerConfig>,
    /// Named counter fields.
    #[serde(default)]
    pub counters: BTreeMap<String, UIntVariablePackerConfig>,
}

impl SyncSchema {
    /// Parses a schema from TOML text.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidConfig`] if the text is not a valid schema.
    pub fn from_toml_str(text: &str) -> CodecResult<Self> {
        toml::from_str(text).map_err(|e| CodecError::InvalidConfig(e.to_string()))
    }

    /// Reads and parses a schema file.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> CodecResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CodecError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let schema = Self::from_toml_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            scalars = schema.scalars.len(),
            counters = schema.counters.len(),
            "sync schema loaded"
        );
        Ok(schema)
    }

    /// Serializes the schema back to TOML.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidConfig`] if the schema cannot be represented.
    pub fn to_toml_string(&self) -> CodecResult<String> {
        toml::to_string(self).map_err(|e| CodecError::InvalidConfig(e.to_string()))
    }

    /// Builds every packer, failing on the first invalid entry.
    ///
    /// # Errors
    ///
    /// The first construction error encountered.
    pub fn build(&self) -> CodecResult<SyncPackers> {
        let transform = self.transform.as_ref().map(TransformConfig::build).transpose()?;
        let scalars = self
            .scalars
            .iter()
            .map(|(name, config)| Ok((name.clone(), config.build()?)))
            .collect::<CodecResult<_>>()?;
        let counters = self
            .counters
            .iter()
            .map(|(name, config)| Ok((name.clone(), config.build()?)))
            .collect::<CodecResult<_>>()?;

        Ok(SyncPackers {
            transform,
            scalars,
            counters,
        })
    }
}

/// Packers built from a [`SyncSchema`].
#[derive(Clone, Debug, Default)]
pub struct SyncPackers {
    transform: Option<TransformPacker>,
    scalars: BTreeMap<String, FloatPacker>,
    counters: BTreeMap<String, UIntVariablePacker>,
}

impl SyncPackers {
    /// The transform packer, if the schema declares one.
    #[must_use]
    pub const fn transform(&self) -> Option<&TransformPacker> {
        self.transform.as_ref()
    }

    /// A named scalar packer.
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&FloatPacker> {
        self.scalars.get(name)
    }

    /// A named counter packer.
    #[must_use]
    pub fn counter(&self, name: &str) -> Option<&UIntVariablePacker> {
        self.counters.get(name)
    }
}
