//! # Transform Packer
//!
//! One object's position followed by its rotation.

use tidewire_shared::Transform;

use super::position::PositionPacker;
use super::quaternion::QuaternionPacker;
use crate::bitstream::{BitReader, BitWriter};
use crate::error::CodecResult;

/// Packs a [`Transform`] as position bits then rotation bits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformPacker {
    position: PositionPacker,
    rotation: QuaternionPacker,
}

impl TransformPacker {
    /// Combines a position and a rotation packer.
    #[must_use]
    pub const fn new(position: PositionPacker, rotation: QuaternionPacker) -> Self {
        Self { position, rotation }
    }

    /// The position half.
    #[must_use]
    pub const fn position(&self) -> &PositionPacker {
        &self.position
    }

    /// The rotation half.
    #[must_use]
    pub const fn rotation(&self) -> &QuaternionPacker {
        &self.rotation
    }

    /// Total bits per transform.
    #[must_use]
    pub const fn bit_count(&self) -> u32 {
        self.position.bit_count() + self.rotation.bit_count()
    }

    /// Writes position, then rotation.
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferOverflow`](crate::CodecError::BufferOverflow) if
    /// the whole record does not fit. Nothing is written in that case.
    pub fn pack(&self, writer: &mut BitWriter, transform: &Transform) -> CodecResult<()> {
        writer.ensure_room(self.bit_count() as usize)?;
        self.position.pack(writer, transform.position)?;
        self.rotation.pack(writer, transform.rotation)
    }

    /// Reads position, then rotation.
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferExhausted`](crate::CodecError::BufferExhausted) if
    /// the reader runs out of bits.
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> CodecResult<Transform> {
        let position = self.position.unpack(reader)?;
        let rotation = self.rotation.unpack(reader)?;
        Ok(Transform::new(position, rotation))
    }
}
