//! # Position Packer
//!
//! Three independent [`FloatPacker`]s, one per axis of a bounding box.

use tidewire_shared::{Vec3, SCRATCH_BITS};

use super::float::FloatPacker;
use crate::bitstream::{BitReader, BitWriter};
use crate::error::{CodecError, CodecResult};

/// Packs points inside an axis-aligned bounding box.
///
/// Axes are written x, y, z and compressed independently. The summed width
/// must fit in one 64-bit record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionPacker {
    axes: [FloatPacker; 3],
    bit_count: u32,
}

impl PositionPacker {
    /// Creates a packer with a per-axis precision.
    ///
    /// # Errors
    ///
    /// - Any [`FloatPacker::new`] error for an axis
    /// - [`CodecError::UnsupportedRange`] if the three widths sum past 64
    pub fn new(min: Vec3, max: Vec3, precision: Vec3) -> CodecResult<Self> {
        let axes = [
            FloatPacker::new(min.x, max.x, precision.x)?,
            FloatPacker::new(min.y, max.y, precision.y)?,
            FloatPacker::new(min.z, max.z, precision.z)?,
        ];
        Self::from_axes(axes)
    }

    /// Creates a packer with the same precision on every axis.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn uniform(min: Vec3, max: Vec3, precision: f32) -> CodecResult<Self> {
        Self::new(min, max, Vec3::splat(precision))
    }

    /// Combines three pre-built axis packers (x, y, z).
    ///
    /// # Errors
    ///
    /// [`CodecError::UnsupportedRange`] if the widths sum past 64.
    pub fn from_axes(axes: [FloatPacker; 3]) -> CodecResult<Self> {
        let bit_count: u32 = axes.iter().map(FloatPacker::bit_count).sum();
        if bit_count > SCRATCH_BITS {
            return Err(CodecError::UnsupportedRange {
                total_bits: bit_count,
                max_bits: SCRATCH_BITS,
            });
        }
        tracing::debug!(
            x_bits = axes[0].bit_count(),
            y_bits = axes[1].bit_count(),
            z_bits = axes[2].bit_count(),
            "position packer configured"
        );
        Ok(Self { axes, bit_count })
    }

    /// Total bits per position.
    #[inline]
    #[must_use]
    pub const fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Packer for axis `index` (0 = x, 1 = y, 2 = z), or `None` past z.
    #[inline]
    #[must_use]
    pub fn axis(&self, index: usize) -> Option<&FloatPacker> {
        self.axes.get(index)
    }

    /// All three axis packers in x, y, z order.
    #[inline]
    #[must_use]
    pub const fn axes(&self) -> &[FloatPacker; 3] {
        &self.axes
    }

    /// Writes x, y, z.
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferOverflow`] if all three axes do not fit. Nothing
    /// is written in that case.
    pub fn pack(&self, writer: &mut BitWriter, position: Vec3) -> CodecResult<()> {
        writer.ensure_room(self.bit_count as usize)?;
        for (packer, value) in self.axes.iter().zip(position.to_array()) {
            packer.pack(writer, value)?;
        }
        Ok(())
    }

    /// Reads x, y, z.
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferExhausted`] if the reader runs out of bits.
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> CodecResult<Vec3> {
        let x = self.axes[0].unpack(reader)?;
        let y = self.axes[1].unpack(reader)?;
        let z = self.axes[2].unpack(reader)?;
        Ok(Vec3::new(x, y, z))
    }
}
