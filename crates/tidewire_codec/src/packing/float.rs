//! # Float Packer
//!
//! Quantizes a bounded float to the fewest bits that meet a precision.

use tidewire_shared::MAX_WRITE_BITS;

use super::compression::{scale_from_uint, scale_to_uint};
use crate::bitstream::{BitReader, BitWriter};
use crate::error::{check_bits, CodecError, CodecResult};

/// Packs floats inside `[min, max]` at a fixed bit width.
///
/// The width is derived once at construction: the smallest `bit_count` with
/// `2^bit_count - 1 >= ceil((max - min) / precision)`.
///
/// Round-trip error inside the range is at most
/// [`precision()`](Self::precision) `= (max - min) / (2^bit_count - 1)`.
/// Values outside the range saturate to the nearest bound.
///
/// # Example
///
/// ```rust
/// use tidewire_codec::{BitReader, BitWriter, FloatPacker};
///
/// let packer = FloatPacker::new(0.0, 100.0, 0.01)?;
/// assert_eq!(packer.bit_count(), 14);
///
/// let mut writer = BitWriter::with_capacity(4);
/// packer.pack(&mut writer, 50.0)?;
/// let bytes = writer.to_segment();
///
/// let value = packer.unpack(&mut BitReader::new(bytes))?;
/// assert!((value - 50.0).abs() <= 0.01);
/// # Ok::<(), tidewire_codec::CodecError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatPacker {
    min: f32,
    max: f32,
    bit_count: u32,
    /// `2^bit_count - 1`; the integer range always starts at zero.
    max_uint: u32,
}

impl FloatPacker {
    /// Creates a packer for `[min, max]` with at most `precision` error.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidRange`] if `min >= max` or a bound is not finite
    /// - [`CodecError::InvalidPrecision`] if `precision` is not positive and
    ///   finite, or is larger than the range
    /// - [`CodecError::InvalidBitCount`] if more than 32 bits would be needed
    pub fn new(min: f32, max: f32, precision: f32) -> CodecResult<Self> {
        check_range(min, max)?;
        if !(precision.is_finite() && precision > 0.0) {
            return Err(CodecError::InvalidPrecision { precision });
        }

        let ratio = (f64::from(max) - f64::from(min)) / f64::from(precision);
        if ratio < 1.0 {
            return Err(CodecError::InvalidPrecision { precision });
        }
        // Saturating cast: absurd ratios land on u64::MAX and fail the width check.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let range_uint = ratio.ceil() as u64;
        let bit_count = u64::BITS - range_uint.leading_zeros();
        check_bits(bit_count, MAX_WRITE_BITS)?;

        let packer = Self::build(min, max, bit_count);
        tracing::debug!(min, max, precision, bit_count, "float packer configured");
        Ok(packer)
    }

    /// Creates a packer for `[-max_abs, max_abs]`.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn symmetric(max_abs: f32, precision: f32) -> CodecResult<Self> {
        Self::new(-max_abs, max_abs, precision)
    }

    /// Creates a packer for `[min, max]` with an explicit bit width.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidRange`] if `min >= max` or a bound is not finite
    /// - [`CodecError::InvalidBitCount`] unless `1 <= bit_count <= 32`
    pub fn with_bit_count(min: f32, max: f32, bit_count: u32) -> CodecResult<Self> {
        check_range(min, max)?;
        check_bits(bit_count, MAX_WRITE_BITS)?;
        Ok(Self::build(min, max, bit_count))
    }

    fn build(min: f32, max: f32, bit_count: u32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let max_uint = ((1u64 << bit_count) - 1) as u32;
        Self {
            min,
            max,
            bit_count,
            max_uint,
        }
    }

    /// Bits written per value.
    #[inline]
    #[must_use]
    pub const fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Lower bound of the range.
    #[inline]
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound of the range.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Actual quantization step: `(max - min) / (2^bit_count - 1)`.
    ///
    /// Never larger than the precision requested at construction.
    #[must_use]
    pub fn precision(&self) -> f32 {
        #[allow(clippy::cast_possible_truncation)]
        let step = ((f64::from(self.max) - f64::from(self.min)) / f64::from(self.max_uint)) as f32;
        step
    }

    /// Writes `value` (clamped to the range) as `bit_count` bits.
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferOverflow`] if the writer is full.
    #[inline]
    pub fn pack(&self, writer: &mut BitWriter, value: f32) -> CodecResult<()> {
        let quantized = scale_to_uint(value, self.min, self.max, 0, self.max_uint);
        writer.write(quantized, self.bit_count)
    }

    /// Reads `bit_count` bits and maps them back into the range.
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferExhausted`] if the reader runs out of bits.
    #[inline]
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> CodecResult<f32> {
        let quantized = reader.read(self.bit_count)?;
        Ok(scale_from_uint(quantized, 0, self.max_uint, self.min, self.max))
    }
}

/// Rejects empty, inverted and non-finite ranges.
pub(crate) fn check_range(min: f32, max: f32) -> CodecResult<()> {
    if !(min.is_finite() && max.is_finite()) || min >= max {
        return Err(CodecError::InvalidRange { min, max });
    }
    Ok(())
}
