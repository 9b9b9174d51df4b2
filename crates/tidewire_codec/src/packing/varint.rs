//! # Variable-Length Unsigned Integers
//!
//! Three fixed widths, picked by magnitude and announced by 1–2 selector bits.
//!
//! ```text
//! value < 2^small    →  0  + small bits
//! value < 2^medium   →  1 0 + medium bits
//! value < 2^large    →  1 1 + large bits
//! ```

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{check_bits, CodecError, CodecResult};

/// Widest tier accepted.
const MAX_TIER_BITS: u32 = 64;

/// Packs unsigned integers using one of three tier widths.
///
/// Small values (the common case) pay one selector bit; larger values pay two.
///
/// # Example
///
/// ```rust
/// use tidewire_codec::{BitWriter, UIntVariablePacker};
///
/// let packer = UIntVariablePacker::new(6, 12, 18)?;
/// assert_eq!(packer.encoded_bits(5)?, 7);
/// assert_eq!(packer.encoded_bits(4000)?, 14);
/// assert!(packer.encoded_bits(1 << 18).is_err());
/// # Ok::<(), tidewire_codec::CodecError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UIntVariablePacker {
    small_bits: u32,
    medium_bits: u32,
    large_bits: u32,
}

impl UIntVariablePacker {
    /// Creates a packer with the given tier widths.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidBitCount`] unless every width is in `1..=64`
    /// - [`CodecError::InvalidTiers`] unless `small < medium < large`
    pub fn new(small_bits: u32, medium_bits: u32, large_bits: u32) -> CodecResult<Self> {
        check_bits(small_bits, MAX_TIER_BITS)?;
        check_bits(medium_bits, MAX_TIER_BITS)?;
        check_bits(large_bits, MAX_TIER_BITS)?;
        if !(small_bits < medium_bits && medium_bits < large_bits) {
            return Err(CodecError::InvalidTiers {
                small: small_bits,
                medium: medium_bits,
                large: large_bits,
            });
        }
        tracing::debug!(small_bits, medium_bits, large_bits, "variable uint packer configured");
        Ok(Self {
            small_bits,
            medium_bits,
            large_bits,
        })
    }

    /// Small tier width.
    #[inline]
    #[must_use]
    pub const fn small_bits(&self) -> u32 {
        self.small_bits
    }

    /// Medium tier width.
    #[inline]
    #[must_use]
    pub const fn medium_bits(&self) -> u32 {
        self.medium_bits
    }

    /// Large tier width.
    #[inline]
    #[must_use]
    pub const fn large_bits(&self) -> u32 {
        self.large_bits
    }

    /// Bits [`pack`](Self::pack) would write for `value`, selector included.
    ///
    /// # Errors
    ///
    /// [`CodecError::ValueTooLarge`] if `value >= 2^large`.
    pub fn encoded_bits(&self, value: u64) -> CodecResult<u32> {
        if fits(value, self.small_bits) {
            Ok(1 + self.small_bits)
        } else if fits(value, self.medium_bits) {
            Ok(2 + self.medium_bits)
        } else if fits(value, self.large_bits) {
            Ok(2 + self.large_bits)
        } else {
            Err(self.too_large(value))
        }
    }

    /// Writes the selector bits, then `value` at the tier width.
    ///
    /// # Errors
    ///
    /// - [`CodecError::ValueTooLarge`] if `value >= 2^large` (nothing is written)
    /// - [`CodecError::BufferOverflow`] if the whole record does not fit
    ///   (nothing is written)
    pub fn pack(&self, writer: &mut BitWriter, value: u64) -> CodecResult<()> {
        writer.ensure_room(self.encoded_bits(value)? as usize)?;
        if fits(value, self.small_bits) {
            writer.write_bool(false)?;
            writer.write_u64(value, self.small_bits)
        } else if fits(value, self.medium_bits) {
            writer.write_bool(true)?;
            writer.write_bool(false)?;
            writer.write_u64(value, self.medium_bits)
        } else {
            writer.write_bool(true)?;
            writer.write_bool(true)?;
            writer.write_u64(value, self.large_bits)
        }
    }

    /// Reads the selector bits, then the value at the announced width.
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferExhausted`] if the reader runs out of bits.
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> CodecResult<u64> {
        let bits = if !reader.read_bool()? {
            self.small_bits
        } else if !reader.read_bool()? {
            self.medium_bits
        } else {
            self.large_bits
        };
        reader.read_u64(bits)
    }

    fn too_large(&self, value: u64) -> CodecError {
        // large_bits < 64 here: every u64 fits a 64-bit tier.
        CodecError::ValueTooLarge {
            value,
            limit: 1u64 << self.large_bits,
        }
    }
}

/// True if `value < 2^bits`.
#[inline]
const fn fits(value: u64, bits: u32) -> bool {
    bits >= 64 || value >> bits == 0
}
