//! # Codec Error Types
//!
//! All errors that can occur while configuring packers or moving bits.
//!
//! Every error is raised at the point of detection and returned as-is. The
//! codec never retries and never logs a failure; the message-framing layer
//! decides whether a bad message is dropped.

use thiserror::Error;

/// Errors that can occur in the codec.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// A bit width outside the accepted range was requested.
    #[error("invalid bit count {bits}: must be between 1 and {max}")]
    InvalidBitCount {
        /// The requested width.
        bits: u32,
        /// The widest accepted value.
        max: u32,
    },

    /// A float range with `min >= max` (or a non-finite bound).
    #[error("invalid range: min {min} must be below max {max}")]
    InvalidRange {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// A precision that is not a positive finite number, or that is
    /// larger than the whole range.
    #[error("invalid precision {precision}")]
    InvalidPrecision {
        /// The requested precision.
        precision: f32,
    },

    /// A value does not fit the largest width the packer declares.
    #[error("value {value} exceeds the packer limit of {limit}")]
    ValueTooLarge {
        /// The value passed in.
        value: u64,
        /// The exclusive upper bound.
        limit: u64,
    },

    /// Variable-length tier widths are not strictly increasing.
    #[error("tier widths must be strictly increasing: {small} < {medium} < {large}")]
    InvalidTiers {
        /// Small tier width.
        small: u32,
        /// Medium tier width.
        medium: u32,
        /// Large tier width.
        large: u32,
    },

    /// A reader was pointed at a range outside its buffer.
    #[error("segment offset {offset} + count {count} exceeds buffer length {len}")]
    InvalidSegment {
        /// Start of the requested range.
        offset: usize,
        /// Length of the requested range.
        count: usize,
        /// Length of the backing buffer.
        len: usize,
    },

    /// A read needed more bits than the buffer holds.
    #[error("buffer exhausted: requested {requested} bits, {available} available")]
    BufferExhausted {
        /// Bits asked for.
        requested: u32,
        /// Bits that were left.
        available: usize,
    },

    /// A composite packer needs more bits than one scratch pass carries.
    #[error("unsupported range: {total_bits} bits exceeds the {max_bits}-bit record limit")]
    UnsupportedRange {
        /// Sum of the component widths.
        total_bits: u32,
        /// The record limit.
        max_bits: u32,
    },

    /// A write would not fit in the pre-sized buffer.
    #[error("buffer overflow: capacity {capacity} bytes")]
    BufferOverflow {
        /// Size of the writer's buffer.
        capacity: usize,
    },

    /// A schema file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CodecError {
    /// Returns true for caller-configuration mistakes (bad widths, ranges,
    /// precisions, tier orders, out-of-range values).
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidBitCount { .. }
                | Self::InvalidRange { .. }
                | Self::InvalidPrecision { .. }
                | Self::ValueTooLarge { .. }
                | Self::InvalidTiers { .. }
                | Self::InvalidSegment { .. }
        )
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Validates a single-call bit width against `1..=max`.
#[inline]
pub(crate) const fn check_bits(bits: u32, max: u32) -> CodecResult<()> {
    if bits == 0 || bits > max {
        return Err(CodecError::InvalidBitCount { bits, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_family() {
        assert!(CodecError::InvalidBitCount { bits: 0, max: 32 }.is_invalid_argument());
        assert!(CodecError::ValueTooLarge { value: 9, limit: 8 }.is_invalid_argument());
        assert!(!CodecError::BufferExhausted { requested: 8, available: 0 }.is_invalid_argument());
        assert!(!CodecError::UnsupportedRange { total_bits: 65, max_bits: 64 }.is_invalid_argument());
    }

    #[test]
    fn test_check_bits() {
        assert!(check_bits(1, 32).is_ok());
        assert!(check_bits(32, 32).is_ok());
        assert_eq!(check_bits(33, 32), Err(CodecError::InvalidBitCount { bits: 33, max: 32 }));
        assert!(check_bits(0, 32).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = CodecError::BufferExhausted { requested: 10, available: 3 };
        assert_eq!(err.to_string(), "buffer exhausted: requested 10 bits, 3 available");
    }
}
