//! # Quaternion Packer ("smallest three")
//!
//! A unit quaternion has one redundant component: `x² + y² + z² + w² = 1`.
//! The largest-magnitude component is dropped and rebuilt on the receiving
//! side, so only three components travel.
//!
//! ```text
//! ┌─────────┬────────────┬────────────┬────────────┐
//! │ index:2 │ a:bits     │ b:bits     │ c:bits     │
//! └─────────┴────────────┴────────────┴────────────┘
//!   dropped    the three remaining components in x, y, z, w order,
//!   component  each quantized in [-1/√2, 1/√2]
//! ```
//!
//! `q` and `-q` are the same rotation, so the sender flips the sign of the
//! whole quaternion when the dropped component is negative. The receiver can
//! then always take the positive root.

use std::f32::consts::FRAC_1_SQRT_2;

use tidewire_shared::{Quaternion, MAX_WRITE_BITS};

use super::compression::{scale_from_uint, scale_to_uint};
use crate::bitstream::{BitReader, BitWriter};
use crate::error::{check_bits, CodecResult};

/// Bits used for the dropped-component index.
const INDEX_BITS: u32 = 2;

/// Largest magnitude a non-dropped component can have.
const SMALL_COMPONENT_MAX: f32 = FRAC_1_SQRT_2;

/// Squared-norm deviation from one tolerated before renormalizing.
pub const NORMALIZE_EPSILON: f32 = 1.0e-5;

/// Squared norms below this are treated as degenerate and sent as identity.
pub const DEGENERATE_EPSILON: f32 = 1.0e-8;

/// Packs unit rotations into `2 + 3 × bits_per_component` bits.
///
/// Typical widths are 9 to 12 bits per component.
///
/// # Example
///
/// ```rust
/// use tidewire_codec::{BitReader, BitWriter, QuaternionPacker};
/// use tidewire_shared::{Quaternion, Vec3};
///
/// let packer = QuaternionPacker::new(10)?;
/// let q = Quaternion::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 1.0);
///
/// let mut writer = BitWriter::with_capacity(8);
/// packer.pack(&mut writer, q)?;
/// assert_eq!(writer.bits_written(), 32);
///
/// let back = packer.unpack(&mut BitReader::new(writer.to_segment()))?;
/// assert!(q.angle_to(back) < 0.01);
/// # Ok::<(), tidewire_codec::CodecError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuaternionPacker {
    bits_per_component: u32,
    max_uint: u32,
}

impl QuaternionPacker {
    /// Creates a packer using `bits_per_component` bits for each of the
    /// three transmitted components.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidBitCount`](crate::CodecError::InvalidBitCount)
    /// unless `1 <= bits_per_component <= 32`.
    pub fn new(bits_per_component: u32) -> CodecResult<Self> {
        check_bits(bits_per_component, MAX_WRITE_BITS)?;
        #[allow(clippy::cast_possible_truncation)]
        let max_uint = ((1u64 << bits_per_component) - 1) as u32;
        tracing::debug!(
            bits_per_component,
            total_bits = INDEX_BITS + 3 * bits_per_component,
            "quaternion packer configured"
        );
        Ok(Self {
            bits_per_component,
            max_uint,
        })
    }

    /// Bits per transmitted component.
    #[inline]
    #[must_use]
    pub const fn bits_per_component(&self) -> u32 {
        self.bits_per_component
    }

    /// Total bits per rotation: `2 + 3 × bits_per_component`.
    #[inline]
    #[must_use]
    pub const fn bit_count(&self) -> u32 {
        INDEX_BITS + 3 * self.bits_per_component
    }

    /// Quantization step of one transmitted component.
    #[must_use]
    pub fn precision(&self) -> f32 {
        #[allow(clippy::cast_possible_truncation)]
        let step = (2.0 * f64::from(SMALL_COMPONENT_MAX) / f64::from(self.max_uint)) as f32;
        step
    }

    /// Writes `rotation`.
    ///
    /// Non-unit input is renormalized; zero or non-finite input is sent as
    /// [`Quaternion::IDENTITY`].
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferOverflow`](crate::CodecError::BufferOverflow) if
    /// the whole record does not fit. Nothing is written in that case.
    pub fn pack(&self, writer: &mut BitWriter, rotation: Quaternion) -> CodecResult<()> {
        writer.ensure_room(self.bit_count() as usize)?;
        let mut components = normalize(rotation).to_array();
        let largest = largest_index(&components);

        if components[largest] < 0.0 {
            for c in &mut components {
                *c = -*c;
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let index = largest as u32;
        writer.write(index, INDEX_BITS)?;
        for (i, &c) in components.iter().enumerate() {
            if i == largest {
                continue;
            }
            let quantized = scale_to_uint(c, -SMALL_COMPONENT_MAX, SMALL_COMPONENT_MAX, 0, self.max_uint);
            writer.write(quantized, self.bits_per_component)?;
        }
        Ok(())
    }

    /// Reads a rotation. The result is always unit length.
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferExhausted`](crate::CodecError::BufferExhausted) if
    /// the reader runs out of bits.
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> CodecResult<Quaternion> {
        let largest = reader.read(INDEX_BITS)? as usize;
        let mut small = [0.0f32; 3];
        for c in &mut small {
            let quantized = reader.read(self.bits_per_component)?;
            *c = scale_from_uint(quantized, 0, self.max_uint, -SMALL_COMPONENT_MAX, SMALL_COMPONENT_MAX);
        }

        let sum: f32 = small.iter().map(|c| c * c).sum();
        let dropped = if sum < 1.0 {
            (1.0 - sum).sqrt()
        } else {
            // Quantization overshoot: nothing left for the dropped component.
            let inv = sum.sqrt().recip();
            for c in &mut small {
                *c *= inv;
            }
            0.0
        };

        let mut components = [0.0f32; 4];
        let mut next = small.iter();
        for (i, slot) in components.iter_mut().enumerate() {
            *slot = if i == largest {
                dropped
            } else {
                next.next().copied().unwrap_or_default()
            };
        }
        Ok(Quaternion::from_array(components))
    }
}

/// Returns `q` scaled to unit length, or identity when `q` is degenerate.
fn normalize(q: Quaternion) -> Quaternion {
    let length_squared = q.length_squared();
    if !length_squared.is_finite() || length_squared < DEGENERATE_EPSILON {
        tracing::trace!(?q, "degenerate rotation replaced by identity");
        return Quaternion::IDENTITY;
    }
    if (length_squared - 1.0).abs() > NORMALIZE_EPSILON {
        let inv = length_squared.sqrt().recip();
        return Quaternion::new(q.x * inv, q.y * inv, q.z * inv, q.w * inv);
    }
    q
}

/// Index of the largest-magnitude component; the first one wins ties.
fn largest_index(components: &[f32; 4]) -> usize {
    let mut best = 0;
    for (i, c) in components.iter().enumerate().skip(1) {
        if c.abs() > components[best].abs() {
            best = i;
        }
    }
    best
}
