//! Bit writer over a pre-sized byte buffer.

use tidewire_shared::MAX_WRITE_BITS;

use super::low_mask;
use crate::error::{check_bits, CodecError, CodecResult};

/// Packs arbitrary-width integers into a fixed-size byte buffer.
///
/// Bits accumulate in a 64-bit scratch register and are committed to the
/// buffer 32 at a time. Call [`flush`](Self::flush) or
/// [`to_segment`](Self::to_segment) to commit the final partial word.
///
/// # Thread Safety
///
/// Not shareable while writing: every method takes `&mut self`. Use one
/// writer per in-flight message, or pool them with
/// [`WriterPool`](crate::pool::WriterPool).
///
/// # Example
///
/// ```rust
/// use tidewire_codec::BitWriter;
///
/// let mut writer = BitWriter::with_capacity(16);
/// writer.write(5, 3)?;
/// writer.write(1000, 10)?;
/// assert_eq!(writer.to_segment().len(), 2);
/// # Ok::<(), tidewire_codec::CodecError>(())
/// ```
pub struct BitWriter {
    /// Backing storage, never resized.
    buffer: Vec<u8>,
    /// Bytes committed so far.
    position: usize,
    /// Pending bits, low bits first.
    scratch: u64,
    /// Number of valid bits in `scratch` (always < 32 between calls).
    scratch_bits: u32,
}

impl BitWriter {
    /// Creates a writer with a zeroed buffer of `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_buffer(vec![0u8; capacity])
    }

    /// Creates a writer over an existing buffer. Its length is the capacity.
    ///
    /// The buffer content is overwritten as bits are committed.
    #[must_use]
    pub fn from_buffer(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            position: 0,
            scratch: 0,
            scratch_bits: 0,
        }
    }

    /// Size of the backing buffer in bytes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes committed so far (unflushed scratch bits are not counted).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.position
    }

    /// Returns true if nothing has been written since construction or reset.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.position == 0 && self.scratch_bits == 0
    }

    /// Total bits written, including those still in scratch.
    #[inline]
    #[must_use]
    pub const fn bits_written(&self) -> usize {
        self.position * 8 + self.scratch_bits as usize
    }

    /// Bits that can still be written before the buffer is full.
    #[inline]
    #[must_use]
    pub fn bits_free(&self) -> usize {
        self.buffer.len() * 8 - self.bits_written()
    }

    /// Fails unless `bits` more bits fit. Packers call this with their full
    /// record cost so a rejected record leaves the writer untouched.
    #[inline]
    pub(crate) fn ensure_room(&self, bits: usize) -> CodecResult<()> {
        if bits > self.bits_free() {
            return Err(CodecError::BufferOverflow {
                capacity: self.buffer.len(),
            });
        }
        Ok(())
    }

    /// Appends the low `bits` bits of `value`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidBitCount`] unless `1 <= bits <= 32`
    /// - [`CodecError::BufferOverflow`] if the bits do not fit in the buffer
    #[inline]
    pub fn write(&mut self, value: u32, bits: u32) -> CodecResult<()> {
        check_bits(bits, MAX_WRITE_BITS)?;
        self.ensure_room(bits as usize)?;

        let masked = u64::from(value) & low_mask(bits);
        self.scratch |= masked << self.scratch_bits;
        self.scratch_bits += bits;

        if self.scratch_bits >= 32 {
            // Low 32 bits are complete; the overflow check above guarantees room.
            #[allow(clippy::cast_possible_truncation)]
            let word = self.scratch as u32;
            self.buffer[self.position..self.position + 4].copy_from_slice(&word.to_le_bytes());
            self.position += 4;
            self.scratch >>= 32;
            self.scratch_bits -= 32;
        }

        Ok(())
    }

    /// Writes a single bit.
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferOverflow`] if the buffer is full.
    #[inline]
    pub fn write_bool(&mut self, value: bool) -> CodecResult<()> {
        self.write(u32::from(value), 1)
    }

    /// Appends the low `bits` bits of a 64-bit value (`1 <= bits <= 64`).
    ///
    /// Widths above 32 are split into two writes, low half first.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write), with a 64-bit limit.
    pub fn write_u64(&mut self, value: u64, bits: u32) -> CodecResult<()> {
        check_bits(bits, 64)?;
        #[allow(clippy::cast_possible_truncation)]
        let (low, high) = (value as u32, (value >> 32) as u32);
        if bits <= MAX_WRITE_BITS {
            return self.write(low, bits);
        }
        self.ensure_room(bits as usize)?;
        self.write(low, 32)?;
        self.write(high, bits - 32)
    }

    /// Commits every pending bit, zero-padding the last byte.
    ///
    /// Calling it again without new writes does nothing.
    pub fn flush(&mut self) {
        let bytes = self.scratch_bits.div_ceil(8) as usize;
        let pending = self.scratch.to_le_bytes();
        self.buffer[self.position..self.position + bytes].copy_from_slice(&pending[..bytes]);
        self.position += bytes;
        self.scratch = 0;
        self.scratch_bits = 0;
    }

    /// Flushes and returns the committed bytes.
    pub fn to_segment(&mut self) -> &[u8] {
        self.flush();
        &self.buffer[..self.position]
    }

    /// Clears the writer for reuse.
    ///
    /// Previously committed bytes are zeroed so a shorter next message
    /// cannot carry stale data.
    pub fn reset(&mut self) {
        self.buffer[..self.position].fill(0);
        self.position = 0;
        self.scratch = 0;
        self.scratch_bits = 0;
    }

    /// Flushes and hands back the buffer, truncated to the committed length.
    #[must_use]
    pub fn into_inner(mut self) -> Vec<u8> {
        self.flush();
        self.buffer.truncate(self.position);
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_partial_then_flush() {
        let mut writer = BitWriter::with_capacity(8);

        writer.write(0b101, 3).unwrap();
        writer.write(0b1111, 4).unwrap();
        writer.write_bool(true).unwrap();

        // Nothing committed until flush
        assert_eq!(writer.len(), 0);
        assert_eq!(writer.bits_written(), 8);
        assert_eq!(writer.to_segment(), &[0b1111_1101]);
    }

    #[test]
    fn test_word_commit() {
        let mut writer = BitWriter::with_capacity(8);
        writer.write(0xDEAD_BEEF, 32).unwrap();
        assert_eq!(writer.len(), 4);
        assert_eq!(writer.to_segment(), &[0xEF, 0xBE, 0xAD, 0xDE]);
    }

    #[test]
    fn test_value_is_masked() {
        let mut writer = BitWriter::with_capacity(4);
        writer.write(0xFF, 4).unwrap();
        writer.write(0, 4).unwrap();
        assert_eq!(writer.to_segment(), &[0x0F]);
    }

    #[test]
    fn test_flush_byte_counts() {
        for (bits, expected) in [(1, 1), (8, 1), (9, 2), (16, 2), (17, 3), (24, 3), (25, 4), (31, 4)] {
            let mut writer = BitWriter::with_capacity(4);
            writer.write(u32::MAX, bits).unwrap();
            writer.flush();
            assert_eq!(writer.len(), expected, "{bits} bits");
        }
    }

    #[test]
    fn test_flush_is_idempotent() {
        let mut writer = BitWriter::with_capacity(4);
        writer.write(3, 2).unwrap();
        writer.flush();
        writer.flush();
        assert_eq!(writer.len(), 1);
    }

    #[test]
    fn test_invalid_bit_counts() {
        let mut writer = BitWriter::with_capacity(8);
        assert_eq!(
            writer.write(1, 0),
            Err(CodecError::InvalidBitCount { bits: 0, max: 32 })
        );
        assert!(writer.write(1, 33).unwrap_err().is_invalid_argument());
        assert!(writer.is_empty());
    }

    #[test]
    fn test_overflow_is_rejected_without_side_effects() {
        let mut writer = BitWriter::with_capacity(2);
        writer.write(0x1FF, 9).unwrap();
        assert_eq!(
            writer.write(0xFF, 8),
            Err(CodecError::BufferOverflow { capacity: 2 })
        );
        writer.write(0x7F, 7).unwrap();
        assert_eq!(writer.to_segment(), &[0xFF, 0xFF]);
    }

    #[test]
    fn test_bits_free_tracks_writes() {
        let mut writer = BitWriter::with_capacity(5);
        assert_eq!(writer.bits_free(), 40);
        writer.write(0, 31).unwrap();
        writer.write(0, 3).unwrap();
        assert_eq!(writer.bits_free(), 6);
        assert!(writer.ensure_room(6).is_ok());
        assert_eq!(
            writer.ensure_room(7),
            Err(CodecError::BufferOverflow { capacity: 5 })
        );
        writer.flush();
        assert_eq!(writer.bits_free(), 0);
    }

    #[test]
    fn test_reset_clears_stale_bytes() {
        let mut writer = BitWriter::with_capacity(8);
        writer.write(u32::MAX, 32).unwrap();
        writer.write(u32::MAX, 16).unwrap();
        writer.flush();
        assert_eq!(writer.len(), 6);

        writer.reset();
        assert!(writer.is_empty());
        writer.write(1, 1).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes, vec![1]);
    }

    #[test]
    fn test_reset_zeroes_buffer() {
        let mut writer = BitWriter::with_capacity(4);
        writer.write(0xABCD, 16).unwrap();
        writer.flush();
        writer.reset();
        writer.write(0, 32).unwrap();
        assert_eq!(writer.to_segment(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_write_u64_splits_low_first() {
        let mut writer = BitWriter::with_capacity(8);
        writer.write_u64(0x0000_0012_3456_789A, 40).unwrap();
        assert_eq!(writer.bits_written(), 40);
        assert_eq!(writer.to_segment(), &[0x9A, 0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_write_u64_overflow_checked_upfront() {
        let mut writer = BitWriter::with_capacity(5);
        writer.write(1, 8).unwrap();
        assert_eq!(
            writer.write_u64(u64::MAX, 40),
            Err(CodecError::BufferOverflow { capacity: 5 })
        );
        assert_eq!(writer.bits_written(), 8);
    }

    #[test]
    fn test_from_buffer_overwrites() {
        let mut writer = BitWriter::from_buffer(vec![0xAA; 3]);
        assert_eq!(writer.capacity(), 3);
        writer.write(0, 8).unwrap();
        assert_eq!(writer.to_segment(), &[0x00]);
    }
}
