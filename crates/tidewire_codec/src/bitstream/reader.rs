//! Bit reader over a borrowed byte range.

use tidewire_shared::MAX_WRITE_BITS;

use super::low_mask;
use crate::error::{check_bits, CodecError, CodecResult};

/// Extracts arbitrary-width integers from a byte range written by
/// [`BitWriter`](super::BitWriter).
///
/// The reader pulls 4-byte little-endian words into a 64-bit scratch
/// register; the last `len % 4` bytes are pulled in one go once the whole
/// words run out.
///
/// Callers are expected to know exactly how many bits were written (both ends
/// share the packer configuration). [`bits_in_scratch`](Self::bits_in_scratch)
/// and [`position`](Self::position) exist to assert exact consumption.
#[derive(Debug)]
pub struct BitReader<'a> {
    /// The bytes being read.
    data: &'a [u8],
    /// Bytes pulled into scratch so far.
    position: usize,
    /// Whole 4-byte words not yet pulled.
    words_remaining: usize,
    /// Tail bytes (0..=3) not yet pulled.
    tail_bytes: usize,
    /// Pulled but unconsumed bits, low bits first.
    scratch: u64,
    /// Number of valid bits in `scratch`.
    scratch_bits: u32,
}

impl<'a> BitReader<'a> {
    /// Creates a reader over the whole buffer.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            words_remaining: data.len() / 4,
            tail_bytes: data.len() % 4,
            scratch: 0,
            scratch_bits: 0,
        }
    }

    /// Creates a reader over `count` bytes of `buffer` starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidSegment`] if the range does not lie inside `buffer`.
    pub fn with_range(buffer: &'a [u8], offset: usize, count: usize) -> CodecResult<Self> {
        let invalid = || CodecError::InvalidSegment {
            offset,
            count,
            len: buffer.len(),
        };
        let end = offset.checked_add(count).ok_or_else(invalid)?;
        let data = buffer.get(offset..end).ok_or_else(invalid)?;
        Ok(Self::new(data))
    }

    /// Bytes pulled from the buffer so far.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Bits pulled from the buffer but not yet returned.
    #[inline]
    #[must_use]
    pub const fn bits_in_scratch(&self) -> u32 {
        self.scratch_bits
    }

    /// Bits left to read, counting scratch and unread bytes.
    #[inline]
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        (self.data.len() - self.position) * 8 + self.scratch_bits as usize
    }

    /// Reads `bits` bits (`1 <= bits <= 32`).
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidBitCount`] unless `1 <= bits <= 32`
    /// - [`CodecError::BufferExhausted`] if the buffer runs out first
    #[inline]
    pub fn read(&mut self, bits: u32) -> CodecResult<u32> {
        check_bits(bits, MAX_WRITE_BITS)?;
        while self.scratch_bits < bits {
            self.refill(bits)?;
        }

        #[allow(clippy::cast_possible_truncation)]
        let value = (self.scratch & low_mask(bits)) as u32;
        self.scratch >>= bits;
        self.scratch_bits -= bits;
        Ok(value)
    }

    /// Reads a single bit.
    ///
    /// # Errors
    ///
    /// [`CodecError::BufferExhausted`] if the buffer is empty.
    #[inline]
    pub fn read_bool(&mut self) -> CodecResult<bool> {
        Ok(self.read(1)? == 1)
    }

    /// Reads `bits` bits (`1 <= bits <= 64`) written by
    /// [`BitWriter::write_u64`](super::BitWriter::write_u64).
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read), with a 64-bit limit.
    pub fn read_u64(&mut self, bits: u32) -> CodecResult<u64> {
        check_bits(bits, 64)?;
        if bits <= MAX_WRITE_BITS {
            return self.read(bits).map(u64::from);
        }
        if self.bits_remaining() < bits as usize {
            return Err(CodecError::BufferExhausted {
                requested: bits,
                available: self.bits_remaining(),
            });
        }
        let low = u64::from(self.read(32)?);
        let high = u64::from(self.read(bits - 32)?);
        Ok(low | (high << 32))
    }

    /// Pulls the next word, or the tail, into scratch.
    fn refill(&mut self, requested: u32) -> CodecResult<()> {
        let chunk = if self.words_remaining > 0 {
            self.words_remaining -= 1;
            4
        } else if self.tail_bytes > 0 {
            std::mem::replace(&mut self.tail_bytes, 0)
        } else {
            return Err(CodecError::BufferExhausted {
                requested,
                available: self.scratch_bits as usize,
            });
        };

        let mut word = [0u8; 4];
        word[..chunk].copy_from_slice(&self.data[self.position..self.position + chunk]);
        self.position += chunk;

        // scratch_bits < requested <= 32 here, so the shifted word fits.
        self.scratch |= u64::from(u32::from_le_bytes(word)) << self.scratch_bits;
        #[allow(clippy::cast_possible_truncation)]
        let added = (chunk * 8) as u32;
        self.scratch_bits += added;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::BitWriter;

    #[test]
    fn test_read_word_and_tail() {
        let bytes = [0xEF, 0xBE, 0xAD, 0xDE, 0x34, 0x12];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read(32).unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.read(16).unwrap(), 0x1234);
        assert_eq!(reader.position(), 6);
        assert_eq!(reader.bits_in_scratch(), 0);
    }

    #[test]
    fn test_read_across_word_boundary() {
        let mut writer = BitWriter::with_capacity(16);
        writer.write(0x1F, 5).unwrap();
        writer.write(0xABCD_EF01, 32).unwrap();
        writer.write(0x2, 3).unwrap();
        let bytes = writer.to_segment().to_vec();

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read(5).unwrap(), 0x1F);
        assert_eq!(reader.read(32).unwrap(), 0xABCD_EF01);
        assert_eq!(reader.read(3).unwrap(), 0x2);
    }

    #[test]
    fn test_exhausted() {
        let bytes = [0xFF, 0x01];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read(12).unwrap(), 0x1FF);
        assert_eq!(
            reader.read(8),
            Err(CodecError::BufferExhausted { requested: 8, available: 4 })
        );
    }

    #[test]
    fn test_empty_buffer() {
        let mut reader = BitReader::new(&[]);
        assert!(matches!(reader.read(1), Err(CodecError::BufferExhausted { .. })));
    }

    #[test]
    fn test_invalid_bit_counts() {
        let bytes = [0u8; 8];
        let mut reader = BitReader::new(&bytes);
        assert!(reader.read(0).unwrap_err().is_invalid_argument());
        assert!(reader.read(33).unwrap_err().is_invalid_argument());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_with_range() {
        let bytes = [0xAA, 0x05, 0x06, 0xBB];
        let mut reader = BitReader::with_range(&bytes, 1, 2).unwrap();
        assert_eq!(reader.read(8).unwrap(), 0x05);
        assert_eq!(reader.read(8).unwrap(), 0x06);
        assert!(reader.read(1).is_err());

        assert_eq!(
            BitReader::with_range(&bytes, 3, 2).unwrap_err(),
            CodecError::InvalidSegment { offset: 3, count: 2, len: 4 }
        );
        assert!(BitReader::with_range(&bytes, usize::MAX, 2).is_err());
    }

    #[test]
    fn test_read_u64() {
        let mut writer = BitWriter::with_capacity(16);
        writer.write_bool(true).unwrap();
        writer.write_u64(0x3_FFFF_FFFF_FFFF, 50).unwrap();
        let bytes = writer.to_segment().to_vec();

        let mut reader = BitReader::new(&bytes);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_u64(50).unwrap(), 0x3_FFFF_FFFF_FFFF);
        assert!(matches!(reader.read_u64(40), Err(CodecError::BufferExhausted { .. })));
    }

    #[test]
    fn test_bits_remaining() {
        let bytes = [0u8; 5];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.bits_remaining(), 40);
        reader.read(7).unwrap();
        assert_eq!(reader.bits_remaining(), 33);
    }
}
