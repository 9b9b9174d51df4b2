//! # Bit Stream I/O
//!
//! Byte-buffer-backed accumulation and extraction of integers of any width
//! up to 32 bits.
//!
//! ## Layout
//!
//! ```text
//! write(0b101, 3) then write(0x3FF, 10):
//!
//! scratch (u64):  ... 0000 1111111111 101
//!                          └─ 10 ─┘└3┘
//! bytes out:      [0xFD, 0x1F]   (little-endian, low bits first)
//! ```
//!
//! Both sides batch through a 64-bit scratch register and touch the buffer
//! in 4-byte words, falling back to single bytes only for the tail.

mod reader;
mod writer;

pub use reader::BitReader;
pub use writer::BitWriter;

/// Mask selecting the low `bits` bits of a 64-bit scratch value.
#[inline]
pub(crate) const fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
