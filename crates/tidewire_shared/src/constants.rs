//! # Wire Constants
//!
//! **CRITICAL:** Both ends of a link are built against these values.
//! Changing one silently breaks compatibility with deployed peers.

/// Maximum packet size (MTU-safe).
///
/// Default capacity of pooled writers.
pub const MAX_PACKET_SIZE: usize = 1200;

/// Widest single write or read accepted by the bit stream.
pub const MAX_WRITE_BITS: u32 = 32;

/// Width of the scratch register, and the bit budget of one composite record.
pub const SCRATCH_BITS: u32 = 64;

/// Per-component width that keeps rotation error well under a tenth of a degree.
pub const DEFAULT_QUATERNION_BITS: u32 = 10;
