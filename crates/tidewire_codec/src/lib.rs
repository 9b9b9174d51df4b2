//! # TIDEWIRE Codec
//!
//! Bit-level packing of transforms and scalars for real-time state
//! synchronization over lossy, bandwidth-starved links.
//!
//! ## Architecture
//!
//! - **Bit stream**: [`BitWriter`] / [`BitReader`] move integers of 1–32 bits
//!   through a 64-bit scratch register
//! - **Compression**: stateless float ↔ integer range mapping
//! - **Packers**: [`FloatPacker`], [`PositionPacker`], [`QuaternionPacker`],
//!   [`UIntVariablePacker`], [`TransformPacker`]
//! - **Schema**: [`SyncSchema`] loads packer settings from TOML
//! - **Pool**: [`WriterPool`] recycles pre-sized writers
//!
//! ## Data Flow
//!
//! ```text
//! SENDER                                 RECEIVER
//!   |  pack(a) pack(b) pack(c)              |
//!   |  to_segment() ── bytes ──────────────>|  BitReader::new(bytes)
//!   |                                       |  unpack(a) unpack(b) unpack(c)
//! ```
//!
//! The stream carries no type or configuration metadata. Both ends must
//! build identical packers and call them in identical order.
//!
//! ## Example
//!
//! ```rust
//! use tidewire_codec::{BitReader, BitWriter, PositionPacker, QuaternionPacker};
//! use tidewire_shared::{Quaternion, Vec3};
//!
//! let position = PositionPacker::uniform(Vec3::splat(-100.0), Vec3::splat(100.0), 0.01)?;
//! let rotation = QuaternionPacker::new(10)?;
//!
//! let mut writer = BitWriter::with_capacity(64);
//! position.pack(&mut writer, Vec3::new(1.0, 2.0, 3.0))?;
//! rotation.pack(&mut writer, Quaternion::IDENTITY)?;
//! let bytes = writer.to_segment();
//!
//! let mut reader = BitReader::new(bytes);
//! let p = position.unpack(&mut reader)?;
//! let q = rotation.unpack(&mut reader)?;
//! assert!(p.distance(Vec3::new(1.0, 2.0, 3.0)) < 0.02);
//! assert!(q.angle_to(Quaternion::IDENTITY) < 0.01);
//! # Ok::<(), tidewire_codec::CodecError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bitstream;
pub mod error;
pub mod packing;
pub mod pool;
pub mod schema;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use error::{CodecError, CodecResult};
pub use packing::{
    FloatPacker, PositionPacker, QuaternionPacker, TransformPacker, UIntVariablePacker,
};
pub use pool::{PooledWriter, WriterPool};
pub use schema::{
    AxisPrecision, FloatPackerConfig, PositionPackerConfig, QuaternionPackerConfig,
    SyncPackers, SyncSchema, TransformConfig, UIntVariablePackerConfig,
};
