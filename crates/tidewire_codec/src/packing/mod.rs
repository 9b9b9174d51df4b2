//! # Value Packers
//!
//! Typed packers built on the bit stream.
//!
//! ## Techniques
//!
//! 1. **Quantization**: floats mapped onto the smallest integer range that
//!    meets a precision ([`compression`], [`FloatPacker`])
//! 2. **Composition**: positions as three independent axes ([`PositionPacker`])
//! 3. **Redundancy removal**: unit quaternions as their smallest three
//!    components ([`QuaternionPacker`])
//! 4. **Tiering**: small integers pay for small widths ([`UIntVariablePacker`])
//!
//! Packers hold configuration only. The stream is passed per call, so one
//! packer serves any number of messages and threads.

pub mod compression;
mod float;
mod position;
mod quaternion;
mod transform;
mod varint;

pub use float::FloatPacker;
pub use position::PositionPacker;
pub use quaternion::{QuaternionPacker, DEGENERATE_EPSILON, NORMALIZE_EPSILON};
pub use transform::TransformPacker;
pub use varint::UIntVariablePacker;
