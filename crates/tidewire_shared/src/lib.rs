//! # TIDEWIRE Shared
//!
//! Value types used by both ends of a synchronization link.
//!
//! ## CRITICAL RULE
//!
//! This crate holds plain data only. Anything that decides how many bits a
//! value costs belongs in `tidewire_codec`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    DEFAULT_QUATERNION_BITS, MAX_PACKET_SIZE, MAX_WRITE_BITS, SCRATCH_BITS,
};
pub use math::{Quaternion, Transform, Vec3};
