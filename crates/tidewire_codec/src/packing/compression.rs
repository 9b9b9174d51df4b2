//! # Range Compression
//!
//! Stateless linear mapping between a float range and an unsigned-integer
//! range. The integer range width sets the precision:
//! `error <= (max_f - min_f) / (max_u - min_u)`.
//!
//! Out-of-range input saturates to the nearest bound on both sides.
//! Arithmetic runs in `f64` so full 32-bit integer ranges keep every step.

/// Maps `value` from `[min_f, max_f]` onto `[min_u, max_u]`, truncating.
///
/// Values above `max_f` return `max_u`; values below `min_f` (and NaN) return
/// `min_u`.
#[inline]
#[must_use]
pub fn scale_to_uint(value: f32, min_f: f32, max_f: f32, min_u: u32, max_u: u32) -> u32 {
    if value > max_f {
        return max_u;
    }
    if value < min_f || value.is_nan() {
        return min_u;
    }

    let fraction = (f64::from(value) - f64::from(min_f)) / (f64::from(max_f) - f64::from(min_f));
    let span = f64::from(max_u - min_u);
    // Truncation toward zero; fraction is within [0, 1] so the cast never saturates.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let offset = (fraction * span) as u32;
    min_u + offset.min(max_u - min_u)
}

/// Maps `value` from `[min_u, max_u]` back onto `[min_f, max_f]`.
///
/// Values above `max_u` return `max_f`; values below `min_u` return `min_f`.
#[inline]
#[must_use]
pub fn scale_from_uint(value: u32, min_u: u32, max_u: u32, min_f: f32, max_f: f32) -> f32 {
    if value > max_u {
        return max_f;
    }
    if value < min_u {
        return min_f;
    }

    let fraction = f64::from(value - min_u) / f64::from(max_u - min_u);
    #[allow(clippy::cast_possible_truncation)]
    let result = (f64::from(min_f) + fraction * (f64::from(max_f) - f64::from(min_f))) as f32;
    result
}
