//! Rounding and clamping conversions shared by the normalizer and the mapper.
//!
//! Float-to-integer casts in Rust saturate and map NaN to zero, which is exactly
//! the behavior wanted at pixel and millisecond boundaries. These helpers keep
//! the rounding rule (half away from zero) in one place.

/// Rounds to the nearest `u32`, saturating at the type bounds.
pub fn round_to_u32(value: f64) -> u32 {
    value.round() as u32
}

/// Rounds to the nearest `u64`, saturating at the type bounds.
pub fn round_to_u64(value: f64) -> u64 {
    value.round() as u64
}

/// Rounds to the nearest `i32`, saturating at the type bounds.
pub fn round_to_i32(value: f64) -> i32 {
    value.round() as i32
}

/// Clamps into `[0, 1]`. NaN collapses to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// True when `value` is finite and strictly positive.
pub fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
