//! Mathematical utility functions for the filter engine.
//!
//! Level conversions and small numeric helpers shared by the coefficient
//! designer and the runtime engines. All functions are allocation-free and
//! `no_std` compatible.
//!
//! The designer works in `f64` throughout (coefficient accuracy near the
//! band edges degrades visibly in `f32`), so the dB conversions exist in
//! both widths: `f32` for runtime parameters, `f64` for design math.

use libm::{exp, expf, log, logf};

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use resona_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// # Arguments
/// * `linear` - Linear gain value (must be > 0)
///
/// # Returns
/// Value in decibels
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Convert decibels to linear gain in double precision.
///
/// Used by the coefficient designer, which keeps all intermediate values
/// in `f64` until the final narrowing store.
#[inline]
pub fn db_to_linear_f64(db: f64) -> f64 {
    const FACTOR: f64 = core::f64::consts::LN_10 / 20.0;
    exp(db * FACTOR)
}

/// Convert linear gain to decibels in double precision.
#[inline]
pub fn linear_to_db_f64(linear: f64) -> f64 {
    const FACTOR: f64 = 20.0 / core::f64::consts::LN_10;
    log(linear.max(1e-300)) * FACTOR
}

/// Flush denormal numbers to zero.
///
/// Denormals cause severe CPU performance penalties on most architectures.
/// Recursive filter feedback paths decay into the denormal range when the
/// input goes silent, so every state update passes through this.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Linear interpolation between two values.
///
/// # Arguments
/// * `a` - Start value (t = 0)
/// * `b` - End value (t = 1)
/// * `t` - Interpolation factor
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
