//! Resona Core - filter primitives for parametric EQ engines
//!
//! This crate provides the single-section building blocks that the
//! multi-channel and multi-level engines in `resona-banks` are assembled
//! from, designed for real-time audio processing with zero allocation in
//! the audio path.
//!
//! # Core Abstractions
//!
//! ## Coefficient Design
//!
//! - [`design`] - Pure `f64` coefficient functions: lowpass, highpass,
//!   bandpass, notch, allpass, bell, shelves, bell-with-skirt, and a
//!   combined highpass+lowpass section
//! - [`BiquadCoeffs`] - Normalized designed coefficients with magnitude
//!   response evaluation
//!
//! ## Filter Kernels
//!
//! - [`Biquad`] - Second-order Direct Form I section
//! - [`SvfCoeffs`] / [`SvfState`] - Zavalishin TPT state-variable kernel,
//!   fed from the biquad designer through [`SvfCoeffs::from_biquad`]
//!
//! ## Utilities
//!
//! - [`Effect`] - Object-safe processing trait
//! - Math functions: [`db_to_linear`], [`linear_to_db`],
//!   [`flush_denormal`], [`lerp`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! resona-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Double-precision design, single-precision runtime**: coefficients
//!   are derived in `f64` and narrowed on store
//! - **Fail fast on contract violations**: invalid frequencies and Q
//!   values panic instead of being silently clamped

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod design;
pub mod effect;
pub mod math;
pub mod svf;

// Re-export main types at crate root
pub use biquad::Biquad;
pub use design::BiquadCoeffs;
pub use effect::Effect;
pub use math::{db_to_linear, db_to_linear_f64, flush_denormal, lerp, linear_to_db, linear_to_db_f64};
pub use svf::{SvfCoeffs, SvfState};
