//! Resona Banks - multi-channel and multi-level filter engines
//!
//! This crate assembles the single-section primitives from `resona-core`
//! into the structures real-time audio engines actually deploy:
//!
//! - [`BiquadArray`] - one independent biquad per channel, processed a
//!   frame at a time, with FDN decay-shaping shelf helpers
//! - [`MultiLevelBiquad`] - a serial cascade of designed sections, mono or
//!   stereo, with composite magnitude-response introspection
//! - [`MultiLevelSvf`] - the same cascade on the TPT SVF kernel, with
//!   buffer-synchronous coefficient updates and optional per-sample
//!   sweeping for artifact-free modulation
//! - [`FilterParams`] - the per-level design vocabulary shared by both
//!   cascade engines
//!
//! All processing paths are allocation-free; the engines allocate only at
//! construction.
//!
//! # Example
//!
//! ```rust
//! use resona_banks::MultiLevelBiquad;
//!
//! let mut eq = MultiLevelBiquad::new(3, 48000.0, false);
//! eq.set_highpass(0, 80.0, 0.707);
//! eq.set_bell(1, 2500.0, 1.4, -4.5);
//! eq.set_high_shelf(2, 9000.0, 3.0);
//!
//! let input = [0.0f32; 128];
//! let mut output = [0.0f32; 128];
//! eq.process_buffer_mono(&input, &mut output);
//! ```
//!
//! # no_std Support
//!
//! Like `resona-core`, this crate is `no_std` compatible (it uses `alloc`
//! for construction-time buffers). Disable the default `std` feature for
//! embedded targets.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod array;
pub mod cascade;
pub mod params;
pub mod svf;

pub use array::BiquadArray;
pub use cascade::MultiLevelBiquad;
pub use params::FilterParams;
pub use svf::{MAX_SWEEP_BLOCK, MultiLevelSvf};
