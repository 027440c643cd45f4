//! Sweepable multi-level state-variable filter engine.
//!
//! [`MultiLevelSvf`] is the modulation-friendly counterpart of
//! [`MultiLevelBiquad`](crate::MultiLevelBiquad): the same per-level designer
//! vocabulary, but running on the TPT SVF kernel so coefficients can move
//! while audio flows. Setters write new designs into a target table and
//! raise a pending flag; the processing call consumes the flag at the next
//! buffer boundary and either snaps to the targets or, with sweeping
//! enabled, ramps every coefficient linearly across the buffer.
//!
//! During a sweep buffer of `n` samples, sample 0 is filtered with the
//! previous coefficients and each later sample with one more interpolation
//! step, so sample `n − 1` sits exactly one step short of the target. The
//! target is committed verbatim once the buffer ends, so the next buffer
//! starts exactly on it and no rounding drift accumulates.
//!
//! The flag uses release/acquire ordering so a control thread that filled
//! the target table before the store never races the audio thread's read,
//! matching the one-writer one-reader handoff this engine is built for.

use core::sync::atomic::{AtomicBool, Ordering};

use resona_core::{SvfCoeffs, SvfState};

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::params::FilterParams;

/// Largest buffer a sweeping process call accepts.
///
/// Linear per-sample interpolation stays artifact-free only over short
/// spans; hosts with larger buffers split them before calling.
pub const MAX_SWEEP_BLOCK: usize = 512;

/// A serial cascade of SVF levels with buffer-synchronous coefficient
/// updates and optional per-sample sweeping.
#[derive(Debug)]
pub struct MultiLevelSvf {
    current: Vec<SvfCoeffs>,
    target: Vec<SvfCoeffs>,
    // Scratch for per-sample increments, sized once at construction.
    step: Vec<SvfCoeffs>,
    params: Vec<FilterParams>,
    // Level-major: level l owns states l·channels .. l·channels + channels.
    state: Vec<SvfState>,
    pending: AtomicBool,
    sweep: bool,
    channels: usize,
    sample_rate: f64,
}

impl MultiLevelSvf {
    /// Create an engine of `num_levels` bypass levels with sweeping off.
    ///
    /// # Panics
    ///
    /// Panics if `num_levels` is zero or `sample_rate` is not positive.
    #[must_use]
    pub fn new(num_levels: usize, sample_rate: f64, stereo: bool) -> Self {
        assert!(num_levels > 0, "engine needs at least one level");
        assert!(sample_rate > 0.0, "sample rate must be positive");
        let channels = if stereo { 2 } else { 1 };
        Self {
            current: vec![SvfCoeffs::bypass(); num_levels],
            target: vec![SvfCoeffs::bypass(); num_levels],
            step: vec![SvfCoeffs::bypass(); num_levels],
            params: vec![FilterParams::Bypass; num_levels],
            state: vec![SvfState::new(); num_levels * channels],
            pending: AtomicBool::new(false),
            sweep: false,
            channels,
            sample_rate,
        }
    }

    /// Number of serial levels.
    #[must_use]
    pub fn num_levels(&self) -> usize {
        self.current.len()
    }

    /// True when the engine processes two channels.
    #[must_use]
    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// Turn per-sample coefficient sweeping on or off.
    ///
    /// Off (the default), pending designs snap into place at the next
    /// buffer boundary. On, they ramp across that buffer instead.
    pub fn enable_sweep(&mut self, enabled: bool) {
        self.sweep = enabled;
        #[cfg(feature = "tracing")]
        tracing::debug!(enabled, "svf sweep mode changed");
    }

    /// Redesign every configured level at a new sample rate.
    ///
    /// Takes effect like any other setter, at the next buffer boundary.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` is not positive.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        assert!(sample_rate > 0.0, "sample rate must be positive");
        self.sample_rate = sample_rate;
        for level in 0..self.num_levels() {
            self.target[level] = SvfCoeffs::from_biquad(&self.params[level].design(sample_rate));
        }
        self.pending.store(true, Ordering::Release);
    }

    fn apply(&mut self, level: usize, params: FilterParams) {
        assert!(level < self.num_levels(), "level out of range");
        self.target[level] = SvfCoeffs::from_biquad(&params.design(self.sample_rate));
        self.params[level] = params;
        // Release pairs with the Acquire swap in the process path: the
        // target write above is visible before the flag is observed.
        self.pending.store(true, Ordering::Release);
        #[cfg(feature = "tracing")]
        tracing::debug!(level, ?params, sweep = self.sweep, "svf level retargeted");
    }

    /// Make a level an identity pass-through.
    pub fn set_bypass(&mut self, level: usize) {
        self.apply(level, FilterParams::Bypass);
    }

    /// Configure a level as a second-order lowpass.
    pub fn set_lowpass(&mut self, level: usize, frequency: f32, q: f32) {
        self.apply(level, FilterParams::Lowpass { frequency, q });
    }

    /// Configure a level as a second-order highpass.
    pub fn set_highpass(&mut self, level: usize, frequency: f32, q: f32) {
        self.apply(level, FilterParams::Highpass { frequency, q });
    }

    /// Configure a level as a constant-peak bandpass.
    pub fn set_bandpass(&mut self, level: usize, frequency: f32, q: f32) {
        self.apply(level, FilterParams::Bandpass { frequency, q });
    }

    /// Configure a level as a notch.
    pub fn set_notch(&mut self, level: usize, frequency: f32, q: f32) {
        self.apply(level, FilterParams::Notch { frequency, q });
    }

    /// Configure a level as an allpass.
    pub fn set_allpass(&mut self, level: usize, frequency: f32, q: f32) {
        self.apply(level, FilterParams::Allpass { frequency, q });
    }

    /// Configure a level as a peaking bell.
    pub fn set_bell(&mut self, level: usize, frequency: f32, q: f32, gain_db: f32) {
        self.apply(level, FilterParams::Bell { frequency, q, gain_db });
    }

    /// Configure a level as a low shelf.
    pub fn set_low_shelf(&mut self, level: usize, frequency: f32, gain_db: f32) {
        self.apply(level, FilterParams::LowShelf { frequency, gain_db });
    }

    /// Configure a level as a high shelf.
    pub fn set_high_shelf(&mut self, level: usize, frequency: f32, gain_db: f32) {
        self.apply(level, FilterParams::HighShelf { frequency, gain_db });
    }

    /// Configure a level as a bell riding on a skirt gain.
    pub fn set_bell_with_skirt(
        &mut self,
        level: usize,
        frequency: f32,
        q: f32,
        peak_db: f32,
        skirt_db: f32,
    ) {
        self.apply(
            level,
            FilterParams::BellWithSkirt {
                frequency,
                q,
                peak_db,
                skirt_db,
            },
        );
    }

    /// Configure a level as a combined first-order highpass and lowpass.
    pub fn set_highpass_lowpass(&mut self, level: usize, highpass_freq: f32, lowpass_freq: f32) {
        self.apply(
            level,
            FilterParams::HighpassLowpass {
                highpass_freq,
                lowpass_freq,
            },
        );
    }

    /// Filter a mono buffer through all levels, applying any pending
    /// designs at the start of the buffer.
    ///
    /// # Panics
    ///
    /// Panics on a stereo engine, when buffer lengths differ, or when a
    /// sweep is pending and the buffer exceeds [`MAX_SWEEP_BLOCK`].
    pub fn process_buffer_mono(&mut self, input: &[f32], output: &mut [f32]) {
        assert!(self.channels == 1, "mono call on a stereo engine");
        assert!(input.len() == output.len(), "buffer lengths must match");
        if input.is_empty() {
            return;
        }

        if self.begin_buffer(input.len()) {
            for (x, y) in input.iter().zip(output.iter_mut()) {
                let mut sample = *x;
                for level in 0..self.num_levels() {
                    sample = self.state[level].tick(&self.current[level], sample);
                    self.current[level].advance(&self.step[level]);
                }
                *y = sample;
            }
            self.current.copy_from_slice(&self.target);
        } else {
            for (x, y) in input.iter().zip(output.iter_mut()) {
                let mut sample = *x;
                for level in 0..self.num_levels() {
                    sample = self.state[level].tick(&self.current[level], sample);
                }
                *y = sample;
            }
        }
    }

    /// Filter a stereo buffer pair through all levels, applying any pending
    /// designs at the start of the buffer. Both channels share
    /// coefficients; state is independent.
    ///
    /// # Panics
    ///
    /// Panics on a mono engine, when buffer lengths differ, or when a sweep
    /// is pending and the buffer exceeds [`MAX_SWEEP_BLOCK`].
    pub fn process_buffer_stereo(
        &mut self,
        input_left: &[f32],
        input_right: &[f32],
        output_left: &mut [f32],
        output_right: &mut [f32],
    ) {
        assert!(self.channels == 2, "stereo call on a mono engine");
        assert!(
            input_left.len() == output_left.len()
                && input_right.len() == output_right.len()
                && input_left.len() == input_right.len(),
            "buffer lengths must match"
        );
        if input_left.is_empty() {
            return;
        }

        if self.begin_buffer(input_left.len()) {
            for i in 0..input_left.len() {
                let mut left = input_left[i];
                let mut right = input_right[i];
                for level in 0..self.num_levels() {
                    left = self.state[level * 2].tick(&self.current[level], left);
                    right = self.state[level * 2 + 1].tick(&self.current[level], right);
                    self.current[level].advance(&self.step[level]);
                }
                output_left[i] = left;
                output_right[i] = right;
            }
            self.current.copy_from_slice(&self.target);
        } else {
            for i in 0..input_left.len() {
                let mut left = input_left[i];
                let mut right = input_right[i];
                for level in 0..self.num_levels() {
                    left = self.state[level * 2].tick(&self.current[level], left);
                    right = self.state[level * 2 + 1].tick(&self.current[level], right);
                }
                output_left[i] = left;
                output_right[i] = right;
            }
        }
    }

    /// Consume the pending flag for a buffer of `len` samples.
    ///
    /// Returns true when this buffer must sweep; in that case `self.step`
    /// holds the per-sample increments. Snap commits happen here directly.
    fn begin_buffer(&mut self, len: usize) -> bool {
        if !self.pending.swap(false, Ordering::Acquire) {
            return false;
        }
        if !self.sweep {
            self.current.copy_from_slice(&self.target);
            return false;
        }
        assert!(
            len <= MAX_SWEEP_BLOCK,
            "sweep buffer of {len} samples exceeds MAX_SWEEP_BLOCK ({MAX_SWEEP_BLOCK})"
        );
        for level in 0..self.num_levels() {
            self.step[level] = self.current[level].step_toward(&self.target[level], len);
        }
        true
    }

    /// Zero all integrator state, keeping coefficients and pending designs.
    pub fn clear(&mut self) {
        for state in &mut self.state {
            state.clear();
        }
    }
}

impl Clone for MultiLevelSvf {
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
            target: self.target.clone(),
            step: self.step.clone(),
            params: self.params.clone(),
            state: self.state.clone(),
            pending: AtomicBool::new(self.pending.load(Ordering::Acquire)),
            sweep: self.sweep,
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_core::{SvfCoeffs, design};

    const SR: f64 = 48000.0;

    fn impulse(len: usize) -> Vec<f32> {
        let mut v = vec![0.0; len];
        v[0] = 1.0;
        v
    }

    #[test]
    fn test_new_engine_is_identity() {
        let mut engine = MultiLevelSvf::new(3, SR, false);
        let input: Vec<f32> = (0..64).map(|i| libm::sinf(i as f32 * 0.2)).collect();
        let mut output = vec![0.0; 64];
        engine.process_buffer_mono(&input, &mut output);
        assert_eq!(input, output);
    }

    #[test]
    fn test_snap_commit_matches_direct_svf() {
        let mut engine = MultiLevelSvf::new(1, SR, false);
        engine.set_lowpass(0, 1000.0, 0.707);

        let coeffs = SvfCoeffs::from_biquad(&design::lowpass(1000.0, 0.707, SR));
        let mut state = resona_core::SvfState::new();

        let input = impulse(256);
        let mut output = vec![0.0; 256];
        engine.process_buffer_mono(&input, &mut output);

        for (i, (&x, &y)) in input.iter().zip(output.iter()).enumerate() {
            let expected = state.tick(&coeffs, x);
            assert!((y - expected).abs() < 1e-6, "sample {i}: {y} vs {expected}");
        }
    }

    #[test]
    fn test_update_waits_for_buffer_boundary() {
        let mut engine = MultiLevelSvf::new(1, SR, false);
        let input = [0.5f32; 16];
        let mut output = [0.0f32; 16];
        engine.process_buffer_mono(&input, &mut output);
        assert_eq!(output, input);

        // The setter must not disturb anything until the next buffer
        engine.set_highpass(0, 10000.0, 0.707);
        assert_eq!(engine.current[0], SvfCoeffs::bypass());

        engine.process_buffer_mono(&input, &mut output);
        assert_eq!(engine.current[0], engine.target[0]);
        assert!(output != input);
    }

    #[test]
    fn test_sweep_lands_one_step_short_then_commits() {
        let mut engine = MultiLevelSvf::new(1, SR, false);
        engine.enable_sweep(true);
        engine.set_lowpass(0, 2000.0, 1.0);

        let n = 64;
        let target = SvfCoeffs::from_biquad(&design::lowpass(2000.0, 1.0, SR));
        let step_a1 = (target.a1 - SvfCoeffs::bypass().a1) / n as f32;

        let input = vec![0.0f32; n];
        let mut output = vec![0.0f32; n];
        engine.process_buffer_mono(&input, &mut output);

        // After the sweep buffer the engine sits exactly on the target
        assert_eq!(engine.current[0], engine.target[0]);
        assert!((engine.target[0].a1 - target.a1).abs() < 1e-7);
        // and the per-sample step was (target − start)/n
        assert!((engine.step[0].a1 - step_a1).abs() < 1e-7);
    }

    #[test]
    fn test_sweep_starts_from_previous_coefficients() {
        // Sample 0 of a sweep buffer must still use the old coefficients,
        // so a bypass-to-filter sweep passes the first sample unchanged.
        let mut engine = MultiLevelSvf::new(1, SR, false);
        engine.enable_sweep(true);
        engine.set_lowpass(0, 500.0, 0.707);

        let input = impulse(32);
        let mut output = vec![0.0; 32];
        engine.process_buffer_mono(&input, &mut output);
        assert_eq!(output[0], 1.0);
    }

    #[test]
    fn test_sweep_output_stays_bounded() {
        let mut engine = MultiLevelSvf::new(2, SR, false);
        engine.set_bell(0, 1000.0, 2.0, 9.0);
        engine.set_highpass(1, 60.0, 0.707);
        engine.enable_sweep(true);

        let input: Vec<f32> = (0..256).map(|i| libm::sinf(i as f32 * 0.13)).collect();
        let mut output = vec![0.0; 256];
        engine.process_buffer_mono(&input, &mut output);

        // Retune mid-stream and sweep there
        engine.set_bell(0, 4000.0, 0.5, -9.0);
        engine.set_highpass(1, 200.0, 2.0);
        engine.process_buffer_mono(&input, &mut output);
        for (i, &y) in output.iter().enumerate() {
            assert!(y.is_finite() && y.abs() < 10.0, "sample {i} blew up: {y}");
        }
    }

    #[test]
    fn test_stereo_state_is_independent() {
        let mut engine = MultiLevelSvf::new(1, SR, true);
        engine.set_lowpass(0, 1000.0, 0.707);

        let in_l = impulse(8);
        let in_r = vec![0.0f32; 8];
        let mut out_l = vec![0.0; 8];
        let mut out_r = vec![0.0; 8];
        engine.process_buffer_stereo(&in_l, &in_r, &mut out_l, &mut out_r);
        assert!(out_l.iter().any(|&y| y != 0.0));
        assert!(out_r.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_empty_buffer_preserves_pending_update() {
        let mut engine = MultiLevelSvf::new(1, SR, false);
        engine.set_lowpass(0, 1000.0, 0.707);

        engine.process_buffer_mono(&[], &mut []);
        assert!(engine.pending.load(Ordering::Acquire));

        let input = [0.0f32; 4];
        let mut output = [0.0f32; 4];
        engine.process_buffer_mono(&input, &mut output);
        assert_eq!(engine.current[0], engine.target[0]);
    }

    #[test]
    fn test_sample_rate_change_redesigns() {
        let mut engine = MultiLevelSvf::new(1, 44100.0, false);
        engine.set_lowpass(0, 1000.0, 0.707);
        let before = engine.target[0];

        engine.set_sample_rate(96000.0);
        let after = engine.target[0];
        assert!(before != after);
        let expected = SvfCoeffs::from_biquad(&design::lowpass(1000.0, 0.707, 96000.0));
        assert_eq!(after, expected);
    }

    #[test]
    #[should_panic(expected = "exceeds MAX_SWEEP_BLOCK")]
    fn test_oversized_sweep_buffer_panics() {
        let mut engine = MultiLevelSvf::new(1, SR, false);
        engine.enable_sweep(true);
        engine.set_lowpass(0, 1000.0, 0.707);

        let input = vec![0.0f32; MAX_SWEEP_BLOCK + 1];
        let mut output = vec![0.0f32; MAX_SWEEP_BLOCK + 1];
        engine.process_buffer_mono(&input, &mut output);
    }

    #[test]
    fn test_large_buffer_fine_without_pending_sweep() {
        let mut engine = MultiLevelSvf::new(1, SR, false);
        engine.enable_sweep(true);
        engine.set_lowpass(0, 1000.0, 0.707);

        // Commit over a small buffer first
        let small = [0.0f32; 32];
        let mut out_small = [0.0f32; 32];
        engine.process_buffer_mono(&small, &mut out_small);

        // With nothing pending, the block limit does not apply
        let input = vec![0.0f32; 4096];
        let mut output = vec![0.0f32; 4096];
        engine.process_buffer_mono(&input, &mut output);
    }
}
