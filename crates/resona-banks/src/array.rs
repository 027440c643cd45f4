//! Vectorized biquad array for multi-channel frames.
//!
//! [`BiquadArray`] runs one independent second-order section per channel
//! over interleaved-by-frame audio: each call filters one sample from every
//! channel. Coefficients and state live in parallel per-slot vectors so the
//! per-frame loop is a straight pass over contiguous lanes, which the
//! compiler vectorizes across channels.
//!
//! Besides uniform designs shared by all channels, the array can derive
//! per-channel shelf gains from feedback-delay-network decay times, the
//! common use for filter banks inside reverb tanks.

use resona_core::{BiquadCoeffs, design, flush_denormal};

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// A bank of independent biquad sections, one per channel.
///
/// Storage is structure-of-arrays: one `Vec<f32>` per coefficient and per
/// state slot, indexed by channel. All processing is allocation-free.
#[derive(Debug, Clone)]
pub struct BiquadArray {
    // Coefficient lanes, one entry per channel.
    b0: Vec<f32>,
    b1: Vec<f32>,
    b2: Vec<f32>,
    a1: Vec<f32>,
    a2: Vec<f32>,
    // State lanes.
    x1: Vec<f32>,
    x2: Vec<f32>,
    y1: Vec<f32>,
    y2: Vec<f32>,
    sample_rate: f64,
}

impl BiquadArray {
    /// Create a bank of `num_channels` bypass sections.
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` is zero or `sample_rate` is not positive.
    #[must_use]
    pub fn new(num_channels: usize, sample_rate: f64) -> Self {
        assert!(num_channels > 0, "biquad array needs at least one channel");
        assert!(sample_rate > 0.0, "sample rate must be positive");
        let mut bank = Self {
            b0: vec![0.0; num_channels],
            b1: vec![0.0; num_channels],
            b2: vec![0.0; num_channels],
            a1: vec![0.0; num_channels],
            a2: vec![0.0; num_channels],
            x1: vec![0.0; num_channels],
            x2: vec![0.0; num_channels],
            y1: vec![0.0; num_channels],
            y2: vec![0.0; num_channels],
            sample_rate,
        };
        bank.set_design_all(&BiquadCoeffs::bypass());
        bank
    }

    /// Number of channels in the bank.
    #[must_use]
    pub fn num_channels(&self) -> usize {
        self.b0.len()
    }

    /// Sample rate the bank designs against.
    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Apply one design to every channel. Does not touch filter state.
    pub fn set_design_all(&mut self, coeffs: &BiquadCoeffs) {
        for ch in 0..self.num_channels() {
            self.set_design(ch, coeffs);
        }
    }

    /// Apply a design to a single channel. Does not touch filter state.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn set_design(&mut self, channel: usize, coeffs: &BiquadCoeffs) {
        assert!(channel < self.num_channels(), "channel out of range");
        self.b0[channel] = coeffs.b0 as f32;
        self.b1[channel] = coeffs.b1 as f32;
        self.b2[channel] = coeffs.b2 as f32;
        self.a1[channel] = coeffs.a1 as f32;
        self.a2[channel] = coeffs.a2 as f32;
    }

    /// Configure every channel as the same low shelf.
    pub fn set_low_shelf(&mut self, frequency: f64, gain_db: f64) {
        let coeffs = design::low_shelf(frequency, gain_db, self.sample_rate);
        self.set_design_all(&coeffs);
    }

    /// Configure every channel as the same high shelf.
    pub fn set_high_shelf(&mut self, frequency: f64, gain_db: f64) {
        let coeffs = design::high_shelf(frequency, gain_db, self.sample_rate);
        self.set_design_all(&coeffs);
    }

    /// Configure per-channel high shelves that shorten high-frequency decay
    /// inside a feedback delay network.
    ///
    /// `delay_seconds` gives each channel's delay-line length. The shelf cut
    /// above `crossover_freq` is chosen so that recirculating through
    /// channel `i` every `delay_seconds[i]` realizes `high_rt60` above the
    /// crossover while the broadband feedback gain realizes
    /// `broadband_rt60` below it.
    ///
    /// # Panics
    ///
    /// Panics if `delay_seconds.len()` does not match the channel count, or
    /// if either decay time is not positive.
    pub fn set_high_decay_fdn(
        &mut self,
        delay_seconds: &[f32],
        crossover_freq: f64,
        broadband_rt60: f64,
        high_rt60: f64,
    ) {
        assert!(
            delay_seconds.len() == self.num_channels(),
            "one delay time per channel required"
        );
        assert!(
            broadband_rt60 > 0.0 && high_rt60 > 0.0,
            "decay times must be positive"
        );
        for ch in 0..self.num_channels() {
            let gain_db = fdn_band_gain_db(f64::from(delay_seconds[ch]), broadband_rt60, high_rt60);
            let coeffs = design::high_shelf(crossover_freq, gain_db, self.sample_rate);
            self.set_design(ch, &coeffs);
        }
    }

    /// Configure per-channel low shelves that adjust low-frequency decay
    /// inside a feedback delay network.
    ///
    /// The low-band counterpart of [`set_high_decay_fdn`](Self::set_high_decay_fdn):
    /// the shelf below `crossover_freq` realizes `low_rt60` against the
    /// broadband feedback gain.
    ///
    /// # Panics
    ///
    /// Panics if `delay_seconds.len()` does not match the channel count, or
    /// if either decay time is not positive.
    pub fn set_low_decay_fdn(
        &mut self,
        delay_seconds: &[f32],
        crossover_freq: f64,
        broadband_rt60: f64,
        low_rt60: f64,
    ) {
        assert!(
            delay_seconds.len() == self.num_channels(),
            "one delay time per channel required"
        );
        assert!(
            broadband_rt60 > 0.0 && low_rt60 > 0.0,
            "decay times must be positive"
        );
        for ch in 0..self.num_channels() {
            let gain_db = fdn_band_gain_db(f64::from(delay_seconds[ch]), broadband_rt60, low_rt60);
            let coeffs = design::low_shelf(crossover_freq, gain_db, self.sample_rate);
            self.set_design(ch, &coeffs);
        }
    }

    /// Filter one frame, reading `input` and writing `output` per channel.
    ///
    /// # Panics
    ///
    /// Panics if either slice length differs from the channel count.
    pub fn process_sample(&mut self, input: &[f32], output: &mut [f32]) {
        let n = self.num_channels();
        assert!(input.len() == n && output.len() == n, "frame length must match channel count");
        for ch in 0..n {
            output[ch] = self.tick(ch, input[ch]);
        }
    }

    /// Filter one frame in place.
    ///
    /// # Panics
    ///
    /// Panics if the slice length differs from the channel count.
    pub fn process_frame(&mut self, frame: &mut [f32]) {
        let n = self.num_channels();
        assert!(frame.len() == n, "frame length must match channel count");
        for ch in 0..n {
            frame[ch] = self.tick(ch, frame[ch]);
        }
    }

    #[inline]
    fn tick(&mut self, ch: usize, x0: f32) -> f32 {
        let y0 = self.b0[ch] * x0 + self.b1[ch] * self.x1[ch] + self.b2[ch] * self.x2[ch]
            - self.a1[ch] * self.y1[ch]
            - self.a2[ch] * self.y2[ch];
        let y0 = flush_denormal(y0);
        self.x2[ch] = self.x1[ch];
        self.x1[ch] = x0;
        self.y2[ch] = self.y1[ch];
        self.y1[ch] = y0;
        y0
    }

    /// Zero all filter state, keeping coefficients.
    pub fn clear(&mut self) {
        self.x1.fill(0.0);
        self.x2.fill(0.0);
        self.y1.fill(0.0);
        self.y2.fill(0.0);
    }
}

/// Shelf gain in dB that turns a broadband per-pass decay into the per-pass
/// decay of a band with its own RT60.
///
/// A signal recirculating every `delay` seconds loses `60 * delay / rt60`
/// dB per pass. The shelf supplies the difference between the band's loss
/// and the broadband loss already applied by the feedback gain.
fn fdn_band_gain_db(delay: f64, broadband_rt60: f64, band_rt60: f64) -> f64 {
    60.0 * delay * (1.0 / broadband_rt60 - 1.0 / band_rt60)
}
