//! Multi-level biquad cascade.
//!
//! [`MultiLevelBiquad`] chains a fixed number of second-order sections in
//! series, mono or stereo. Every level is configured independently through
//! the full designer vocabulary; unconfigured levels pass audio through
//! unchanged. The designed `f64` coefficients of each level are retained
//! alongside the `f32` runtime sections, both for magnitude-response
//! introspection and as the source for the sweepable SVF engine.

use resona_core::{Biquad, BiquadCoeffs, Effect};

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::params::FilterParams;

/// A serial cascade of biquad sections with per-level designs.
///
/// Sections are stored level-major: for stereo, level `l` owns sections
/// `2l` (left) and `2l + 1` (right), sharing one design.
#[derive(Debug, Clone)]
pub struct MultiLevelBiquad {
    sections: Vec<Biquad>,
    designs: Vec<BiquadCoeffs>,
    params: Vec<FilterParams>,
    channels: usize,
    sample_rate: f64,
}

impl MultiLevelBiquad {
    /// Create a cascade of `num_levels` bypass levels.
    ///
    /// # Panics
    ///
    /// Panics if `num_levels` is zero or `sample_rate` is not positive.
    #[must_use]
    pub fn new(num_levels: usize, sample_rate: f64, stereo: bool) -> Self {
        assert!(num_levels > 0, "cascade needs at least one level");
        assert!(sample_rate > 0.0, "sample rate must be positive");
        let channels = if stereo { 2 } else { 1 };
        Self {
            sections: vec![Biquad::new(); num_levels * channels],
            designs: vec![BiquadCoeffs::bypass(); num_levels],
            params: vec![FilterParams::Bypass; num_levels],
            channels,
            sample_rate,
        }
    }

    /// Number of serial levels.
    #[must_use]
    pub fn num_levels(&self) -> usize {
        self.designs.len()
    }

    /// True when the cascade processes two channels.
    #[must_use]
    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// Designed coefficients of one level.
    ///
    /// # Panics
    ///
    /// Panics if `level` is out of range.
    #[must_use]
    pub fn design(&self, level: usize) -> &BiquadCoeffs {
        &self.designs[level]
    }

    /// Parameters one level was last configured with.
    ///
    /// # Panics
    ///
    /// Panics if `level` is out of range.
    #[must_use]
    pub fn params(&self, level: usize) -> &FilterParams {
        &self.params[level]
    }

    fn apply(&mut self, level: usize, params: FilterParams) {
        assert!(level < self.num_levels(), "level out of range");
        let coeffs = params.design(self.sample_rate);
        for ch in 0..self.channels {
            self.sections[level * self.channels + ch].set_design(&coeffs);
        }
        self.designs[level] = coeffs;
        self.params[level] = params;
        #[cfg(feature = "tracing")]
        tracing::debug!(level, ?params, "cascade level configured");
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

    /// Composite magnitude response of the whole cascade at `frequency` Hz,
    /// evaluated from the retained double-precision designs.
    #[must_use]
    pub fn magnitude_response(&self, frequency: f64) -> f64 {
        self.designs
            .iter()
            .map(|d| d.magnitude_at(frequency, self.sample_rate))
            .product()
    }

    /// Filter a mono buffer through all levels.
    ///
    /// # Panics
    ///
    /// Panics on a stereo cascade, or when buffer lengths differ.
    pub fn process_buffer_mono(&mut self, input: &[f32], output: &mut [f32]) {
        assert!(self.channels == 1, "mono call on a stereo cascade");
        assert!(input.len() == output.len(), "buffer lengths must match");
        self.sections[0].process_block(input, output);
        for section in &mut self.sections[1..] {
            section.process_block_inplace(output);
        }
    }

    /// Filter a stereo buffer pair through all levels.
    ///
    /// # Panics
    ///
    /// Panics on a mono cascade, or when buffer lengths differ.
    pub fn process_buffer_stereo(
        &mut self,
        input_left: &[f32],
        input_right: &[f32],
        output_left: &mut [f32],
        output_right: &mut [f32],
    ) {
        assert!(self.channels == 2, "stereo call on a mono cascade");
        assert!(
            input_left.len() == output_left.len()
                && input_right.len() == output_right.len()
                && input_left.len() == input_right.len(),
            "buffer lengths must match"
        );
        let (first, rest) = self.sections.split_at_mut(2);
        first[0].process_block(input_left, output_left);
        first[1].process_block(input_right, output_right);
        for pair in rest.chunks_exact_mut(2) {
            pair[0].process_block_inplace(output_left);
            pair[1].process_block_inplace(output_right);
        }
    }

    /// Zero all filter state, keeping every level's design.
    pub fn clear(&mut self) {
        for section in &mut self.sections {
            section.clear();
        }
    }
}

impl Effect for MultiLevelBiquad {
    /// Run one sample through every level serially. Mono cascades only;
    /// stereo cascades use [`process_buffer_stereo`](Self::process_buffer_stereo).
    fn process(&mut self, input: f32) -> f32 {
        debug_assert!(self.channels == 1, "Effect::process is mono");
        self.sections
            .iter_mut()
            .fold(input, |x, section| section.process(x))
    }

    /// Redesign every configured level at the new rate.
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
        for level in 0..self.num_levels() {
            self.apply(level, self.params[level]);
        }
    }

    fn reset(&mut self) {
        self.clear();
    }
}
