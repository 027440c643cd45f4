//! Per-level filter parameter records.
//!
//! The cascade and SVF engines remember what each level was configured as,
//! not just the resulting coefficients, so a sample-rate change can
//! redesign every level from its original parameters.

use resona_core::{BiquadCoeffs, design};

/// Parameters of one configured filter level.
///
/// Frequencies in Hz, gains in dB. Created by the engines' `set_*` calls;
/// [`design`](FilterParams::design) reproduces the coefficients at any
/// sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FilterParams {
    /// Identity pass-through (the state of a level never configured).
    #[default]
    Bypass,
    /// Second-order lowpass.
    Lowpass {
        /// Cutoff frequency in Hz.
        frequency: f32,
        /// Q factor.
        q: f32,
    },
    /// Second-order highpass.
    Highpass {
        /// Cutoff frequency in Hz.
        frequency: f32,
        /// Q factor.
        q: f32,
    },
    /// Bandpass with constant 0 dB peak gain.
    Bandpass {
        /// Center frequency in Hz.
        frequency: f32,
        /// Q factor.
        q: f32,
    },
    /// Notch (band-reject).
    Notch {
        /// Notch frequency in Hz.
        frequency: f32,
        /// Q factor.
        q: f32,
    },
    /// Allpass (unity magnitude, phase rotation).
    Allpass {
        /// Center frequency in Hz.
        frequency: f32,
        /// Q factor.
        q: f32,
    },
    /// Peaking (bell) EQ band.
    Bell {
        /// Center frequency in Hz.
        frequency: f32,
        /// Q factor.
        q: f32,
        /// Peak gain in dB.
        gain_db: f32,
    },
    /// Low shelf.
    LowShelf {
        /// Transition frequency in Hz.
        frequency: f32,
        /// Shelf gain in dB.
        gain_db: f32,
    },
    /// High shelf.
    HighShelf {
        /// Transition frequency in Hz.
        frequency: f32,
        /// Shelf gain in dB.
        gain_db: f32,
    },
    /// Bell with independently controlled skirt gain.
    BellWithSkirt {
        /// Center frequency in Hz.
        frequency: f32,
        /// Q factor.
        q: f32,
        /// Gain at the center frequency in dB.
        peak_db: f32,
        /// Baseline gain outside the bell in dB.
        skirt_db: f32,
    },
    /// First-order highpass × first-order lowpass in one section.
    HighpassLowpass {
        /// Highpass corner in Hz.
        highpass_freq: f32,
        /// Lowpass corner in Hz.
        lowpass_freq: f32,
    },
}

impl FilterParams {
    /// Design the biquad coefficients for these parameters.
    pub fn design(&self, sample_rate: f64) -> BiquadCoeffs {
        match *self {
            Self::Bypass => BiquadCoeffs::bypass(),
            Self::Lowpass { frequency, q } => design::lowpass(frequency as f64, q as f64, sample_rate),
            Self::Highpass { frequency, q } => {
                design::highpass(frequency as f64, q as f64, sample_rate)
            }
            Self::Bandpass { frequency, q } => {
                design::bandpass(frequency as f64, q as f64, sample_rate)
            }
            Self::Notch { frequency, q } => design::notch(frequency as f64, q as f64, sample_rate),
            Self::Allpass { frequency, q } => {
                design::allpass(frequency as f64, q as f64, sample_rate)
            }
            Self::Bell {
                frequency,
                q,
                gain_db,
            } => design::bell(frequency as f64, q as f64, gain_db as f64, sample_rate),
            Self::LowShelf {
                frequency,
                gain_db,
            } => design::low_shelf(frequency as f64, gain_db as f64, sample_rate),
            Self::HighShelf {
                frequency,
                gain_db,
            } => design::high_shelf(frequency as f64, gain_db as f64, sample_rate),
            Self::BellWithSkirt {
                frequency,
                q,
                peak_db,
                skirt_db,
            } => design::bell_with_skirt(
                frequency as f64,
                q as f64,
                peak_db as f64,
                skirt_db as f64,
                sample_rate,
            ),
            Self::HighpassLowpass {
                highpass_freq,
                lowpass_freq,
            } => design::highpass_lowpass(highpass_freq as f64, lowpass_freq as f64, sample_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_bypass() {
        assert!(FilterParams::default().design(48000.0).is_bypass());
    }

    #[test]
    fn test_redesign_tracks_sample_rate() {
        let params = FilterParams::Lowpass {
            frequency: 1000.0,
            q: 0.707,
        };
        let at_44k = params.design(44100.0);
        let at_96k = params.design(96000.0);
        // Same corner in Hz means different normalized coefficients
        assert!(at_44k != at_96k);
        // But both keep unity DC gain
        assert!((at_44k.magnitude_at(1.0, 44100.0) - 1.0).abs() < 1e-3);
        assert!((at_96k.magnitude_at(1.0, 96000.0) - 1.0).abs() < 1e-3);
    }
}
