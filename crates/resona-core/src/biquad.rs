//! Biquad (bi-quadratic) filter section.
//!
//! A single second-order IIR stage running the Direct Form I difference
//! equation in `f32`, configured from double-precision designed
//! coefficients (see [`design`](crate::design)). The multi-channel and
//! multi-level engines in `resona-banks` are built from this structure's
//! difference equation.

use crate::Effect;
use crate::design::BiquadCoeffs;

/// A single biquad filter section.
///
/// Implements the Direct Form I structure:
/// ```text
/// y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2]
///                - a1·y[n-1] - a2·y[n-2]
/// ```
///
/// Coefficients are stored in `f32` (the working precision of the audio
/// path); designs arrive in `f64` via [`set_design`](Biquad::set_design)
/// and are narrowed on store.
#[derive(Debug, Clone)]
pub struct Biquad {
    /// Feedforward coefficients
    b0: f32,
    b1: f32,
    b2: f32,

    /// Feedback coefficients (normalized, a0 = 1)
    a1: f32,
    a2: f32,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    ///
    /// Initial state: `y[n] = x[n]` (no filtering)
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Store designed coefficients, narrowing from `f64`.
    ///
    /// Filter state is left untouched so coefficients can change while
    /// audio is flowing.
    pub fn set_design(&mut self, coeffs: &BiquadCoeffs) {
        self.b0 = coeffs.b0 as f32;
        self.b1 = coeffs.b1 as f32;
        self.b2 = coeffs.b2 as f32;
        self.a1 = coeffs.a1 as f32;
        self.a2 = coeffs.a2 as f32;
    }

    /// Current working-precision coefficients `(b0, b1, b2, a1, a2)`.
    pub fn coefficients(&self) -> (f32, f32, f32, f32, f32) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }

    /// Clears the filter state (delay lines).
    ///
    /// Useful for resetting the filter without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Biquad {
    /// Processes a single sample through the Direct Form I structure.
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {
        // Coefficients are designed externally; nothing to recompute here.
    }

    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design;

    #[test]
    fn test_biquad_passthrough() {
        let mut biquad = Biquad::new();

        // Default coefficients should pass signal through
        for i in 0..10 {
            let input = i as f32 * 0.1;
            let output = biquad.process(input);
            assert!((output - input).abs() < 0.0001);
        }
    }

    #[test]
    fn test_biquad_clear() {
        let mut biquad = Biquad::new();

        for _ in 0..10 {
            biquad.process(1.0);
        }

        biquad.clear();

        assert_eq!(biquad.x1, 0.0);
        assert_eq!(biquad.x2, 0.0);
        assert_eq!(biquad.y1, 0.0);
        assert_eq!(biquad.y2, 0.0);
    }

    #[test]
    fn test_biquad_lowpass_dc_pass() {
        let mut biquad = Biquad::new();
        biquad.set_design(&design::lowpass(1000.0, 0.707, 44100.0));

        // DC should pass through a low-pass filter with near-unity gain
        let mut output = 0.0;
        for _ in 0..1000 {
            output = biquad.process(1.0);
        }
        assert!((output - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_biquad_bypass_identity_after_unity_shelf() {
        let mut biquad = Biquad::new();
        biquad.set_design(&design::low_shelf(500.0, 0.0, 48000.0));

        for i in 0..64 {
            let input = libm::sinf(i as f32 * 0.3);
            let output = biquad.process(input);
            assert!(
                (output - input).abs() < 1e-6,
                "unity-gain shelf should be identity, sample {i}: {output} vs {input}"
            );
        }
    }

    #[test]
    fn test_biquad_impulse_response_decays() {
        let mut biquad = Biquad::new();
        biquad.set_design(&design::bell(1000.0, 2.0, 9.0, 44100.0));

        let mut out = biquad.process(1.0);
        for _ in 0..10000 {
            out = biquad.process(0.0);
        }
        assert!(out.abs() < 1e-4, "impulse response did not decay: {out}");
    }
}
