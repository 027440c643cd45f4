//! State-variable filter kernel (Zavalishin TPT form).
//!
//! The SVF topology discretizes the analog state-variable filter with
//! trapezoidal integrators (the Topology-Preserving Transform), which keeps
//! the frequency response of the analog prototype and — unlike Direct Form
//! biquads — stays well-behaved when coefficients move while audio is
//! flowing. That property is why the sweepable engine in `resona-banks`
//! runs on this kernel instead of on [`Biquad`](crate::Biquad).
//!
//! Rather than deriving SVF coefficients per filter type, designs come from
//! the biquad designer and are converted through
//! [`SvfCoeffs::from_biquad`], so both topologies share one set of
//! coefficient formulas.
//!
//! # Reference
//!
//! Zavalishin, "The Art of VA Filter Design", rev. 2.1.2 (2018), Chapter 3.

use libm::sqrt;

use crate::design::BiquadCoeffs;
use crate::flush_denormal;

/// SVF coefficient set: three integrator coefficients and three mix gains.
///
/// Per-sample recursion (see [`SvfState::tick`]):
/// ```text
/// v3 = x − ic2eq
/// v1 = a1·ic1eq + a2·v3
/// v2 = ic2eq + a2·ic1eq + a3·v3
/// ic1eq = 2·v1 − ic1eq
/// ic2eq = 2·v2 − ic2eq
/// y  = m0·x + m1·v1 + m2·v2
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvfCoeffs {
    /// Integrator coefficient `1/(1 + g(g + k))`.
    pub a1: f32,
    /// Integrator coefficient `g·a1`.
    pub a2: f32,
    /// Integrator coefficient `g·a2`.
    pub a3: f32,
    /// Direct input mix gain.
    pub m0: f32,
    /// Bandpass-path mix gain.
    pub m1: f32,
    /// Lowpass-path mix gain.
    pub m2: f32,
}

impl SvfCoeffs {
    /// Identity pass-through coefficients.
    pub const fn bypass() -> Self {
        Self {
            a1: 0.0,
            a2: 0.0,
            a3: 0.0,
            m0: 1.0,
            m1: 0.0,
            m2: 0.0,
        }
    }

    /// Convert designed biquad coefficients into the equivalent SVF set.
    ///
    /// With `p = 1 + a1 + a2` and `q = 1 − a1 + a2` (the biquad denominator
    /// evaluated at z = 1 and z = −1), matching the TPT-SVF transfer
    /// polynomial `(1−z⁻¹)² + kg(1−z⁻²) + g²(1+z⁻¹)²` against the design
    /// gives:
    ///
    /// ```text
    /// g  = √(p/q)                      k  = 2(1 − a2)/√(pq)
    /// m0 = (b0 − b1 + b2)/q            m1 = 2(b0 − b2)/√(pq) − k·m0
    /// m2 = (b0 + b1 + b2)/p − m0
    /// ```
    ///
    /// For an RBJ design this recovers `g = tan(π·fc/fs)` and `k = 1/Q`
    /// exactly; filtering an impulse through the converted SVF matches the
    /// source biquad sample for sample.
    ///
    /// # Panics
    ///
    /// Panics when `p ≤ 0` or `q ≤ 0` — the conversion is only defined for
    /// stable designs whose poles lie inside the unit circle. Designer
    /// output always satisfies this; arbitrary hand-rolled coefficients may
    /// not.
    pub fn from_biquad(coeffs: &BiquadCoeffs) -> Self {
        let p = 1.0 + coeffs.a1 + coeffs.a2;
        let q = 1.0 - coeffs.a1 + coeffs.a2;
        assert!(
            p > 0.0 && q > 0.0,
            "biquad outside the SVF conversion domain (p={p}, q={q}): unstable design"
        );

        let spq = sqrt(p * q);
        let g = sqrt(p / q);
        let k = 2.0 * (1.0 - coeffs.a2) / spq;

        let m0 = (coeffs.b0 - coeffs.b1 + coeffs.b2) / q;
        let m1 = 2.0 * (coeffs.b0 - coeffs.b2) / spq - k * m0;
        let m2 = (coeffs.b0 + coeffs.b1 + coeffs.b2) / p - m0;

        let a1 = 1.0 / (1.0 + g * (g + k));
        let a2 = g * a1;
        let a3 = g * a2;

        Self {
            a1: a1 as f32,
            a2: a2 as f32,
            a3: a3 as f32,
            m0: m0 as f32,
            m1: m1 as f32,
            m2: m2 as f32,
        }
    }

    /// Per-sample increment that moves `self` toward `target` in `len`
    /// equal steps.
    ///
    /// Used by the sweep engine: after `len − 1` applications the
    /// coefficients sit exactly one step short of the target.
    pub fn step_toward(&self, target: &SvfCoeffs, len: usize) -> SvfCoeffs {
        let inv = 1.0 / len as f32;
        SvfCoeffs {
            a1: (target.a1 - self.a1) * inv,
            a2: (target.a2 - self.a2) * inv,
            a3: (target.a3 - self.a3) * inv,
            m0: (target.m0 - self.m0) * inv,
            m1: (target.m1 - self.m1) * inv,
            m2: (target.m2 - self.m2) * inv,
        }
    }

    /// Advance by one interpolation step.
    #[inline]
    pub fn advance(&mut self, step: &SvfCoeffs) {
        self.a1 += step.a1;
        self.a2 += step.a2;
        self.a3 += step.a3;
        self.m0 += step.m0;
        self.m1 += step.m1;
        self.m2 += step.m2;
    }
}

/// Per-channel SVF integrator state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvfState {
    /// First trapezoidal integrator state.
    pub ic1eq: f32,
    /// Second trapezoidal integrator state.
    pub ic2eq: f32,
}

impl SvfState {
    /// Zeroed integrator state.
    pub const fn new() -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
        }
    }

    /// Advance the filter by one sample with the given coefficients.
    #[inline]
    pub fn tick(&mut self, c: &SvfCoeffs, input: f32) -> f32 {
        let v3 = input - self.ic2eq;
        let v1 = c.a1 * self.ic1eq + c.a2 * v3;
        let v2 = self.ic2eq + c.a2 * self.ic1eq + c.a3 * v3;

        self.ic1eq = flush_denormal(2.0 * v1 - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        c.m0 * input + c.m1 * v1 + c.m2 * v2
    }

    /// Clear the integrator state.
    pub fn clear(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design;
    use crate::{Biquad, Effect};
    use libm::tan;

    const SR: f64 = 48000.0;

    #[test]
    fn test_bridge_recovers_g_and_k() {
        // RBJ designs are bilinear transforms, so the conversion must land
        // on g = tan(π·fc/fs) and k = 1/Q exactly (up to rounding).
        let q = core::f64::consts::FRAC_1_SQRT_2;
        let c = SvfCoeffs::from_biquad(&design::lowpass(1000.0, q, SR));

        let g = tan(core::f64::consts::PI * 1000.0 / SR);
        let k = 1.0 / q;
        let a1 = 1.0 / (1.0 + g * (g + k));

        assert!((c.a1 as f64 - a1).abs() < 1e-6, "a1: {} vs {a1}", c.a1);
        assert!((c.a2 as f64 - g * a1).abs() < 1e-6);
        assert!((c.a3 as f64 - g * g * a1).abs() < 1e-6);
    }

    #[test]
    fn test_bridge_lowpass_mix() {
        // Lowpass mixes only the v2 path: m0 = 0, m1 = 0, m2 = 1.
        let c = SvfCoeffs::from_biquad(&design::lowpass(1000.0, 0.707, SR));
        assert!(c.m0.abs() < 1e-5, "m0 = {}", c.m0);
        assert!(c.m1.abs() < 1e-4, "m1 = {}", c.m1);
        assert!((c.m2 - 1.0).abs() < 1e-5, "m2 = {}", c.m2);
    }

    #[test]
    fn test_bridge_highpass_mix() {
        // Highpass: m0 = 1, m1 = −k, m2 = −1.
        let q = 0.707;
        let c = SvfCoeffs::from_biquad(&design::highpass(1000.0, q, SR));
        let k = 1.0 / q;
        assert!((c.m0 - 1.0).abs() < 1e-5, "m0 = {}", c.m0);
        assert!((c.m1 as f64 + k).abs() < 1e-3, "m1 = {}", c.m1);
        assert!((c.m2 + 1.0).abs() < 1e-5, "m2 = {}", c.m2);
    }

    #[test]
    fn test_svf_matches_biquad_impulse() {
        for coeffs in [
            design::lowpass(1000.0, 0.707, 44100.0),
            design::highpass(1000.0, 2.0, 44100.0),
            design::bell(1000.0, 0.707, 6.0, 44100.0),
        ] {
            let mut biquad = Biquad::new();
            biquad.set_design(&coeffs);

            let svf_coeffs = SvfCoeffs::from_biquad(&coeffs);
            let mut svf = SvfState::new();

            for i in 0..256 {
                let x = if i == 0 { 1.0 } else { 0.0 };
                let yb = biquad.process(x);
                let ys = svf.tick(&svf_coeffs, x);
                assert!(
                    (yb - ys).abs() < 1e-4,
                    "topologies diverged at sample {i}: biquad {yb}, svf {ys}"
                );
            }
        }
    }

    #[test]
    fn test_bypass_is_identity() {
        let c = SvfCoeffs::bypass();
        let mut state = SvfState::new();
        for i in 0..32 {
            let x = libm::sinf(i as f32 * 0.4);
            assert_eq!(state.tick(&c, x), x);
        }
    }

    #[test]
    fn test_bypass_biquad_converts_to_identity() {
        let c = SvfCoeffs::from_biquad(&design::BiquadCoeffs::bypass());
        let mut state = SvfState::new();
        for i in 0..64 {
            let x = libm::sinf(i as f32 * 0.3);
            let y = state.tick(&c, x);
            assert!((y - x).abs() < 1e-6, "sample {i}: {y} vs {x}");
        }
    }

    #[test]
    #[should_panic(expected = "outside the SVF conversion domain")]
    fn test_unstable_design_panics() {
        // Poles outside the unit circle: p = 1 + a1 + a2 < 0.
        let bad = design::BiquadCoeffs {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: -3.0,
            a2: 1.0,
        };
        let _ = SvfCoeffs::from_biquad(&bad);
    }

    #[test]
    fn test_step_toward_lands_one_step_short() {
        let from = SvfCoeffs::bypass();
        let to = SvfCoeffs::from_biquad(&design::lowpass(2000.0, 1.0, SR));
        let n = 128;
        let step = from.step_toward(&to, n);

        let mut current = from;
        for _ in 0..n - 1 {
            current.advance(&step);
        }
        // One step short of the target, by exactly one increment
        assert!((current.a1 + step.a1 - to.a1).abs() < 1e-6);
        assert!((current.m2 + step.m2 - to.m2).abs() < 1e-6);
        assert!((current.a1 - to.a1).abs() > 0.0);
    }
}
