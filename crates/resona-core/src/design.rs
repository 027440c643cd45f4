//! Biquad coefficient designer.
//!
//! Pure functions that map filter parameters (type, cutoff, Q, gain) to
//! normalized second-order coefficients. All math is done in `f64` and only
//! narrowed to `f32` when the runtime engines store the result — shelf and
//! bell designs lose audible accuracy near the band edges in single
//! precision.
//!
//! Lowpass/highpass/bandpass/notch/bell/allpass use the RBJ Audio EQ
//! Cookbook formulas. The shelves use a quarter-power pole/zero placement
//! derived from the bilinear transform of two Butterworth sections, with a
//! three-way mid-band gain correction that keeps the response bounded at
//! extreme shelf gains (see [`low_shelf`]).
//!
//! # Contracts
//!
//! Frequencies must lie in `(0, 0.49 × sample_rate)` and Q must be positive;
//! violations panic. Exact unity gain is a degenerate input for the shelf
//! and skirt formulas (they divide by `gain² − G_mid²`, which is zero at
//! unity) and returns [`BiquadCoeffs::bypass`] instead.

use libm::{cos, pow, sin, sqrt, tan};

/// Normalized biquad coefficients (`a0 = 1`), double precision.
///
/// Transfer function:
/// ```text
///         b0 + b1·z⁻¹ + b2·z⁻²
/// H(z) = ----------------------
///          1 + a1·z⁻¹ + a2·z⁻²
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    /// Feedforward coefficient b0.
    pub b0: f64,
    /// Feedforward coefficient b1.
    pub b1: f64,
    /// Feedforward coefficient b2.
    pub b2: f64,
    /// Feedback coefficient a1.
    pub a1: f64,
    /// Feedback coefficient a2.
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Identity pass-through coefficients (`b0 = 1`, all others 0).
    ///
    /// Used whenever a design degenerates at exact unity gain.
    pub const fn bypass() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Returns true if these are the identity coefficients.
    pub fn is_bypass(&self) -> bool {
        *self == Self::bypass()
    }

    /// Build from unnormalized `(b0, b1, b2, a0, a1, a2)`, dividing by `a0`.
    pub fn normalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Magnitude response `|H(e^{jω})|` at `frequency` Hz.
    ///
    /// Evaluates the designed double-precision coefficients directly, so
    /// plotting and verification see exactly what was designed rather than
    /// the narrowed runtime values.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let omega = 2.0 * core::f64::consts::PI * frequency / sample_rate;
        let (c1, s1) = (cos(omega), sin(omega));
        let (c2, s2) = (cos(2.0 * omega), sin(2.0 * omega));

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        sqrt((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im))
    }
}

/// Precondition check shared by every design function.
fn assert_valid_frequency(frequency: f64, sample_rate: f64) {
    assert!(
        frequency > 0.0 && frequency < sample_rate * 0.49,
        "filter frequency {frequency} Hz out of range (0, {}) at sample rate {sample_rate}",
        sample_rate * 0.49
    );
}

fn assert_valid_q(q: f64) {
    assert!(q > 0.0, "filter Q must be positive, got {q}");
}

/// RBJ intermediate values: `(cos ω, α)` for the cookbook formulas.
fn rbj_intermediates(frequency: f64, q: f64, sample_rate: f64) -> (f64, f64) {
    let omega = 2.0 * core::f64::consts::PI * frequency / sample_rate;
    (cos(omega), sin(omega) / (2.0 * q))
}

/// Second-order lowpass (RBJ cookbook).
///
/// # Arguments
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (0.707 for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
pub fn lowpass(frequency: f64, q: f64, sample_rate: f64) -> BiquadCoeffs {
    assert_valid_frequency(frequency, sample_rate);
    assert_valid_q(q);
    let (cos_omega, alpha) = rbj_intermediates(frequency, q, sample_rate);

    BiquadCoeffs::normalized(
        (1.0 - cos_omega) / 2.0,
        1.0 - cos_omega,
        (1.0 - cos_omega) / 2.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Second-order highpass (RBJ cookbook).
pub fn highpass(frequency: f64, q: f64, sample_rate: f64) -> BiquadCoeffs {
    assert_valid_frequency(frequency, sample_rate);
    assert_valid_q(q);
    let (cos_omega, alpha) = rbj_intermediates(frequency, q, sample_rate);

    BiquadCoeffs::normalized(
        (1.0 + cos_omega) / 2.0,
        -(1.0 + cos_omega),
        (1.0 + cos_omega) / 2.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Second-order bandpass with constant 0 dB peak gain (RBJ cookbook).
///
/// Bandwidth is `frequency / q`.
pub fn bandpass(frequency: f64, q: f64, sample_rate: f64) -> BiquadCoeffs {
    assert_valid_frequency(frequency, sample_rate);
    assert_valid_q(q);
    let (cos_omega, alpha) = rbj_intermediates(frequency, q, sample_rate);

    BiquadCoeffs::normalized(
        alpha,
        0.0,
        -alpha,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Second-order notch (band-reject, RBJ cookbook).
pub fn notch(frequency: f64, q: f64, sample_rate: f64) -> BiquadCoeffs {
    assert_valid_frequency(frequency, sample_rate);
    assert_valid_q(q);
    let (cos_omega, alpha) = rbj_intermediates(frequency, q, sample_rate);

    BiquadCoeffs::normalized(
        1.0,
        -2.0 * cos_omega,
        1.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Second-order allpass (RBJ cookbook).
///
/// Unity magnitude at all frequencies; phase rotates 360° around
/// `frequency`.
pub fn allpass(frequency: f64, q: f64, sample_rate: f64) -> BiquadCoeffs {
    assert_valid_frequency(frequency, sample_rate);
    assert_valid_q(q);
    let (cos_omega, alpha) = rbj_intermediates(frequency, q, sample_rate);

    BiquadCoeffs::normalized(
        1.0 - alpha,
        -2.0 * cos_omega,
        1.0 + alpha,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Peaking (bell) EQ section (RBJ cookbook).
///
/// Boosts or cuts around `frequency` with bandwidth `frequency / q`.
/// Uses the cookbook amplitude factor `A = 10^(dB/40)`; zero dB returns
/// bypass coefficients.
///
/// # Arguments
/// * `frequency` - Center frequency in Hz
/// * `q` - Q factor
/// * `gain_db` - Peak gain in decibels (positive = boost, negative = cut)
/// * `sample_rate` - Sample rate in Hz
pub fn bell(frequency: f64, q: f64, gain_db: f64, sample_rate: f64) -> BiquadCoeffs {
    assert_valid_frequency(frequency, sample_rate);
    assert_valid_q(q);
    if gain_db == 0.0 {
        return BiquadCoeffs::bypass();
    }

    let a = pow(10.0, gain_db / 40.0);
    let (cos_omega, alpha) = rbj_intermediates(frequency, q, sample_rate);

    BiquadCoeffs::normalized(
        1.0 + alpha * a,
        -2.0 * cos_omega,
        1.0 - alpha * a,
        1.0 + alpha / a,
        -2.0 * cos_omega,
        1.0 - alpha / a,
    )
}

/// Mid-band gain target for the shelf designs.
///
/// An untreated second-order shelf develops a bump near the transition
/// frequency as the gain grows. Capping the transition-point gain keeps the
/// bump bounded for arbitrarily large shelf gains:
///
/// - `gain > 2`: transition gain is `gain·√2/2` (3 dB below the shelf)
/// - `gain ∈ [0.5, 2]`: geometric mean `√gain` (symmetric placement)
/// - `gain < 0.5`: `gain·√2` (3 dB above the shelf)
fn shelf_mid_gain(gain: f64) -> f64 {
    if gain > 2.0 {
        gain * core::f64::consts::SQRT_2 / 2.0
    } else if gain >= 0.5 {
        sqrt(gain)
    } else {
        gain * core::f64::consts::SQRT_2
    }
}

/// Bilinear transform of `scale·(s² + √2·gn·s + gn²)/(s² + √2·gd·s + gd²)`
/// where `gn`, `gd` are prewarped numerator/denominator corner frequencies.
fn butterworth_ratio(gn: f64, gd: f64, scale: f64) -> BiquadCoeffs {
    let sqrt2 = core::f64::consts::SQRT_2;
    BiquadCoeffs::normalized(
        scale * (1.0 + sqrt2 * gn + gn * gn),
        scale * 2.0 * (gn * gn - 1.0),
        scale * (1.0 - sqrt2 * gn + gn * gn),
        1.0 + sqrt2 * gd + gd * gd,
        2.0 * (gd * gd - 1.0),
        1.0 - sqrt2 * gd + gd * gd,
    )
}

/// Second-order low shelf.
///
/// Applies `gain_db` below `frequency`, unity above. The design places a
/// Butterworth zero pair and pole pair at corner frequencies
/// `ω0·(ratio)^(1/4)` apart (the quarter-power placement), where the ratio
/// is chosen so the response passes through [`shelf_mid_gain`] at the
/// transition frequency. The general formula divides by
/// `gain² − G_mid²`, which vanishes at unity gain — that case returns
/// bypass coefficients.
///
/// # Arguments
/// * `frequency` - Transition frequency in Hz
/// * `gain_db` - Shelf gain in decibels
/// * `sample_rate` - Sample rate in Hz
pub fn low_shelf(frequency: f64, gain_db: f64, sample_rate: f64) -> BiquadCoeffs {
    assert_valid_frequency(frequency, sample_rate);

    let gain = crate::math::db_to_linear_f64(gain_db);
    if gain == 1.0 {
        return BiquadCoeffs::bypass();
    }

    let gamma = tan(core::f64::consts::PI * frequency / sample_rate);
    let gm = shelf_mid_gain(gain);
    // Denominator corner from the constraint |H(jω0)| = G_mid:
    //   (gd/ω0)⁴ = (G_mid² − 1)/(G² − G_mid²)
    let gd = gamma * pow((gm * gm - 1.0) / (gain * gain - gm * gm), 0.25);
    let gn = sqrt(gain) * gd;

    butterworth_ratio(gn, gd, 1.0)
}

/// Second-order high shelf.
///
/// Applies `gain_db` above `frequency`, unity below. Mirror construction
/// of [`low_shelf`]: the zero corner sits at `gd/√gain` and the numerator
/// is scaled by the shelf gain so the high-frequency asymptote lands on
/// `gain_db` while DC stays at unity.
pub fn high_shelf(frequency: f64, gain_db: f64, sample_rate: f64) -> BiquadCoeffs {
    assert_valid_frequency(frequency, sample_rate);

    let gain = crate::math::db_to_linear_f64(gain_db);
    if gain == 1.0 {
        return BiquadCoeffs::bypass();
    }

    let gamma = tan(core::f64::consts::PI * frequency / sample_rate);
    let gm = shelf_mid_gain(gain);
    let gd = gamma * pow((gain * gain - gm * gm) / (gm * gm - 1.0), 0.25);
    let gn = gd / sqrt(gain);

    butterworth_ratio(gn, gd, gain)
}

/// Bell with independently controlled skirt gain.
///
/// A standard bell applies `peak_db` at the center and unity everywhere
/// else. This variant lets the baseline (the "skirt" outside the bell)
/// sit at `skirt_db` instead: the bell is designed relative to the skirt
/// baseline (`peak_db − skirt_db` of relative boost/cut) and the whole
/// section is then scaled by the skirt gain. Endpoint behavior:
/// DC/Nyquist gain ≈ `skirt_db`, gain at `frequency` ≈ `peak_db`.
///
/// Equal peak and skirt degenerate to a flat gain section; both at 0 dB
/// is a bypass.
pub fn bell_with_skirt(
    frequency: f64,
    q: f64,
    peak_db: f64,
    skirt_db: f64,
    sample_rate: f64,
) -> BiquadCoeffs {
    assert_valid_frequency(frequency, sample_rate);
    assert_valid_q(q);

    let skirt = crate::math::db_to_linear_f64(skirt_db);
    if peak_db == skirt_db {
        // Flat: pure gain section (bypass when that gain is unity).
        return BiquadCoeffs {
            b0: skirt,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        };
    }

    let relative = bell(frequency, q, peak_db - skirt_db, sample_rate);
    BiquadCoeffs {
        b0: relative.b0 * skirt,
        b1: relative.b1 * skirt,
        b2: relative.b2 * skirt,
        a1: relative.a1,
        a2: relative.a2,
    }
}

/// Combined first-order highpass × first-order lowpass in one section.
///
/// Bilinear transform of `H(s) = (s·Ωl) / ((s + Ωh)(s + Ωl))` with
/// prewarped corners `Ωh = tan(π·f_hp/fs)`, `Ωl = tan(π·f_lp/fs)`.
/// Band-defining pair with no resonant peaking; a cheap anti-aliasing /
/// anti-rumble pre-filter occupying a single level.
///
/// # Arguments
/// * `highpass_freq` - Highpass corner in Hz (lower edge)
/// * `lowpass_freq` - Lowpass corner in Hz (upper edge)
/// * `sample_rate` - Sample rate in Hz
pub fn highpass_lowpass(highpass_freq: f64, lowpass_freq: f64, sample_rate: f64) -> BiquadCoeffs {
    assert_valid_frequency(highpass_freq, sample_rate);
    assert_valid_frequency(lowpass_freq, sample_rate);

    let wh = tan(core::f64::consts::PI * highpass_freq / sample_rate);
    let wl = tan(core::f64::consts::PI * lowpass_freq / sample_rate);

    // (1 − z⁻¹ + Ω(1 + z⁻¹)) per first-order factor; numerator Ωl(1 − z⁻²).
    let d0 = (1.0 + wh) * (1.0 + wl);
    let d1 = (1.0 + wh) * (wl - 1.0) + (wh - 1.0) * (1.0 + wl);
    let d2 = (wh - 1.0) * (wl - 1.0);

    BiquadCoeffs::normalized(wl, 0.0, -wl, d0, d1, d2)
}
