//! Core Effect trait.
//!
//! Every filter unit in this workspace implements [`Effect`], giving hosts a
//! consistent interface for single-sample and block-based processing. The
//! trait is object-safe so chains can be built as `Vec<Box<dyn Effect>>`
//! when runtime flexibility matters; static dispatch through generics is
//! preferred on the audio path.
//!
//! All methods are designed to be called in real-time audio contexts with
//! zero heap allocations.

/// Core trait for all audio processing units.
///
/// # Example
///
/// ```rust
/// use resona_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
/// ```
pub trait Effect {
    /// Process a single sample.
    ///
    /// For units with internal state (filters), this advances the state by
    /// one sample.
    ///
    /// # Arguments
    /// * `input` - Input sample, typically in range [-1.0, 1.0]
    ///
    /// # Returns
    /// Processed output sample
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Default implementation calls `process()` for each sample. Units may
    /// override this for more efficient block processing.
    ///
    /// # Panics
    /// Default implementation panics in debug builds if
    /// `input.len() != output.len()`.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in-place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate.
    ///
    /// Units should recalculate any sample-rate-dependent coefficients.
    ///
    /// # Arguments
    /// * `sample_rate` - New sample rate in Hz (e.g., 44100.0, 48000.0)
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Reset internal state.
    ///
    /// Clears all internal state (filter history) without changing
    /// parameters. Called when playback stops/starts or when the unit is
    /// bypassed to prevent artifacts.
    fn reset(&mut self);
}
