//! The [`Effect`] trait shared by filters and the effects crate.
//!
//! Processing is per sample and must not allocate. Mono effects get a stereo
//! entry point for free; stereo effects (the reverb) override it.

/// A sample-by-sample audio processor.
///
/// ```rust
/// use polypod_core::Effect;
///
/// struct Gain(f32);
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.0
///     }
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///     fn reset(&mut self) {}
/// }
///
/// let mut g = Gain(0.5);
/// assert_eq!(g.process_stereo(1.0, -1.0), (0.5, -0.5));
/// ```
pub trait Effect {
    /// Process one mono sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process one stereo frame.
    ///
    /// The default runs the mono path on each channel in turn, which only
    /// makes sense for stateless effects. Stateful mono effects used in
    /// stereo should keep one instance per channel.
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.process(left), self.process(right))
    }

    /// Process a block in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Recompute sample-rate dependent coefficients.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state without touching parameters.
    fn reset(&mut self);
}
