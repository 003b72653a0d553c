//! Schroeder allpass diffuser.

use crate::InterpolatedDelay;
use crate::flush_denormal;

/// Allpass stage used after the comb bank to smear reflections.
///
/// ```text
/// delayed = delay[n - L]
/// out     = delayed - in
/// delay  <- in + delayed * feedback
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: InterpolatedDelay,
    length: usize,
    feedback: f32,
}

impl AllpassFilter {
    /// Create an allpass with a loop length of `length` samples (at least 1).
    pub fn new(length: usize) -> Self {
        let length = length.max(1);
        Self {
            delay: InterpolatedDelay::new(length + 1),
            length,
            feedback: 0.5,
        }
    }

    /// Loop coefficient, clamped to `[-0.99, 0.99]`.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read((self.length - 1) as f32);
        self.delay
            .write(flush_denormal(input + delayed * self.feedback));
        delayed - input
    }

    /// Clear the loop.
    pub fn clear(&mut self) {
        self.delay.clear();
    }
}
