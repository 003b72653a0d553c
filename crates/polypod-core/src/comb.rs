//! Damped feedback comb filter.
//!
//! The feedback path runs through a one-pole low-pass so high frequencies die
//! out faster than lows, which is what makes a bank of these sound like a room.

use crate::InterpolatedDelay;
use crate::flush_denormal;

/// Feedback comb with low-pass damping in the loop.
///
/// ```text
/// out   = delay[n - L]
/// store = out * (1 - damp) + store * damp
/// delay <- in + store * feedback
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    delay: InterpolatedDelay,
    length: usize,
    feedback: f32,
    damp: f32,
    store: f32,
}

impl CombFilter {
    /// Create a comb with a loop length of `length` samples (at least 1).
    pub fn new(length: usize) -> Self {
        let length = length.max(1);
        Self {
            delay: InterpolatedDelay::new(length + 1),
            length,
            feedback: 0.5,
            damp: 0.5,
            store: 0.0,
        }
    }

    /// Loop gain, clamped to `[0, 0.99]`.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    /// Current loop gain.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Damping in `[0, 1]` (0 = bright, 1 = dark).
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Current damping.
    #[inline]
    pub fn damp(&self) -> f32 {
        self.damp
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let out = self.delay.read((self.length - 1) as f32);
        self.store = flush_denormal(out * (1.0 - self.damp) + self.store * self.damp);
        self.delay.write(input + self.store * self.feedback);
        out
    }

    /// Clear the loop.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.store = 0.0;
    }

    /// Loop length in samples.
    pub fn length(&self) -> usize {
        self.length
    }
}
