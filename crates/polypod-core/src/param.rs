//! Parameter smoothing for click-free changes.
//!
//! [`SmoothedParam`] is a one-pole follower: every sample it closes a fixed
//! fraction of the distance to its target. The fraction comes either from a
//! smoothing time (`with_config`) or is given directly (`with_coeff`), which
//! is how the delay length glides at `0.00007` per sample.
//!
//! ```rust
//! use polypod_core::SmoothedParam;
//!
//! let mut length = SmoothedParam::with_coeff(0.0, 0.5);
//! length.set_target(8.0);
//! assert_eq!(length.advance(), 4.0);
//! assert_eq!(length.advance(), 6.0);
//! ```

use libm::expf;

/// A value that approaches its target exponentially, one sample at a time.
///
/// The approach never overshoots: each step moves by `coeff * (target - current)`
/// with `coeff` in `(0, 1]`, and a step that would cross the target lands on it.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    /// Fraction of the remaining distance covered per sample.
    coeff: f32,
    sample_rate: f32,
    /// `None` when the coefficient was given directly.
    smoothing_time_ms: Option<f32>,
}

impl SmoothedParam {
    /// Create an unsmoothed parameter (changes apply on the next sample).
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 48000.0,
            smoothing_time_ms: Some(0.0),
        }
    }

    /// Create a parameter with a smoothing time constant.
    ///
    /// `coeff = 1 - exp(-1 / (tau * sample_rate))`, so the value covers ~63%
    /// of a step in `smoothing_time_ms`.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = Some(smoothing_time_ms);
        param.recalculate_coeff();
        param
    }

    /// Create a parameter with a fixed per-sample coefficient.
    ///
    /// The coefficient is independent of sample rate. It is clamped to
    /// `(0, 1]`; values at or below zero would freeze the parameter.
    pub fn with_coeff(initial: f32, coeff: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: coeff.clamp(f32::MIN_POSITIVE, 1.0),
            sample_rate: 48000.0,
            smoothing_time_ms: None,
        }
    }

    /// Set the value to glide toward.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to `value` with no glide.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update the sample rate. Fixed-coefficient parameters are unaffected.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Switch to time-based smoothing with the given time constant.
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = Some(time_ms);
        self.recalculate_coeff();
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let remaining = self.target - self.current;
        let next = self.current + self.coeff * remaining;
        // rounding must not carry the value past the target
        self.current = if (self.target - next) * remaining < 0.0 {
            self.target
        } else {
            next
        };
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Per-sample coefficient.
    #[inline]
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// True once the value is within 1e-6 of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Jump to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    fn recalculate_coeff(&mut self) {
        let Some(time_ms) = self.smoothing_time_ms else {
            return;
        };
        self.coeff = if time_ms <= 0.0 || self.sample_rate <= 0.0 {
            1.0
        } else {
            let samples = time_ms / 1000.0 * self.sample_rate;
            1.0 - expf(-1.0 / samples)
        };
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
