//! Stereo algorithmic reverb.
//!
//! Freeverb layout per channel: eight parallel damped combs summed and
//! averaged, then four allpasses in series. The right channel's delay lines
//! are longer by a fixed spread so the two sides decorrelate.

use libm::roundf;
use polypod_core::{AllpassFilter, CombFilter, Effect, SmoothedParam, wet_dry_mix};

/// Freeverb comb filter delay times (at 44.1kHz reference).
/// These are mutually prime to avoid resonances.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Freeverb allpass filter delay times (at 44.1kHz reference).
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Extra delay of every right-channel line (at 44.1kHz reference).
pub const STEREO_SPREAD_44K: usize = 23;

/// Reference sample rate for tuning constants.
const REFERENCE_RATE: f32 = 44100.0;

/// Fixed high-frequency damping inside the comb loops.
const DAMPING: f32 = 0.5;

/// Scale delay times from reference rate to target rate.
fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    (roundf(samples as f32 * target_rate / REFERENCE_RATE) as usize).max(1)
}

/// Comb loop gain for a feedback setting in `[0, 1]`.
///
/// Maps onto `0.28..=0.98`, the usable Freeverb room range.
#[inline]
fn comb_feedback(feedback: f32) -> f32 {
    0.28 + feedback.clamp(0.0, 1.0) * 0.7
}

/// One side of the reverb.
#[derive(Debug, Clone)]
struct Tank {
    combs: [CombFilter; 8],
    allpasses: [AllpassFilter; 4],
}

impl Tank {
    fn new(sample_rate: f32, spread: usize) -> Self {
        let combs = core::array::from_fn(|i| {
            let mut comb = CombFilter::new(scale_to_rate(COMB_TUNINGS_44K[i] + spread, sample_rate));
            comb.set_damp(DAMPING);
            comb
        });
        let allpasses = core::array::from_fn(|i| {
            let mut ap =
                AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS_44K[i] + spread, sample_rate));
            ap.set_feedback(0.5);
            ap
        });
        Self { combs, allpasses }
    }

    fn set_feedback(&mut self, gain: f32) {
        for comb in &mut self.combs {
            comb.set_feedback(gain);
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut comb_sum = 0.0f32;
        for comb in &mut self.combs {
            comb_sum += comb.process(input);
        }
        comb_sum *= 0.125;

        let mut diffused = comb_sum;
        for allpass in &mut self.allpasses {
            diffused = allpass.process(diffused);
        }
        diffused
    }

    fn clear(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
    }
}

/// Stereo Freeverb with feedback and wet/dry mix.
///
/// # Parameters
///
/// - `feedback`: 0.0-1.0, tail length (comb loop gain 0.28-0.98)
/// - `mix`: 0.0-1.0, wet/dry balance
///
/// Both are smoothed over a few milliseconds.
///
/// # Example
///
/// ```rust
/// use polypod_core::Effect;
/// use polypod_effects::StereoReverb;
///
/// let mut reverb = StereoReverb::new(48000.0);
/// reverb.set_feedback(0.85);
/// reverb.set_mix(0.3);
///
/// let (l, r) = reverb.process_stereo(0.5, 0.5);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct StereoReverb {
    left: Tank,
    right: Tank,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    sample_rate: f32,
    /// Comb gain last pushed into the tanks.
    cached_gain: f32,
}

impl StereoReverb {
    /// Default feedback setting.
    pub const DEFAULT_FEEDBACK: f32 = 0.85;
    /// Default wet/dry mix.
    pub const DEFAULT_MIX: f32 = 0.25;

    /// Create a reverb at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            left: Tank::new(sample_rate, 0),
            right: Tank::new(sample_rate, STEREO_SPREAD_44K),
            feedback: SmoothedParam::with_config(Self::DEFAULT_FEEDBACK, sample_rate, 20.0),
            mix: SmoothedParam::with_config(Self::DEFAULT_MIX, sample_rate, 10.0),
            sample_rate,
            cached_gain: -1.0,
        };
        reverb.update_comb_params();
        reverb
    }

    /// Set the feedback (0.0 to 1.0).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(feedback.clamp(0.0, 1.0));
    }

    /// Get the target feedback.
    pub fn feedback(&self) -> f32 {
        self.feedback.target()
    }

    /// Set the wet/dry mix (0.0 to 1.0).
    ///
    /// - 0.0 = fully dry (no reverb)
    /// - 1.0 = fully wet (only reverb)
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Get the target mix.
    pub fn mix(&self) -> f32 {
        self.mix.target()
    }

    fn update_comb_params(&mut self) {
        let gain = comb_feedback(self.feedback.get());
        if (gain - self.cached_gain).abs() < 0.001 {
            return;
        }
        self.cached_gain = gain;
        self.left.set_feedback(gain);
        self.right.set_feedback(gain);
    }
}

impl Effect for StereoReverb {
    /// Mono use: left tank only.
    fn process(&mut self, input: f32) -> f32 {
        self.feedback.advance();
        let mix = self.mix.advance();
        self.update_comb_params();
        wet_dry_mix(input, self.left.process(input), mix)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.feedback.advance();
        let mix = self.mix.advance();
        self.update_comb_params();

        let wet_l = self.left.process(left);
        let wet_r = self.right.process(right);
        (wet_dry_mix(left, wet_l, mix), wet_dry_mix(right, wet_r, mix))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.left = Tank::new(sample_rate, 0);
        self.right = Tank::new(sample_rate, STEREO_SPREAD_44K);
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);

        self.cached_gain = -1.0;
        self.update_comb_params();
    }

    fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();

        self.cached_gain = -1.0;
        self.update_comb_params();
    }
}
