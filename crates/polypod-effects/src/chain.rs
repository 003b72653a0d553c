//! The shared filter → reverb → delay chain every voice feeds.

use polypod_core::{Effect, StateVariableFilter};

use crate::{FeedbackDelay, StereoReverb};

/// Cutoff at power-on, Hz.
pub const DEFAULT_CUTOFF: f32 = 10_000.0;
/// Resonance at power-on, `0..=1`.
pub const DEFAULT_RESONANCE: f32 = 0.8;

/// Filter Q for a resonance setting in `[0, 1]`.
///
/// 0 is a flat Butterworth response (Q 0.707), 1 is close to self-oscillation
/// (Q 10).
#[inline]
pub fn resonance_to_q(resonance: f32) -> f32 {
    0.707 + resonance.clamp(0.0, 1.0) * 9.3
}

/// Mono in, stereo out.
///
/// Setters store the value they were given; the getters return it unchanged
/// so controller routing can be checked exactly. Clamping happens inside the
/// individual stages.
///
/// ```rust
/// use polypod_effects::EffectsChain;
///
/// let mut chain = EffectsChain::new(48000.0);
/// chain.set_cutoff(2000.0);
/// chain.set_reverb_mix(0.0);
/// let (l, r) = chain.process(0.1);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct EffectsChain {
    filter: StateVariableFilter,
    reverb: StereoReverb,
    delay: FeedbackDelay,
    cutoff: f32,
    resonance: f32,
    reverb_mix: f32,
    reverb_feedback: f32,
    delay_feedback: f32,
    effects_enabled: bool,
    sample_rate: f32,
}

impl EffectsChain {
    /// Create the chain with its power-on settings.
    pub fn new(sample_rate: f32) -> Self {
        let mut chain = Self {
            filter: StateVariableFilter::new(sample_rate),
            reverb: StereoReverb::new(sample_rate),
            delay: FeedbackDelay::new(sample_rate),
            cutoff: DEFAULT_CUTOFF,
            resonance: DEFAULT_RESONANCE,
            reverb_mix: StereoReverb::DEFAULT_MIX,
            reverb_feedback: StereoReverb::DEFAULT_FEEDBACK,
            delay_feedback: 0.0,
            effects_enabled: true,
            sample_rate,
        };
        chain.set_cutoff(DEFAULT_CUTOFF);
        chain.set_resonance(DEFAULT_RESONANCE);
        chain.set_delay_time(0.5);
        chain.delay.reset();
        chain
    }

    /// Filter cutoff in Hz.
    pub fn set_cutoff(&mut self, hz: f32) {
        self.cutoff = hz;
        self.filter.set_cutoff(hz);
    }

    /// Requested cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Filter resonance in `[0, 1]`.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance;
        self.filter.set_resonance(resonance_to_q(resonance));
    }

    /// Requested resonance.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Reverb wet/dry blend against the filter output.
    pub fn set_reverb_mix(&mut self, mix: f32) {
        self.reverb_mix = mix;
        self.reverb.set_mix(mix);
    }

    /// Requested reverb mix.
    pub fn reverb_mix(&self) -> f32 {
        self.reverb_mix
    }

    /// Reverb tail feedback in `[0, 1]`.
    pub fn set_reverb_feedback(&mut self, feedback: f32) {
        self.reverb_feedback = feedback;
        self.reverb.set_feedback(feedback);
    }

    /// Requested reverb feedback.
    pub fn reverb_feedback(&self) -> f32 {
        self.reverb_feedback
    }

    /// Delay feedback gain in `[0, 1]`.
    pub fn set_delay_feedback(&mut self, feedback: f32) {
        self.delay_feedback = feedback;
        self.delay.set_feedback(feedback);
    }

    /// Requested delay feedback.
    pub fn delay_feedback(&self) -> f32 {
        self.delay_feedback
    }

    /// Delay time as a fraction of one second; the length glides there.
    pub fn set_delay_time(&mut self, normalized: f32) {
        self.delay.set_target_length(self.sample_rate * normalized);
    }

    /// Delay time target as a fraction of one second.
    pub fn delay_time(&self) -> f32 {
        self.delay.target_length() / self.sample_rate
    }

    /// Delay length being glided toward, in samples.
    pub fn target_delay_length(&self) -> f32 {
        self.delay.target_length()
    }

    /// Delay length used by the last sample, in samples.
    pub fn current_delay_length(&self) -> f32 {
        self.delay.current_length()
    }

    /// Run reverb and delay, or copy the filter output to both channels.
    pub fn set_effects_enabled(&mut self, enabled: bool) {
        self.effects_enabled = enabled;
    }

    /// Whether reverb and delay run.
    pub fn effects_enabled(&self) -> bool {
        self.effects_enabled
    }

    /// The filter stage.
    pub fn filter(&self) -> &StateVariableFilter {
        &self.filter
    }

    /// The delay stage.
    pub fn delay(&self) -> &FeedbackDelay {
        &self.delay
    }

    /// Process one mono sample into a stereo frame.
    #[inline]
    pub fn process(&mut self, input: f32) -> (f32, f32) {
        let filtered = self.filter.process(input);
        if !self.effects_enabled {
            return (filtered, filtered);
        }
        let (l, r) = self.reverb.process_stereo(filtered, filtered);
        self.delay.process_stereo(l, r)
    }

    /// Rebuild every stage for a new sample rate, keeping settings.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.filter.set_sample_rate(sample_rate);
        self.filter.set_cutoff(self.cutoff);
        self.reverb.set_sample_rate(sample_rate);
        self.delay.set_sample_rate(sample_rate);
    }

    /// Clear all audio state.
    pub fn reset(&mut self) {
        self.filter.reset();
        self.reverb.reset();
        self.delay.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_settings() {
        let chain = EffectsChain::new(48000.0);
        assert_eq!(chain.cutoff(), 10_000.0);
        assert_eq!(chain.resonance(), 0.8);
        assert!((chain.filter().resonance() - resonance_to_q(0.8)).abs() < 1e-6);
        assert!(chain.effects_enabled());
        assert_eq!(chain.current_delay_length(), chain.target_delay_length());
    }

    #[test]
    fn getters_return_requested_values() {
        let mut chain = EffectsChain::new(48000.0);
        chain.set_cutoff(100_000.0);
        chain.set_resonance(0.5);
        chain.set_reverb_mix(0.3);
        chain.set_reverb_feedback(0.6);
        chain.set_delay_feedback(0.7);
        assert_eq!(chain.cutoff(), 100_000.0);
        assert!(chain.filter().cutoff() < 48000.0 * 0.5);
        assert_eq!(chain.resonance(), 0.5);
        assert_eq!(chain.reverb_mix(), 0.3);
        assert_eq!(chain.reverb_feedback(), 0.6);
        assert_eq!(chain.delay_feedback(), 0.7);
    }

    #[test]
    fn disabled_effects_copy_filter_output() {
        let mut chain = EffectsChain::new(48000.0);
        chain.set_reverb_mix(1.0);
        chain.set_effects_enabled(false);
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(DEFAULT_CUTOFF);
        svf.set_resonance(resonance_to_q(DEFAULT_RESONANCE));
        for i in 0..256 {
            let x = if i % 32 < 16 { 0.5 } else { -0.5 };
            let (l, r) = chain.process(x);
            assert_eq!(l, r);
            assert_eq!(l, svf.process(x));
        }
    }

    #[test]
    fn delay_time_is_fraction_of_a_second() {
        let mut chain = EffectsChain::new(44100.0);
        chain.set_delay_time(0.25);
        assert!((chain.target_delay_length() - 11025.0).abs() < 1e-3);
    }

    #[test]
    fn resonance_maps_to_q() {
        assert!((resonance_to_q(0.0) - 0.707).abs() < 1e-6);
        assert!((resonance_to_q(1.0) - 10.007).abs() < 1e-4);
        assert_eq!(resonance_to_q(3.0), resonance_to_q(1.0));
    }
}
