//! Property-based tests for the effects stage.
//!
//! Delay-length smoothing is monotonic and never overshoots; the chain stays
//! finite and bounded for any settings and input.

use polypod_core::Effect;
use polypod_effects::{EffectsChain, FeedbackDelay};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A step change in the target length is approached monotonically and
    /// the current length never passes the target.
    #[test]
    fn delay_length_converges_monotonically(
        start in 0.0f32..48000.0,
        target in 0.0f32..48000.0,
        steps in 1usize..4000,
    ) {
        let mut delay = FeedbackDelay::new(48000.0);
        delay.set_length_immediate(start);
        delay.set_target_length(target);

        let mut prev = start;
        for _ in 0..steps {
            delay.process_stereo(0.0, 0.0);
            let now = delay.current_length();
            if target >= start {
                prop_assert!(now >= prev, "moved away: {} -> {}", prev, now);
                prop_assert!(now <= target, "overshot: {} > {}", now, target);
            } else {
                prop_assert!(now <= prev, "moved away: {} -> {}", prev, now);
                prop_assert!(now >= target, "overshot: {} < {}", now, target);
            }
            prev = now;
        }
    }

    /// Retargeting mid-glide keeps the length between its old value and the
    /// new target.
    #[test]
    fn retarget_mid_glide_stays_bounded(
        first in 0.0f32..48000.0,
        second in 0.0f32..48000.0,
        split in 1usize..2000,
    ) {
        let mut delay = FeedbackDelay::new(48000.0);
        delay.set_target_length(first);
        for _ in 0..split {
            delay.process(0.0);
        }
        let from = delay.current_length();
        delay.set_target_length(second);
        let (lo, hi) = if from <= second { (from, second) } else { (second, from) };
        for _ in 0..2000 {
            delay.process(0.0);
            let now = delay.current_length();
            prop_assert!(now >= lo && now <= hi, "{} outside [{}, {}]", now, lo, hi);
        }
    }

    /// Any chain settings short of unity delay feedback keep the output
    /// finite and bounded.
    #[test]
    fn chain_output_finite(
        input in prop::collection::vec(-1.0f32..=1.0, 64..512),
        cutoff in 20.0f32..20000.0,
        resonance in 0.0f32..=1.0,
        reverb_mix in 0.0f32..=1.0,
        reverb_feedback in 0.0f32..=1.0,
        delay_feedback in 0.0f32..0.99,
        delay_time in 0.0f32..=1.0,
        enabled in any::<bool>(),
    ) {
        let mut chain = EffectsChain::new(48000.0);
        chain.set_cutoff(cutoff);
        chain.set_resonance(resonance);
        chain.set_reverb_mix(reverb_mix);
        chain.set_reverb_feedback(reverb_feedback);
        chain.set_delay_feedback(delay_feedback);
        chain.set_delay_time(delay_time);
        chain.set_effects_enabled(enabled);

        for &x in &input {
            let (l, r) = chain.process(x);
            prop_assert!(l.is_finite() && r.is_finite());
            prop_assert!(l.abs() < 1000.0 && r.abs() < 1000.0, "({}, {})", l, r);
        }
    }
}
