//! Property-based tests for polypod-core primitives.
//!
//! Filter stability, smoothing convergence and delay line integrity under
//! randomized inputs.

use proptest::prelude::*;
use polypod_core::{
    CombFilter, Effect, InterpolatedDelay, Lfo, ParamDescriptor, SmoothedParam,
    StateVariableFilter, SvfOutput,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Any cutoff and Q the router can produce keeps the SVF finite.
    #[test]
    fn svf_stability(
        freq in 1.0f32..30000.0f32,
        q in 0.1f32..30.0f32,
        output_mode in 0usize..4,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(freq);
        svf.set_resonance(q);
        let mode = match output_mode {
            0 => SvfOutput::Lowpass,
            1 => SvfOutput::Highpass,
            2 => SvfOutput::Bandpass,
            _ => SvfOutput::Notch,
        };
        svf.set_output_type(mode);

        for _ in 0..32 {
            for &sample in &input {
                let out = svf.process(sample);
                prop_assert!(
                    out.is_finite(),
                    "SVF {:?} (freq={}, q={}) produced {} for input {}",
                    mode, freq, q, out, sample
                );
            }
        }
    }

    /// Fixed-coefficient smoothing is monotonic and never crosses the target.
    #[test]
    fn smoothing_never_overshoots(
        initial in -48000.0f32..48000.0f32,
        target in -48000.0f32..48000.0f32,
        coeff in 0.00001f32..=1.0f32,
    ) {
        let mut param = SmoothedParam::with_coeff(initial, coeff);
        param.set_target(target);
        let mut prev = initial;
        for _ in 0..2000 {
            let v = param.advance();
            if target >= initial {
                prop_assert!(v >= prev && v <= target, "{} -> {} (target {})", prev, v, target);
            } else {
                prop_assert!(v <= prev && v >= target, "{} -> {} (target {})", prev, v, target);
            }
            prev = v;
        }
    }

    /// Integer reads return exactly what was written.
    #[test]
    fn delay_line_integrity(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 1..=64),
    ) {
        let n = samples.len();
        let mut delay = InterpolatedDelay::new(n + 2);
        for &s in &samples {
            delay.write(s);
        }
        for (i, &expected) in samples.iter().rev().enumerate() {
            let got = delay.read(i as f32);
            prop_assert_eq!(got, expected, "delay {}", i);
        }
    }

    /// Fractional reads stay between their two neighbours.
    #[test]
    fn fractional_read_is_bounded(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 4..=64),
        position in 0.0f32..1.0f32,
    ) {
        let mut delay = InterpolatedDelay::new(samples.len() + 2);
        for &s in &samples {
            delay.write(s);
        }
        let d = position * (samples.len() - 1) as f32;
        let whole = d as usize;
        let a = delay.read(whole as f32);
        let b = delay.read((whole + 1) as f32);
        let v = delay.read(d);
        prop_assert!(v >= a.min(b) - 1e-6 && v <= a.max(b) + 1e-6);
    }

    /// A comb at any legal feedback decays after the input stops.
    #[test]
    fn comb_is_bounded(
        length in 1usize..2000,
        feedback in 0.0f32..=1.0f32,
        damp in 0.0f32..=1.0f32,
    ) {
        let mut comb = CombFilter::new(length);
        comb.set_feedback(feedback);
        comb.set_damp(damp);
        comb.process(1.0);
        for _ in 0..(length * 20) {
            let out = comb.process(0.0);
            prop_assert!(out.is_finite() && out.abs() <= 1.0 + 1e-4, "comb output {}", out);
        }
    }

    /// LFO output never exceeds its amplitude.
    #[test]
    fn lfo_is_bounded_by_amplitude(
        freq in 0.0f32..1000.0f32,
        amp in 0.0f32..100.0f32,
    ) {
        let mut lfo = Lfo::new(48000.0, freq);
        lfo.set_amplitude(amp);
        for _ in 0..4096 {
            prop_assert!(lfo.advance().abs() <= amp + 1e-4);
        }
    }

    /// Log-scaled descriptors map the unit interval into their range.
    #[test]
    fn log_denormalize_in_range(n in 0.0f32..=1.0f32) {
        let desc = ParamDescriptor::frequency("Cutoff", "Cut", "cutoff", 100.0, 20000.0, 1000.0);
        let v = desc.denormalize(n);
        prop_assert!((100.0 - 1e-2..=20000.0 + 1.0).contains(&v), "{} -> {}", n, v);
    }
}
