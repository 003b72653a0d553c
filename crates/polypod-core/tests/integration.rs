//! Signal-level tests for polypod-core primitives.
//!
//! Sine analysis for the filter, sample-accurate delay checks, LFO shape and
//! the delay-length glide used by the effects chain.

use polypod_core::{
    AllpassFilter, CombFilter, Effect, InterpolatedDelay, Lfo, LfoWaveform, SmoothedParam,
    StateVariableFilter, SvfOutput, midi_to_freq,
};

const SAMPLE_RATE: f32 = 48000.0;
const TAU: f32 = core::f32::consts::TAU;

fn generate_sine(freq_hz: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|n| libm::sinf(TAU * freq_hz * n as f32 / SAMPLE_RATE))
        .collect()
}

fn rms(signal: &[f32]) -> f32 {
    let sum_sq: f32 = signal.iter().map(|&s| s * s).sum();
    libm::sqrtf(sum_sq / signal.len() as f32)
}

fn to_db(linear: f32) -> f32 {
    20.0 * libm::log10f(linear.max(1e-10))
}

fn svf_gain_db(svf: &mut StateVariableFilter, freq_hz: f32) -> f32 {
    let input = generate_sine(freq_hz, 9600);
    svf.reset();
    let output: Vec<f32> = input.iter().map(|&s| svf.process(s)).collect();
    to_db(rms(&output[4800..]) / rms(&input[4800..]))
}

// ============================================================================
// Filter response
// ============================================================================

#[test]
fn svf_lowpass_response() {
    let mut svf = StateVariableFilter::new(SAMPLE_RATE);
    svf.set_cutoff(1000.0);
    svf.set_resonance(0.707);

    let pass = svf_gain_db(&mut svf, 100.0);
    let corner = svf_gain_db(&mut svf, 1000.0);
    let stop = svf_gain_db(&mut svf, 10000.0);

    assert!(pass.abs() < 0.5, "passband {pass} dB");
    assert!((corner + 3.0).abs() < 1.0, "corner {corner} dB");
    assert!(stop < -35.0, "stopband {stop} dB");
}

#[test]
fn svf_resonance_peaks_at_cutoff() {
    let mut svf = StateVariableFilter::new(SAMPLE_RATE);
    svf.set_cutoff(1000.0);
    svf.set_resonance(8.0);
    let peak = svf_gain_db(&mut svf, 1000.0);
    assert!(peak > 15.0, "resonant peak {peak} dB");
}

#[test]
fn svf_highpass_blocks_dc() {
    let mut svf = StateVariableFilter::new(SAMPLE_RATE);
    svf.set_output_type(SvfOutput::Highpass);
    let mut out = 1.0;
    for _ in 0..10_000 {
        out = svf.process(1.0);
    }
    assert!(out.abs() < 1e-3, "dc leak {out}");
}

#[test]
fn svf_tracks_cc_derived_cutoff() {
    // a controller at 127 asks for ~12.5 kHz; the filter must accept it as is
    let mut svf = StateVariableFilter::new(SAMPLE_RATE);
    let cutoff = midi_to_freq(127.0);
    svf.set_cutoff(cutoff);
    assert!((svf.cutoff() - cutoff).abs() < 1e-3);
}

// ============================================================================
// Delay lines
// ============================================================================

#[test]
fn delay_sample_accurate() {
    let mut delay = InterpolatedDelay::new(1024);
    let mut out = Vec::new();
    for i in 0..600 {
        let x = if i == 0 { 1.0 } else { 0.0 };
        out.push(delay.read_write(x, 499.0));
    }
    let pos = out.iter().position(|&v| v == 1.0);
    assert_eq!(pos, Some(500));
}

#[test]
fn comb_and_allpass_chain_is_finite() {
    let mut comb = CombFilter::new(1557);
    comb.set_feedback(0.84);
    comb.set_damp(0.2);
    let mut ap = AllpassFilter::new(556);
    let input = generate_sine(220.0, 48000);
    for &s in &input {
        assert!(ap.process(comb.process(s)).is_finite());
    }
}

// ============================================================================
// LFO
// ============================================================================

#[test]
fn lfo_sine_quarter_period() {
    let mut lfo = Lfo::new(SAMPLE_RATE, 1.0);
    lfo.set_amplitude(1.0);
    for _ in 0..12000 {
        lfo.advance();
    }
    // phase is now 0.25
    assert!((lfo.advance() - 1.0).abs() < 1e-3);
}

#[test]
fn lfo_square_alternates() {
    // 64 samples per cycle keeps the phase increment exact
    let mut lfo = Lfo::new(SAMPLE_RATE, 750.0);
    lfo.set_waveform(LfoWaveform::Square);
    let first_half: Vec<f32> = (0..32).map(|_| lfo.advance()).collect();
    let second_half: Vec<f32> = (0..32).map(|_| lfo.advance()).collect();
    assert!(first_half.iter().all(|&v| v == 1.0));
    assert!(second_half.iter().all(|&v| v == -1.0));
}

// ============================================================================
// Delay length glide
// ============================================================================

#[test]
fn delay_length_glide_takes_seconds() {
    let mut length = SmoothedParam::with_coeff(0.0, 0.00007);
    length.set_target(48000.0);
    for _ in 0..48000 {
        length.advance();
    }
    // 1 - (1 - 7e-5)^48000 = ~0.965
    let reached = length.get() / 48000.0;
    assert!((reached - 0.965).abs() < 0.01, "reached {reached}");
}
