//! Resonant state variable filter.
//!
//! Topology-preserving transform SVF (Zavalishin, "The Art of VA Filter
//! Design", ch. 3). The trapezoidal integrators keep the filter stable while
//! cutoff is swept every block, which is how the synth drives it from
//! controllers and knobs.

use core::f32::consts::PI;
use libm::tanf;

use crate::Effect;
use crate::flush_denormal;

/// Which response [`StateVariableFilter`] emits from [`Effect::process`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SvfOutput {
    /// Low-pass.
    #[default]
    Lowpass,
    /// High-pass.
    Highpass,
    /// Band-pass.
    Bandpass,
    /// Band-reject.
    Notch,
}

/// 2-pole (12 dB/oct) state variable filter.
///
/// ## Parameters
///
/// - `cutoff`: Hz, clamped to 20.0..=sr×0.49 (default 1000.0)
/// - `resonance`: Q, clamped to 0.5..=20.0 (default 0.707)
///
/// ```rust
/// use polypod_core::{Effect, StateVariableFilter};
///
/// let mut svf = StateVariableFilter::new(48000.0);
/// svf.set_cutoff(800.0);
/// svf.set_resonance(4.0);
/// let y = svf.process(0.5);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    ic1eq: f32,
    ic2eq: f32,
    g: f32,
    k: f32,
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    output_type: SvfOutput,
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StateVariableFilter {
    /// Low-pass filter at 1 kHz, Q 0.707.
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            sample_rate,
            cutoff: 1000.0,
            resonance: 0.707,
            output_type: SvfOutput::Lowpass,
        };
        svf.update_coefficients();
        svf
    }

    /// Set cutoff in Hz. Clamped to `[20, sample_rate * 0.49]`.
    pub fn set_cutoff(&mut self, freq: f32) {
        self.cutoff = freq.clamp(20.0, self.sample_rate * 0.49);
        self.update_coefficients();
    }

    /// Cutoff in Hz after clamping.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set Q. Clamped to `[0.5, 20]`.
    pub fn set_resonance(&mut self, q: f32) {
        self.resonance = q.clamp(0.5, 20.0);
        self.update_coefficients();
    }

    /// Q after clamping.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Select the response returned by `process`.
    pub fn set_output_type(&mut self, output_type: SvfOutput) {
        self.output_type = output_type;
    }

    /// Selected response.
    pub fn output_type(&self) -> SvfOutput {
        self.output_type
    }

    fn update_coefficients(&mut self) {
        self.g = tanf(PI * self.cutoff / self.sample_rate);
        self.k = 1.0 / self.resonance;
    }

    /// Process one sample and return `(lowpass, highpass, bandpass, notch)`.
    pub fn process_all(&mut self, input: f32) -> (f32, f32, f32, f32) {
        let v3 = input - self.ic2eq;
        let v1 = (self.g * v3 + self.ic1eq) / (1.0 + self.g * (self.g + self.k));
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = flush_denormal(2.0 * v1 - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        let lp = v2;
        let bp = v1;
        let hp = input - self.k * v1 - v2;
        (lp, hp, bp, lp + hp)
    }
}

impl Effect for StateVariableFilter {
    fn process(&mut self, input: f32) -> f32 {
        let (lp, hp, bp, notch) = self.process_all(input);
        match self.output_type {
            SvfOutput::Lowpass => lp,
            SvfOutput::Highpass => hp,
            SvfOutput::Bandpass => bp,
            SvfOutput::Notch => notch,
        }
    }

    fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff = self.cutoff.clamp(20.0, sample_rate * 0.49);
        self.update_coefficients();
    }
}
