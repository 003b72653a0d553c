//! Audio-rate oscillator.
//!
//! Phase accumulator with four classic shapes. Saw and square get a
//! two-sample polyBLEP correction at each discontinuity; sine and triangle
//! are generated directly.

use core::f32::consts::PI;
use libm::sinf;

/// Oscillator waveform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OscillatorWaveform {
    /// Pure fundamental.
    #[default]
    Sine,
    /// Odd harmonics falling at 12 dB/oct.
    Triangle,
    /// All harmonics.
    Saw,
    /// 50% duty square.
    Square,
}

/// Audio oscillator.
///
/// ```rust
/// use polypod_synth::{Oscillator, OscillatorWaveform};
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_waveform(OscillatorWaveform::Saw);
/// osc.set_frequency(220.0);
/// let s = osc.advance();
/// assert!(s.abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Phase in `[0, 1)`.
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    frequency: f32,
    waveform: OscillatorWaveform,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Oscillator {
    /// Sine at 440 Hz.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 440.0 / sample_rate,
            sample_rate,
            frequency: 440.0,
            waveform: OscillatorWaveform::Sine,
        }
    }

    /// Set frequency in Hz. Negative values are treated as 0.
    ///
    /// Frequencies at or above the sample rate are allowed (vibrato depth is
    /// unbounded); the phase wraps accordingly and the output aliases.
    #[inline]
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.max(0.0);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Select the waveform. Phase is kept.
    pub fn set_waveform(&mut self, waveform: OscillatorWaveform) {
        self.waveform = waveform;
    }

    /// Selected waveform.
    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Change sample rate keeping the frequency in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.phase_inc = self.frequency / sample_rate;
    }

    /// Restart at phase 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Current phase.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Output one sample and step the phase.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let t = self.phase;
        let dt = self.phase_inc;
        let out = match self.waveform {
            OscillatorWaveform::Sine => sinf(2.0 * PI * t),
            OscillatorWaveform::Triangle => {
                if t < 0.5 {
                    4.0 * t - 1.0
                } else {
                    3.0 - 4.0 * t
                }
            }
            OscillatorWaveform::Saw => 2.0 * t - 1.0 - poly_blep(t, dt),
            OscillatorWaveform::Square => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                let mut falling = t + 0.5;
                if falling >= 1.0 {
                    falling -= 1.0;
                }
                naive + poly_blep(t, dt) - poly_blep(falling, dt)
            }
        };

        self.phase += dt;
        if self.phase >= 1.0 {
            self.phase -= libm::floorf(self.phase);
        }
        out
    }
}

/// Two-sample polyBLEP residual for a unit step at phase 0.
///
/// Zero outside one sample either side of the wrap.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 || dt >= 0.5 {
        return 0.0;
    }
    if t < dt {
        let n = t / dt;
        n + n - n * n - 1.0
    } else if t > 1.0 - dt {
        let n = (t - 1.0) / dt;
        n * n + n + n + 1.0
    } else {
        0.0
    }
}
