//! Low frequency oscillator.
//!
//! Phase-accumulator modulation source. Unlike a plain unit-range LFO this one
//! carries an output amplitude, so the synth can read it directly as a
//! vibrato offset in Hz.

use core::f32::consts::PI;
use libm::sinf;

/// LFO waveform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Sine.
    #[default]
    Sine,
    /// Symmetric triangle.
    Triangle,
    /// Rising ramp.
    Saw,
    /// 50% pulse.
    Square,
}

/// Low frequency oscillator with amplitude.
///
/// Output is `amplitude * wave(phase)` with `wave` in `[-1, 1]`.
///
/// ```rust
/// use polypod_core::Lfo;
///
/// let mut lfo = Lfo::new(48000.0, 0.1);
/// lfo.set_amplitude(2.0);
/// let first = lfo.advance();
/// assert_eq!(first, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Phase in `[0, 1)`.
    phase: f32,
    phase_inc: f32,
    frequency: f32,
    sample_rate: f32,
    amplitude: f32,
    waveform: LfoWaveform,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Sine LFO at `freq_hz` with amplitude 1.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: freq_hz / sample_rate,
            frequency: freq_hz,
            sample_rate,
            amplitude: 1.0,
            waveform: LfoWaveform::Sine,
        }
    }

    /// Set rate in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz;
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Rate in Hz, as last set.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set peak output.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Peak output.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Select the waveform.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Selected waveform.
    pub fn waveform(&self) -> LfoWaveform {
        self.waveform
    }

    /// Restart from phase 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Set phase in `[0, 1)`.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase.clamp(0.0, 1.0) % 1.0;
    }

    /// Current phase.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Output the current value, then step one sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let wave = match self.waveform {
            LfoWaveform::Sine => sinf(self.phase * 2.0 * PI),
            LfoWaveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
            LfoWaveform::Saw => 2.0 * self.phase - 1.0,
            LfoWaveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase += self.phase_inc;
        // rates above the sample rate can step more than one cycle
        while self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        self.amplitude * wave
    }

    /// Keep the rate in Hz across a sample rate change.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_frequency(self.frequency);
    }
}
