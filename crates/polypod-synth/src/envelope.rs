//! Gate-driven ADSR envelope.
//!
//! The envelope is advanced once per sample with the current gate. A rising
//! gate starts the attack, a falling gate starts the release; the level is
//! never reset by the gate itself, so a note that is re-struck while
//! releasing glides up from where it was.
//!
//! Curves are one-pole exponentials. The attack aims past full scale
//! (`ATTACK_TARGET`) so it reaches 1.0 in finite time with a snappy shoulder.

use libm::expf;

/// Level the attack curve aims at.
const ATTACK_TARGET: f32 = 1.2;

/// Below this the release is considered finished.
const SILENCE: f32 = 0.0001;

/// Envelope stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Output is zero.
    #[default]
    Idle,
    /// Rising toward full scale.
    Attack,
    /// Falling from full scale toward sustain.
    Decay,
    /// Holding the sustain level while the gate is high.
    Sustain,
    /// Falling to zero after the gate dropped.
    Release,
}

/// ADSR envelope generator with times in seconds.
///
/// Defaults: attack 0.1 s, decay 0.1 s, sustain 0.7, release 0.1 s.
///
/// ```rust
/// use polypod_synth::{AdsrEnvelope, EnvelopeState};
///
/// let mut env = AdsrEnvelope::new(48000.0);
/// env.process(true);
/// assert_eq!(env.state(), EnvelopeState::Attack);
/// for _ in 0..96000 {
///     env.process(true);
/// }
/// assert_eq!(env.state(), EnvelopeState::Sustain);
/// env.process(false);
/// assert_eq!(env.state(), EnvelopeState::Release);
/// ```
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    state: EnvelopeState,
    level: f32,
    gate: bool,
    sample_rate: f32,

    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    attack_coeff: f32,
    decay_coeff: f32,
    release_coeff: f32,
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl AdsrEnvelope {
    /// Idle envelope with default times.
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            state: EnvelopeState::Idle,
            level: 0.0,
            gate: false,
            sample_rate,
            attack: 0.1,
            decay: 0.1,
            sustain: 0.7,
            release: 0.1,
            attack_coeff: 0.0,
            decay_coeff: 0.0,
            release_coeff: 0.0,
        };
        env.recalculate_coefficients();
        env
    }

    /// Attack time in seconds. Negative values are treated as 0.
    pub fn set_attack(&mut self, seconds: f32) {
        self.attack = seconds.max(0.0);
        self.attack_coeff = self.coeff(self.attack);
    }

    /// Attack time in seconds.
    pub fn attack(&self) -> f32 {
        self.attack
    }

    /// Decay time in seconds.
    pub fn set_decay(&mut self, seconds: f32) {
        self.decay = seconds.max(0.0);
        self.decay_coeff = self.coeff(self.decay);
    }

    /// Decay time in seconds.
    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Sustain level, clamped to `[0, 1]`.
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = level.clamp(0.0, 1.0);
    }

    /// Sustain level.
    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    /// Release time in seconds.
    pub fn set_release(&mut self, seconds: f32) {
        self.release = seconds.max(0.0);
        self.release_coeff = self.coeff(self.release);
    }

    /// Release time in seconds.
    pub fn release(&self) -> f32 {
        self.release
    }

    /// Change sample rate keeping the times in seconds.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Restart the attack regardless of the current stage.
    ///
    /// A soft retrigger keeps the current level; a hard one drops to zero
    /// first.
    pub fn retrigger(&mut self, hard: bool) {
        if hard {
            self.level = 0.0;
        }
        self.state = EnvelopeState::Attack;
    }

    /// Force idle and silent.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 0.0;
        self.gate = false;
    }

    /// Current stage.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// True unless idle.
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Idle
    }

    /// Advance one sample with `gate` and return the level.
    #[inline]
    pub fn process(&mut self, gate: bool) -> f32 {
        if gate && !self.gate {
            self.state = EnvelopeState::Attack;
        } else if !gate && self.gate && self.state != EnvelopeState::Idle {
            self.state = EnvelopeState::Release;
        }
        self.gate = gate;

        match self.state {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }
            EnvelopeState::Attack => {
                self.level = ATTACK_TARGET + (self.level - ATTACK_TARGET) * self.attack_coeff;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.state = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                self.level = self.sustain + (self.level - self.sustain) * self.decay_coeff;
                if (self.level - self.sustain).abs() < SILENCE {
                    self.level = self.sustain;
                    self.state = EnvelopeState::Sustain;
                }
            }
            EnvelopeState::Sustain => {
                self.level = self.sustain;
            }
            EnvelopeState::Release => {
                self.level *= self.release_coeff;
                if self.level < SILENCE {
                    self.level = 0.0;
                    self.state = EnvelopeState::Idle;
                }
            }
        }

        self.level
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = self.coeff(self.attack);
        self.decay_coeff = self.coeff(self.decay);
        self.release_coeff = self.coeff(self.release);
    }

    /// `exp(-1 / samples)`, so a stage covers ~63% of its distance in its time.
    fn coeff(&self, seconds: f32) -> f32 {
        let samples = seconds * self.sample_rate;
        expf(-1.0 / samples.max(1.0))
    }
}
