//! What the knobs and buttons do in each control mode.

use polypod_core::ParamScale;
use polypod_platform::{ControlMode, MODE_COUNT, Rgb};

use crate::SynthParam;

/// One knob's mapping onto a parameter range.
///
/// ```rust
/// use polypod_core::ParamScale;
/// use polypod_engine::{KnobBinding, SynthParam};
///
/// let cutoff = KnobBinding::new(SynthParam::Cutoff, 100.0, 20000.0, ParamScale::Logarithmic);
/// assert!((cutoff.value_at(0.0) - 100.0).abs() < 1e-3);
/// assert!((cutoff.value_at(1.0) - 20000.0).abs() < 1e-1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobBinding {
    /// Parameter the knob sets.
    pub param: SynthParam,
    /// Value at the counter-clockwise stop.
    pub min: f32,
    /// Value at the clockwise stop.
    pub max: f32,
    /// Knob travel curve.
    pub scale: ParamScale,
}

impl KnobBinding {
    /// Bind `param` over `min..=max`.
    pub const fn new(param: SynthParam, min: f32, max: f32, scale: ParamScale) -> Self {
        Self {
            param,
            min,
            max,
            scale,
        }
    }

    /// Linear binding.
    pub const fn linear(param: SynthParam, min: f32, max: f32) -> Self {
        Self::new(param, min, max, ParamScale::Linear)
    }

    /// Parameter value for a knob reading in `[0, 1]`.
    ///
    /// Logarithmic: `exp(ln(min) + k * (ln(max) - ln(min)))`, which needs
    /// `min > 0`; bindings that break that fall back to linear.
    pub fn value_at(&self, knob: f32) -> f32 {
        let k = knob.clamp(0.0, 1.0);
        match self.scale {
            ParamScale::Logarithmic if self.min > 0.0 && self.max > 0.0 => {
                self.min * libm::powf(self.max / self.min, k)
            }
            ParamScale::Power(exp) => self.min + libm::powf(k, exp) * (self.max - self.min),
            _ => self.min + k * (self.max - self.min),
        }
    }
}

/// LED colour and knob bindings of one mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeBinding {
    /// LED 1 colour while the mode is active.
    pub color: Rgb,
    /// Knob 1 and knob 2; `None` leaves the knob inert.
    pub knobs: [Option<KnobBinding>; 2],
}

impl ModeBinding {
    /// A mode with the standard colour and inert knobs.
    pub const fn inert(mode: ControlMode) -> Self {
        Self {
            color: mode.color(),
            knobs: [None, None],
        }
    }

    /// A mode with the standard colour and the given knobs.
    pub const fn with_knobs(mode: ControlMode, knob1: KnobBinding, knob2: KnobBinding) -> Self {
        Self {
            color: mode.color(),
            knobs: [Some(knob1), Some(knob2)],
        }
    }
}

/// Knob 1 in VCO mode: profile index.
pub const VCO_PROFILE: KnobBinding = KnobBinding::linear(SynthParam::Profile, 0.0, 2.0);
/// Knob 2 in VCO mode: detune.
pub const VCO_DETUNE: KnobBinding = KnobBinding::linear(SynthParam::Detune, 0.01, 2.0);
/// Knob 1 in filter mode: cutoff.
pub const FILTER_CUTOFF: KnobBinding =
    KnobBinding::new(SynthParam::Cutoff, 100.0, 20000.0, ParamScale::Logarithmic);
/// Knob 2 in filter mode: resonance.
pub const FILTER_RESONANCE: KnobBinding = KnobBinding::linear(SynthParam::Resonance, 0.0, 1.0);
/// Knob 1 in envelope mode: attack.
pub const ENVELOPE_ATTACK: KnobBinding = KnobBinding::linear(SynthParam::Attack, 0.0, 1.0);
/// Knob 2 in envelope mode: release.
pub const ENVELOPE_RELEASE: KnobBinding = KnobBinding::linear(SynthParam::Release, 0.0, 1.0);
/// Knob 1 in LFO mode: rate.
pub const LFO_RATE: KnobBinding =
    KnobBinding::new(SynthParam::LfoFrequency, 0.25, 1000.0, ParamScale::Logarithmic);
/// Knob 2 in LFO mode: depth.
pub const LFO_DEPTH: KnobBinding = KnobBinding::linear(SynthParam::LfoAmplitude, 0.0, 100.0);

/// Bindings for every mode.
///
/// ```rust
/// use polypod_engine::{ModeTable, SynthParam};
/// use polypod_platform::ControlMode;
///
/// let table = ModeTable::default();
/// let filter = table.binding(ControlMode::Filter);
/// assert_eq!(filter.knobs[0].map(|k| k.param), Some(SynthParam::Cutoff));
///
/// let reference = ModeTable::reference();
/// assert!(reference.binding(ControlMode::Filter).knobs[0].is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeTable {
    modes: [ModeBinding; MODE_COUNT],
}

impl Default for ModeTable {
    /// Every mode live.
    fn default() -> Self {
        Self {
            modes: [
                ModeBinding::with_knobs(ControlMode::Vco, VCO_PROFILE, VCO_DETUNE),
                ModeBinding::with_knobs(ControlMode::Filter, FILTER_CUTOFF, FILTER_RESONANCE),
                ModeBinding::with_knobs(ControlMode::Envelope, ENVELOPE_ATTACK, ENVELOPE_RELEASE),
                ModeBinding::with_knobs(ControlMode::Lfo, LFO_RATE, LFO_DEPTH),
            ],
        }
    }
}

impl ModeTable {
    /// The firmware's behaviour: only the LFO mode moves anything.
    pub fn reference() -> Self {
        Self {
            modes: [
                ModeBinding::inert(ControlMode::Vco),
                ModeBinding::inert(ControlMode::Filter),
                ModeBinding::inert(ControlMode::Envelope),
                ModeBinding::with_knobs(ControlMode::Lfo, LFO_RATE, LFO_DEPTH),
            ],
        }
    }

    /// Bindings of `mode`.
    pub fn binding(&self, mode: ControlMode) -> &ModeBinding {
        &self.modes[mode.index()]
    }

    /// Replace the bindings of `mode`.
    pub fn set_binding(&mut self, mode: ControlMode, binding: ModeBinding) {
        self.modes[mode.index()] = binding;
    }

    /// LED 1 colours in mode order.
    pub fn colors(&self) -> [Rgb; MODE_COUNT] {
        core::array::from_fn(|i| self.modes[i].color)
    }
}

/// What a button does on its rising edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonAction {
    /// Nothing.
    #[default]
    None,
    /// Free every voice.
    AllNotesOff,
    /// Step to the next voice profile.
    NextProfile,
    /// Switch the reverb and delay stage on or off.
    ToggleEffects,
}

impl ButtonAction {
    /// All actions.
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::AllNotesOff,
        Self::NextProfile,
        Self::ToggleEffects,
    ];

    /// Name used in configuration files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::AllNotesOff => "all_notes_off",
            Self::NextProfile => "next_profile",
            Self::ToggleEffects => "toggle_effects",
        }
    }

    /// Parse a name produced by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}
