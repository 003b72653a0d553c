//! Everything needed to build a [`RenderLoop`](crate::RenderLoop).

use crate::modes::{ButtonAction, ModeTable};
use crate::param::{PARAM_COUNT, SynthParam};
use crate::router::{CcMap, DEFAULT_ATTACK_SCALE, DEFAULT_DETUNE_SCALE, ParameterRouter};

/// Frames per control update.
pub const DEFAULT_BLOCK_SIZE: usize = 4;

/// Engine construction settings.
///
/// ```rust
/// use polypod_engine::{EngineSettings, SynthParam};
///
/// let settings = EngineSettings::new(44100.0).with_initial(SynthParam::Cutoff, 800.0);
/// assert_eq!(settings.initial(SynthParam::Cutoff), 800.0);
/// assert_eq!(settings.initial(SynthParam::Sustain), 0.7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Output sample rate in Hz.
    pub sample_rate: f32,
    /// Frames rendered between control updates.
    pub block_size: usize,
    /// Restart envelopes from zero on trigger.
    pub hard_retrigger: bool,
    /// Run reverb and delay after the filter.
    pub effects_enabled: bool,
    /// Detune at controller value 127.
    pub detune_scale: f32,
    /// Attack seconds at controller value 127.
    pub attack_scale: f32,
    /// Power-on values that differ from the parameter defaults.
    pub overrides: [Option<f32>; PARAM_COUNT],
    /// Controller routing.
    pub cc_map: CcMap,
    /// Knob bindings and LED colours per mode.
    pub modes: ModeTable,
    /// Button 1 and button 2 actions.
    pub buttons: [ButtonAction; 2],
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl EngineSettings {
    /// Defaults at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            block_size: DEFAULT_BLOCK_SIZE,
            hard_retrigger: false,
            effects_enabled: true,
            detune_scale: DEFAULT_DETUNE_SCALE,
            attack_scale: DEFAULT_ATTACK_SCALE,
            overrides: [None; PARAM_COUNT],
            cc_map: CcMap::firmware(),
            modes: ModeTable::default(),
            buttons: [ButtonAction::None; 2],
        }
    }

    /// Behave like the pod firmware: only the LFO mode moves anything and
    /// the effects stage is off.
    pub fn reference(sample_rate: f32) -> Self {
        Self {
            effects_enabled: false,
            modes: ModeTable::reference(),
            ..Self::new(sample_rate)
        }
    }

    /// Set a power-on value.
    #[must_use]
    pub fn with_initial(mut self, param: SynthParam, value: f32) -> Self {
        self.overrides[param.index()] = Some(value);
        self
    }

    /// Power-on value of `param`: the override if any, else its default.
    pub fn initial(&self, param: SynthParam) -> f32 {
        self.overrides[param.index()].unwrap_or(param.descriptor().default)
    }

    /// Router over this map and these scales.
    pub fn router(&self) -> ParameterRouter {
        ParameterRouter::new(self.cc_map.clone()).with_scales(self.detune_scale, self.attack_scale)
    }
}
