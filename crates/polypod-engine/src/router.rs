//! Controller routing.
//!
//! A [`CcMap`] says which parameter a controller number drives; the
//! [`ParameterRouter`] turns the 7-bit value into the parameter's plain value
//! and applies it to the engine. The router holds no mutable state.
//!
//! Default map:
//!
//! | CC  | Parameter | Value |
//! |-----|-----------|-------|
//! | 96  | profile | `round(norm * 3)`, clamped to the last profile |
//! | 105 | detune | `norm * detune_scale` |
//! | 97  | cutoff | `midi_to_freq(value)` Hz |
//! | 106 | resonance | `norm` |
//! | 98  | attack | `norm * attack_scale` s |
//! | 107 | decay | `norm` s |
//! | 99  | sustain | `norm` |
//! | 108 | release | `norm` s |
//! | 100 | lfo_frequency | `norm * 100` Hz |
//! | 109 | lfo_amplitude | `norm * 100` Hz |
//! | 101 | reverb_mix | `norm` |
//! | 110 | reverb_feedback | `norm` |
//! | 102 | delay_feedback | `norm` |
//! | 111 | delay_time | `norm` s |
//!
//! `norm = value / 127`.

use polypod_core::{cc_to_unit, midi_to_freq};
use polypod_synth::Profile;

use crate::SynthParam;
use crate::engine::SynthEngine;

/// Default detune range for the detune controller.
pub const DEFAULT_DETUNE_SCALE: f32 = 4.0;
/// Default attack range in seconds for the attack controller.
pub const DEFAULT_ATTACK_SCALE: f32 = 2.0;
/// Full-scale LFO rate and depth for their controllers.
pub const LFO_CC_SCALE: f32 = 100.0;

/// Controller number to parameter table.
///
/// ```rust
/// use polypod_engine::{CcMap, SynthParam};
///
/// let map = CcMap::default();
/// assert_eq!(map.get(97), Some(SynthParam::Cutoff));
/// assert_eq!(map.get(1), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcMap {
    table: [Option<SynthParam>; 128],
}

impl CcMap {
    /// A map with nothing bound.
    pub const fn empty() -> Self {
        Self { table: [None; 128] }
    }

    /// The pod firmware's controller assignments.
    pub fn firmware() -> Self {
        let mut map = Self::empty();
        for (controller, param) in [
            (96, SynthParam::Profile),
            (105, SynthParam::Detune),
            (97, SynthParam::Cutoff),
            (106, SynthParam::Resonance),
            (98, SynthParam::Attack),
            (107, SynthParam::Decay),
            (99, SynthParam::Sustain),
            (108, SynthParam::Release),
            (100, SynthParam::LfoFrequency),
            (109, SynthParam::LfoAmplitude),
            (101, SynthParam::ReverbMix),
            (110, SynthParam::ReverbFeedback),
            (102, SynthParam::DelayFeedback),
            (111, SynthParam::DelayTime),
        ] {
            map.bind(controller, param);
        }
        map
    }

    /// Route `controller` to `param`, replacing any earlier binding.
    pub fn bind(&mut self, controller: u8, param: SynthParam) {
        self.table[usize::from(controller & 0x7F)] = Some(param);
    }

    /// Remove the binding for `controller`.
    pub fn unbind(&mut self, controller: u8) {
        self.table[usize::from(controller & 0x7F)] = None;
    }

    /// Parameter bound to `controller`.
    #[inline]
    pub fn get(&self, controller: u8) -> Option<SynthParam> {
        self.table[usize::from(controller & 0x7F)]
    }

    /// First controller bound to `param`.
    pub fn controller_for(&self, param: SynthParam) -> Option<u8> {
        self.iter().find(|&(_, p)| p == param).map(|(c, _)| c)
    }

    /// Bound controllers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, SynthParam)> + '_ {
        (0u8..128).filter_map(|c| self.get(c).map(|p| (c, p)))
    }

    /// Number of bound controllers.
    pub fn len(&self) -> usize {
        self.table.iter().flatten().count()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CcMap {
    fn default() -> Self {
        Self::firmware()
    }
}

/// Applies controller values to a [`SynthEngine`].
///
/// ```rust
/// use polypod_engine::{ParameterRouter, SynthEngine, SynthParam};
///
/// let router = ParameterRouter::default();
/// let mut engine: SynthEngine = SynthEngine::new(48000.0);
/// assert_eq!(router.route(106, 127, &mut engine), Some(SynthParam::Resonance));
/// assert_eq!(engine.get(SynthParam::Resonance), 1.0);
/// assert_eq!(router.route(1, 64, &mut engine), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRouter {
    map: CcMap,
    detune_scale: f32,
    attack_scale: f32,
}

impl Default for ParameterRouter {
    fn default() -> Self {
        Self::new(CcMap::default())
    }
}

impl ParameterRouter {
    /// Router over `map` with the default scales.
    pub fn new(map: CcMap) -> Self {
        Self {
            map,
            detune_scale: DEFAULT_DETUNE_SCALE,
            attack_scale: DEFAULT_ATTACK_SCALE,
        }
    }

    /// Set the detune and attack ranges.
    #[must_use]
    pub fn with_scales(mut self, detune_scale: f32, attack_scale: f32) -> Self {
        self.detune_scale = detune_scale;
        self.attack_scale = attack_scale;
        self
    }

    /// The controller table.
    pub fn map(&self) -> &CcMap {
        &self.map
    }

    /// Detune reached at controller value 127.
    pub fn detune_scale(&self) -> f32 {
        self.detune_scale
    }

    /// Attack time in seconds reached at controller value 127.
    pub fn attack_scale(&self) -> f32 {
        self.attack_scale
    }

    /// Plain value `param` takes for a controller `value`.
    pub fn value_for(&self, param: SynthParam, value: u8) -> f32 {
        let value = value & 0x7F;
        let norm = cc_to_unit(value);
        match param {
            SynthParam::Profile => Profile::from_normalized(norm).index() as f32,
            SynthParam::Detune => norm * self.detune_scale,
            SynthParam::Cutoff => midi_to_freq(f32::from(value)),
            SynthParam::Attack => norm * self.attack_scale,
            SynthParam::LfoFrequency | SynthParam::LfoAmplitude => norm * LFO_CC_SCALE,
            SynthParam::Resonance
            | SynthParam::Decay
            | SynthParam::Sustain
            | SynthParam::Release
            | SynthParam::ReverbMix
            | SynthParam::ReverbFeedback
            | SynthParam::DelayFeedback
            | SynthParam::DelayTime => norm,
        }
    }

    /// Apply one control change. Returns the parameter that changed, or
    /// `None` for an unmapped controller.
    pub fn route<const N: usize>(
        &self,
        controller: u8,
        value: u8,
        engine: &mut SynthEngine<N>,
    ) -> Option<SynthParam> {
        let Some(param) = self.map.get(controller) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(controller, value, "unmapped controller");
            return None;
        };
        engine.set(param, self.value_for(param, value));
        Some(param)
    }
}
