//! The synthesis state: voices, vibrato LFO and the effects chain.

use polypod_core::{Lfo, ParamDescriptor, ParameterInfo};
use polypod_effects::EffectsChain;
use polypod_synth::{POLYSYNTH_VOICES, Profile, VoicePool};

use crate::event::{EngineEvent, MidiEvent};
use crate::modes::{ButtonAction, KnobBinding};
use crate::param::{PARAM_COUNT, SynthParam};
use crate::router::ParameterRouter;
use crate::settings::EngineSettings;

/// Voices, LFO and effects, advanced one stereo frame at a time.
///
/// Notes are stamped with the engine's own clock (milliseconds of rendered
/// audio). Note-ons that land in the same millisecond get consecutive stamps
/// so stealing still follows arrival order.
///
/// ```rust
/// use polypod_engine::{SynthEngine, SynthParam};
///
/// let mut engine: SynthEngine = SynthEngine::new(48000.0);
/// engine.note_on(60);
/// engine.set(SynthParam::Cutoff, 2000.0);
/// let (l, r) = engine.next_frame();
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct SynthEngine<const N: usize = POLYSYNTH_VOICES> {
    pool: VoicePool<N>,
    lfo: Lfo,
    chain: EffectsChain,
    sample_rate: f32,
    frames: u64,
    last_stamp: Option<u64>,
}

impl<const N: usize> SynthEngine<N> {
    /// Engine with default settings at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self::from_settings(&EngineSettings::new(sample_rate))
    }

    /// Engine in its power-on state for `settings`.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        let sample_rate = settings.sample_rate;
        let mut pool = VoicePool::new(sample_rate);
        pool.set_hard_retrigger(settings.hard_retrigger);
        let mut chain = EffectsChain::new(sample_rate);
        chain.set_effects_enabled(settings.effects_enabled);

        let mut engine = Self {
            pool,
            lfo: Lfo::new(sample_rate, SynthParam::LfoFrequency.descriptor().default),
            chain,
            sample_rate,
            frames: 0,
            last_stamp: None,
        };
        for param in SynthParam::ALL {
            engine.set(param, param.descriptor().default);
        }
        for param in SynthParam::ALL {
            if let Some(value) = settings.overrides[param.index()] {
                engine.set(param, value);
            }
        }
        engine.chain.reset();
        engine
    }

    /// Set a parameter to a plain value.
    pub fn set(&mut self, param: SynthParam, value: f32) {
        match param {
            SynthParam::Profile => {
                let index = libm::roundf(value);
                let index = if index > 0.0 { index as usize } else { 0 };
                let profile = Profile::from_index(index);
                // only a change of profile resets detune
                if profile != self.pool.voices()[0].profile() {
                    self.pool.set_profile(profile);
                }
            }
            SynthParam::Detune => self.pool.set_detune(value),
            SynthParam::Cutoff => self.chain.set_cutoff(value),
            SynthParam::Resonance => self.chain.set_resonance(value),
            SynthParam::Attack => self.pool.set_attack(value),
            SynthParam::Decay => self.pool.set_decay(value),
            SynthParam::Sustain => self.pool.set_sustain(value),
            SynthParam::Release => self.pool.set_release(value),
            SynthParam::LfoFrequency => self.lfo.set_frequency(value),
            SynthParam::LfoAmplitude => self.lfo.set_amplitude(value),
            SynthParam::ReverbMix => self.chain.set_reverb_mix(value),
            SynthParam::ReverbFeedback => self.chain.set_reverb_feedback(value),
            SynthParam::DelayFeedback => self.chain.set_delay_feedback(value),
            SynthParam::DelayTime => self.chain.set_delay_time(value),
        }
    }

    /// Current plain value of a parameter.
    ///
    /// Voice parameters are broadcast, so the first voice speaks for all.
    pub fn get(&self, param: SynthParam) -> f32 {
        let voice = &self.pool.voices()[0];
        match param {
            SynthParam::Profile => voice.profile().index() as f32,
            SynthParam::Detune => voice.detune(),
            SynthParam::Cutoff => self.chain.cutoff(),
            SynthParam::Resonance => self.chain.resonance(),
            SynthParam::Attack => voice.envelope().attack(),
            SynthParam::Decay => voice.envelope().decay(),
            SynthParam::Sustain => voice.envelope().sustain(),
            SynthParam::Release => voice.envelope().release(),
            SynthParam::LfoFrequency => self.lfo.frequency(),
            SynthParam::LfoAmplitude => self.lfo.amplitude(),
            SynthParam::ReverbMix => self.chain.reverb_mix(),
            SynthParam::ReverbFeedback => self.chain.reverb_feedback(),
            SynthParam::DelayFeedback => self.chain.delay_feedback(),
            SynthParam::DelayTime => self.chain.delay_time(),
        }
    }

    /// Start `note` on a voice and return the voice index.
    pub fn note_on(&mut self, note: u8) -> usize {
        let now = self.now_ms();
        let stamp = match self.last_stamp {
            Some(last) if last >= now => last + 1,
            _ => now,
        };
        self.last_stamp = Some(stamp);
        self.pool.allocate(note & 0x7F, stamp)
    }

    /// Release the first voice holding `note`.
    pub fn note_off(&mut self, note: u8) -> Option<usize> {
        self.pool.release(note & 0x7F)
    }

    /// Release every voice.
    pub fn all_notes_off(&mut self) {
        self.pool.release_all();
    }

    /// Apply one event; control changes go through `router`.
    pub fn handle(&mut self, event: EngineEvent, router: &ParameterRouter) {
        match event {
            EngineEvent::Midi(midi) => match midi.masked() {
                MidiEvent::NoteOn { note } => {
                    self.note_on(note);
                }
                MidiEvent::NoteOff { note } => {
                    self.note_off(note);
                }
                MidiEvent::ControlChange { controller, value } => {
                    router.route(controller, value, self);
                }
            },
            EngineEvent::AllNotesOff => self.all_notes_off(),
        }
    }

    /// Set the bound parameter from a knob reading.
    pub fn apply_knob(&mut self, binding: &KnobBinding, knob: f32) {
        self.set(binding.param, binding.value_at(knob));
    }

    /// Run a button action.
    pub fn apply_button(&mut self, action: ButtonAction) {
        match action {
            ButtonAction::None => {}
            ButtonAction::AllNotesOff => self.all_notes_off(),
            ButtonAction::NextProfile => {
                let next = self.pool.voices()[0].profile().next();
                self.pool.set_profile(next);
            }
            ButtonAction::ToggleEffects => {
                let enabled = self.chain.effects_enabled();
                self.chain.set_effects_enabled(!enabled);
            }
        }
    }

    /// Render one stereo frame: LFO, vibrato, voice mix, effects.
    #[inline]
    pub fn next_frame(&mut self) -> (f32, f32) {
        let vibrato = self.lfo.advance();
        self.pool.set_vibrato(vibrato);
        let mono = self.pool.mix();
        self.frames += 1;
        self.chain.process(mono)
    }

    /// Milliseconds of audio rendered so far.
    pub fn now_ms(&self) -> u64 {
        (self.frames as f64 * 1000.0 / f64::from(self.sample_rate)) as u64
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Output sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Change the sample rate, keeping every setting.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.pool.set_sample_rate(sample_rate);
        self.lfo.set_sample_rate(sample_rate);
        self.chain.set_sample_rate(sample_rate);
    }

    /// The voices.
    pub fn pool(&self) -> &VoicePool<N> {
        &self.pool
    }

    /// The voices, mutably.
    pub fn pool_mut(&mut self) -> &mut VoicePool<N> {
        &mut self.pool
    }

    /// The vibrato LFO.
    pub fn lfo(&self) -> &Lfo {
        &self.lfo
    }

    /// The effects chain.
    pub fn chain(&self) -> &EffectsChain {
        &self.chain
    }

    /// The effects chain, mutably.
    pub fn chain_mut(&mut self) -> &mut EffectsChain {
        &mut self.chain
    }

    /// Silence everything: voices idle, LFO and effects cleared.
    pub fn reset(&mut self) {
        self.pool.reset();
        self.lfo.reset();
        self.chain.reset();
    }
}

impl<const N: usize> ParameterInfo for SynthEngine<N> {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        SynthParam::from_index(index).map(SynthParam::descriptor)
    }

    fn get_param(&self, index: usize) -> f32 {
        SynthParam::from_index(index).map_or(0.0, |p| self.get(p))
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if let Some(param) = SynthParam::from_index(index) {
            self.set(param, param.descriptor().clamp(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_values_match_descriptors() {
        let engine: SynthEngine = SynthEngine::new(48000.0);
        for param in SynthParam::ALL {
            let expected = param.descriptor().default;
            assert!(
                (engine.get(param) - expected).abs() < 1e-4,
                "{param:?}: {} vs {expected}",
                engine.get(param)
            );
        }
    }

    #[test]
    fn overrides_apply_after_defaults() {
        let settings = EngineSettings::new(48000.0).with_initial(SynthParam::Profile, 1.0);
        let engine: SynthEngine<4> = SynthEngine::from_settings(&settings);
        assert_eq!(engine.get(SynthParam::Profile), 1.0);
        // the profile's own detune survives
        assert_eq!(engine.get(SynthParam::Detune), 1.5);
    }

    #[test]
    fn same_millisecond_notes_keep_order() {
        let mut engine: SynthEngine<2> = SynthEngine::new(48000.0);
        engine.note_on(60);
        engine.note_on(62);
        let stamps: Vec<u64> = engine.pool().voices().iter().map(|v| v.trigger_ms()).collect();
        assert_eq!(stamps, vec![0, 1]);
        // the oldest, voice 0, is stolen; then voice 1
        assert_eq!(engine.note_on(64), 0);
        assert_eq!(engine.note_on(65), 1);
    }

    #[test]
    fn clock_follows_rendered_frames() {
        let mut engine: SynthEngine<2> = SynthEngine::new(48000.0);
        for _ in 0..4800 {
            engine.next_frame();
        }
        assert_eq!(engine.frames(), 4800);
        assert_eq!(engine.now_ms(), 100);
        engine.note_on(60);
        assert_eq!(engine.pool().voices()[0].trigger_ms(), 100);
    }

    #[test]
    fn buttons() {
        let mut engine: SynthEngine<2> = SynthEngine::new(48000.0);
        engine.note_on(60);
        engine.apply_button(ButtonAction::None);
        assert_eq!(engine.pool().busy_count(), 1);
        engine.apply_button(ButtonAction::AllNotesOff);
        assert_eq!(engine.pool().busy_count(), 0);

        engine.apply_button(ButtonAction::NextProfile);
        assert_eq!(engine.get(SynthParam::Profile), 1.0);

        assert!(engine.chain().effects_enabled());
        engine.apply_button(ButtonAction::ToggleEffects);
        assert!(!engine.chain().effects_enabled());
    }

    #[test]
    fn parameter_info_clamps() {
        let mut engine: SynthEngine<2> = SynthEngine::new(48000.0);
        let index = SynthParam::Sustain.index();
        engine.set_param(index, 3.0);
        assert_eq!(engine.get_param(index), 1.0);
        assert_eq!(engine.find_param_by_name("cutoff"), Some(SynthParam::Cutoff.index()));
        assert!(engine.param_info(PARAM_COUNT).is_none());
    }

    #[test]
    fn profile_values_round_and_clamp() {
        let mut engine: SynthEngine<2> = SynthEngine::new(48000.0);
        engine.set(SynthParam::Profile, 1.6);
        assert_eq!(engine.get(SynthParam::Profile), 2.0);
        engine.set(SynthParam::Profile, 9.0);
        assert_eq!(engine.get(SynthParam::Profile), 2.0);
        engine.set(SynthParam::Profile, -3.0);
        assert_eq!(engine.get(SynthParam::Profile), 0.0);
    }
}
