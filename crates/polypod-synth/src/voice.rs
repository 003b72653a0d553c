//! A single synthesizer voice.
//!
//! Two oscillators, one envelope and the bookkeeping the pool needs to hand
//! voices out: the note it holds and when it was last triggered.

use crate::envelope::{AdsrEnvelope, EnvelopeState};
use crate::oscillator::Oscillator;
use crate::profile::Profile;
use polypod_core::midi_to_freq;

/// One voice.
///
/// A voice is *busy* while it holds a note. Releasing clears the note at once
/// (the voice can be reclaimed immediately) while the envelope keeps playing
/// its release tail.
///
/// Oscillator frequencies:
///
/// ```text
/// osc0 = base_frequency + vibrato
/// osc1 = base_frequency * detune + vibrato
/// ```
#[derive(Debug, Clone)]
pub struct Voice {
    note: Option<u8>,
    base_frequency: f32,
    detune: f32,
    vibrato: f32,
    profile: Profile,
    trigger_ms: u64,
    envelope: AdsrEnvelope,
    oscillators: [Oscillator; 2],
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Voice {
    /// Idle voice on the default profile, tuned to A4.
    pub fn new(sample_rate: f32) -> Self {
        let mut voice = Self {
            note: None,
            base_frequency: 440.0,
            detune: 1.0,
            vibrato: 0.0,
            profile: Profile::Default,
            trigger_ms: 0,
            envelope: AdsrEnvelope::new(sample_rate),
            oscillators: [Oscillator::new(sample_rate), Oscillator::new(sample_rate)],
        };
        voice.set_profile(Profile::Default);
        voice
    }

    /// Change sample rate for the oscillators and envelope.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.envelope.set_sample_rate(sample_rate);
        for osc in &mut self.oscillators {
            osc.set_sample_rate(sample_rate);
        }
    }

    /// Claim the voice for `note` and restart its envelope.
    pub fn trigger(&mut self, note: u8, timestamp_ms: u64, hard: bool) {
        let note = note & 0x7F;
        self.note = Some(note);
        self.base_frequency = midi_to_freq(f32::from(note));
        self.trigger_ms = timestamp_ms;
        self.envelope.retrigger(hard);
        self.update_frequencies();
    }

    /// Free the voice. The envelope sees the falling gate on the next sample.
    pub fn release(&mut self) {
        self.note = None;
    }

    /// Switch waveforms and reset detune to the profile default.
    pub fn set_profile(&mut self, profile: Profile) {
        let spec = profile.spec();
        self.profile = profile;
        self.oscillators[0].set_waveform(spec.primary);
        self.oscillators[1].set_waveform(spec.secondary);
        self.detune = spec.detune;
        self.update_frequencies();
    }

    /// Set the secondary oscillator ratio.
    pub fn set_detune(&mut self, detune: f32) {
        self.detune = detune;
        self.update_frequencies();
    }

    /// Set the vibrato offset in Hz added to both oscillators.
    #[inline]
    pub fn set_vibrato(&mut self, vibrato_hz: f32) {
        self.vibrato = vibrato_hz;
        self.update_frequencies();
    }

    /// Advance one sample: `(osc0 + osc1) / 2 * envelope`.
    #[inline]
    pub fn get_sample(&mut self) -> f32 {
        let level = self.envelope.process(self.note.is_some());
        let [a, b] = &mut self.oscillators;
        (a.advance() + b.advance()) * 0.5 * level
    }

    /// Held note, `None` when free.
    pub fn note(&self) -> Option<u8> {
        self.note
    }

    /// True while holding a note.
    pub fn is_busy(&self) -> bool {
        self.note.is_some()
    }

    /// True while the envelope is producing output (busy or releasing).
    pub fn is_sounding(&self) -> bool {
        self.envelope.is_active()
    }

    /// Time of the latest trigger.
    pub fn trigger_ms(&self) -> u64 {
        self.trigger_ms
    }

    /// Frequency of the held (or last held) note.
    pub fn base_frequency(&self) -> f32 {
        self.base_frequency
    }

    /// Secondary oscillator ratio.
    pub fn detune(&self) -> f32 {
        self.detune
    }

    /// Current vibrato offset in Hz.
    pub fn vibrato(&self) -> f32 {
        self.vibrato
    }

    /// Active profile.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// The envelope.
    pub fn envelope(&self) -> &AdsrEnvelope {
        &self.envelope
    }

    /// Mutable envelope, for time and level changes.
    pub fn envelope_mut(&mut self) -> &mut AdsrEnvelope {
        &mut self.envelope
    }

    /// Envelope stage.
    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    /// The oscillator pair.
    pub fn oscillators(&self) -> &[Oscillator; 2] {
        &self.oscillators
    }

    /// Silence immediately and free.
    pub fn reset(&mut self) {
        self.note = None;
        self.envelope.reset();
        for osc in &mut self.oscillators {
            osc.reset();
        }
    }

    #[inline]
    fn update_frequencies(&mut self) {
        self.oscillators[0].set_frequency(self.base_frequency + self.vibrato);
        self.oscillators[1].set_frequency(self.base_frequency * self.detune + self.vibrato);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OscillatorWaveform;

    #[test]
    fn trigger_sets_note_and_frequency() {
        let mut voice = Voice::new(48000.0);
        voice.trigger(69, 5, false);
        assert_eq!(voice.note(), Some(69));
        assert!((voice.base_frequency() - 440.0).abs() < 1e-3);
        assert_eq!(voice.trigger_ms(), 5);
        assert_eq!(voice.envelope_state(), EnvelopeState::Attack);
    }

    #[test]
    fn release_frees_but_keeps_sounding() {
        let mut voice = Voice::new(48000.0);
        voice.trigger(60, 0, false);
        for _ in 0..1000 {
            voice.get_sample();
        }
        voice.release();
        assert!(!voice.is_busy());
        voice.get_sample();
        assert_eq!(voice.envelope_state(), EnvelopeState::Release);
        assert!(voice.is_sounding());
    }

    #[test]
    fn oscillator_frequencies_follow_detune_and_vibrato() {
        let mut voice = Voice::new(48000.0);
        voice.trigger(69, 0, false);
        voice.set_detune(2.0);
        voice.set_vibrato(3.0);
        let [a, b] = voice.oscillators();
        assert!((a.frequency() - 443.0).abs() < 1e-3);
        assert!((b.frequency() - 883.0).abs() < 1e-3);
    }

    #[test]
    fn profile_sets_waveforms_and_detune() {
        let mut voice = Voice::new(48000.0);
        voice.set_detune(3.3);
        voice.set_profile(Profile::BuzzSaw);
        assert_eq!(voice.detune(), 2.0);
        assert_eq!(voice.oscillators()[0].waveform(), OscillatorWaveform::Saw);
        assert_eq!(voice.oscillators()[1].waveform(), OscillatorWaveform::Square);
    }

    #[test]
    fn idle_voice_is_silent() {
        let mut voice = Voice::new(48000.0);
        for _ in 0..100 {
            assert_eq!(voice.get_sample(), 0.0);
        }
    }

    #[test]
    fn sample_is_bounded_by_envelope() {
        let mut voice = Voice::new(48000.0);
        voice.set_profile(Profile::BuzzSaw);
        voice.trigger(48, 0, false);
        for _ in 0..48000 {
            let s = voice.get_sample();
            assert!(s.abs() <= voice.envelope().level() + 1e-5);
        }
    }
}
