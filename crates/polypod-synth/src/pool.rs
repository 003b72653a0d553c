//! Fixed-size voice pool with oldest-first stealing.
//!
//! Voices are created once with the pool and reused forever. A note-on takes
//! the first free voice in index order; when every voice is busy the one with
//! the oldest trigger time is stolen (lowest index on ties). A voice that is
//! only releasing counts as free.

use crate::profile::Profile;
use crate::voice::Voice;

/// Default polyphony.
pub const POLYSYNTH_VOICES: usize = 8;

/// Polyphonic voice pool.
///
/// ```rust
/// use polypod_synth::VoicePool;
///
/// let mut pool: VoicePool<2> = VoicePool::new(48000.0);
/// assert_eq!(pool.allocate(60, 0), 0);
/// assert_eq!(pool.allocate(64, 1), 1);
/// // full: the voice triggered at t=0 is stolen
/// assert_eq!(pool.allocate(67, 2), 0);
/// assert_eq!(pool.release(64), Some(1));
/// assert_eq!(pool.release(64), None);
/// ```
#[derive(Debug, Clone)]
pub struct VoicePool<const N: usize = POLYSYNTH_VOICES> {
    voices: [Voice; N],
    hard_retrigger: bool,
}

impl<const N: usize> VoicePool<N> {
    /// `N` idle voices on the default profile.
    pub fn new(sample_rate: f32) -> Self {
        const { assert!(N > 0, "voice pool needs at least one voice") };
        Self {
            voices: core::array::from_fn(|_| Voice::new(sample_rate)),
            hard_retrigger: false,
        }
    }

    /// Change sample rate for every voice.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    /// Restart envelopes from zero on trigger instead of from their level.
    pub fn set_hard_retrigger(&mut self, hard: bool) {
        self.hard_retrigger = hard;
    }

    /// Whether triggers restart envelopes from zero.
    pub fn hard_retrigger(&self) -> bool {
        self.hard_retrigger
    }

    /// Claim a voice for `note` and return its index.
    ///
    /// Always succeeds: retriggers the voice already holding `note`, else
    /// takes the first free voice, otherwise steals the voice with the
    /// smallest trigger time.
    pub fn allocate(&mut self, note: u8, timestamp_ms: u64) -> usize {
        let note = note & 0x7F;
        let held = self.voices.iter().position(|v| v.note() == Some(note));
        let free = || self.voices.iter().position(|v| !v.is_busy());
        let index = match held.or_else(free) {
            Some(index) => index,
            None => {
                let oldest = self.oldest();
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    voice = oldest,
                    stolen_note = ?self.voices[oldest].note(),
                    note,
                    "voice stolen"
                );
                oldest
            }
        };
        self.voices[index].trigger(note, timestamp_ms, self.hard_retrigger);
        index
    }

    /// Free the first voice holding `note`. `None` if no voice holds it.
    pub fn release(&mut self, note: u8) -> Option<usize> {
        let note = note & 0x7F;
        let index = self.voices.iter().position(|v| v.note() == Some(note))?;
        self.voices[index].release();
        Some(index)
    }

    /// Free every voice. Envelopes play out their release.
    pub fn release_all(&mut self) {
        for voice in &mut self.voices {
            voice.release();
        }
    }

    /// Silence and free every voice immediately.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
    }

    /// One sample of every voice, summed and scaled by `1 / N`.
    #[inline]
    pub fn mix(&mut self) -> f32 {
        let mut sum = 0.0;
        for voice in &mut self.voices {
            sum += voice.get_sample();
        }
        sum / N as f32
    }

    /// Apply `profile` to every voice.
    pub fn set_profile(&mut self, profile: Profile) {
        for voice in &mut self.voices {
            voice.set_profile(profile);
        }
    }

    /// Set the secondary oscillator ratio on every voice.
    pub fn set_detune(&mut self, detune: f32) {
        for voice in &mut self.voices {
            voice.set_detune(detune);
        }
    }

    /// Set every envelope's attack time in seconds.
    pub fn set_attack(&mut self, seconds: f32) {
        for voice in &mut self.voices {
            voice.envelope_mut().set_attack(seconds);
        }
    }

    /// Set every envelope's decay time in seconds.
    pub fn set_decay(&mut self, seconds: f32) {
        for voice in &mut self.voices {
            voice.envelope_mut().set_decay(seconds);
        }
    }

    /// Set every envelope's sustain level.
    pub fn set_sustain(&mut self, level: f32) {
        for voice in &mut self.voices {
            voice.envelope_mut().set_sustain(level);
        }
    }

    /// Set every envelope's release time in seconds.
    pub fn set_release(&mut self, seconds: f32) {
        for voice in &mut self.voices {
            voice.envelope_mut().set_release(seconds);
        }
    }

    /// Set the vibrato offset (Hz) on every voice.
    #[inline]
    pub fn set_vibrato(&mut self, vibrato_hz: f32) {
        for voice in &mut self.voices {
            voice.set_vibrato(vibrato_hz);
        }
    }

    /// All voices.
    pub fn voices(&self) -> &[Voice; N] {
        &self.voices
    }

    /// Voice at `index`.
    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    /// Number of voices.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Voices holding a note.
    pub fn busy_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_busy()).count()
    }

    /// Voices with a running envelope.
    pub fn sounding_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_sounding()).count()
    }

    fn oldest(&self) -> usize {
        // min_by_key keeps the first of equal keys, so ties go to the lowest index
        self.voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.trigger_ms())
            .map_or(0, |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnvelopeState;

    const SR: f32 = 48000.0;

    #[test]
    fn fills_in_index_order() {
        let mut pool: VoicePool<4> = VoicePool::new(SR);
        for (i, note) in [60, 62, 64, 65].into_iter().enumerate() {
            assert_eq!(pool.allocate(note, i as u64), i);
        }
        assert_eq!(pool.busy_count(), 4);
    }

    #[test]
    fn steals_smallest_trigger_time() {
        let mut pool: VoicePool<3> = VoicePool::new(SR);
        pool.allocate(60, 10);
        pool.allocate(62, 5);
        pool.allocate(64, 20);
        assert_eq!(pool.allocate(70, 30), 1);
        assert_eq!(pool.voice(1).and_then(Voice::note), Some(70));
    }

    #[test]
    fn steal_ties_go_to_lowest_index() {
        let mut pool: VoicePool<3> = VoicePool::new(SR);
        pool.allocate(60, 7);
        pool.allocate(62, 7);
        pool.allocate(64, 7);
        assert_eq!(pool.allocate(70, 7), 0);
    }

    #[test]
    fn releasing_voice_is_reused_before_stealing() {
        let mut pool: VoicePool<2> = VoicePool::new(SR);
        pool.allocate(60, 0);
        pool.allocate(62, 1);
        pool.release(62);
        assert_eq!(pool.allocate(64, 2), 1);
    }

    #[test]
    fn repeated_note_on_reuses_its_voice() {
        let mut pool: VoicePool<4> = VoicePool::new(SR);
        assert_eq!(pool.allocate(60, 0), 0);
        assert_eq!(pool.allocate(64, 1), 1);
        assert_eq!(pool.allocate(60, 2), 0);
        assert_eq!(pool.busy_count(), 2);
        assert_eq!(pool.voices()[0].trigger_ms(), 2);
        assert_eq!(pool.voices()[0].envelope_state(), EnvelopeState::Attack);

        assert_eq!(pool.release(60), Some(0));
        assert_eq!(pool.busy_count(), 1);
        assert!(pool.voices().iter().all(|v| v.note() != Some(60)));
    }

    #[test]
    fn release_unknown_note_changes_nothing() {
        let mut pool: VoicePool<2> = VoicePool::new(SR);
        pool.allocate(60, 0);
        let before: Vec<_> = pool.voices().iter().map(Voice::note).collect();
        assert_eq!(pool.release(61), None);
        let after: Vec<_> = pool.voices().iter().map(Voice::note).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn stolen_voice_restarts_attack() {
        let mut pool: VoicePool<1> = VoicePool::new(SR);
        pool.allocate(60, 0);
        for _ in 0..96_000 {
            pool.mix();
        }
        assert_eq!(pool.voices()[0].envelope_state(), EnvelopeState::Sustain);
        pool.allocate(72, 1);
        assert_eq!(pool.voices()[0].envelope_state(), EnvelopeState::Attack);
    }

    #[test]
    fn hard_retrigger_zeroes_level() {
        let mut pool: VoicePool<1> = VoicePool::new(SR);
        pool.set_hard_retrigger(true);
        pool.allocate(60, 0);
        for _ in 0..1000 {
            pool.mix();
        }
        pool.allocate(61, 1);
        assert_eq!(pool.voices()[0].envelope().level(), 0.0);
    }

    #[test]
    fn mix_is_scaled_by_voice_count() {
        let mut single: VoicePool<1> = VoicePool::new(SR);
        let mut quad: VoicePool<4> = VoicePool::new(SR);
        single.allocate(69, 0);
        quad.allocate(69, 0);
        for _ in 0..500 {
            let a = single.mix();
            let b = quad.mix();
            assert!((a / 4.0 - b).abs() < 1e-6);
        }
    }

    #[test]
    fn release_all_frees_everything() {
        let mut pool: VoicePool<3> = VoicePool::new(SR);
        pool.allocate(60, 0);
        pool.allocate(61, 1);
        pool.release_all();
        assert_eq!(pool.busy_count(), 0);
        pool.mix();
        assert_eq!(pool.sounding_count(), 2);
    }

    #[test]
    fn broadcast_setters_reach_every_voice() {
        let mut pool: VoicePool<3> = VoicePool::new(SR);
        pool.set_attack(1.5);
        pool.set_sustain(0.25);
        pool.set_detune(3.0);
        for voice in pool.voices() {
            assert_eq!(voice.envelope().attack(), 1.5);
            assert_eq!(voice.envelope().sustain(), 0.25);
            assert_eq!(voice.detune(), 3.0);
        }
    }
}
