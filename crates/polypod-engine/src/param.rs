//! Every parameter a controller, a knob or a host can set.
//!
//! Values are in plain units (Hz, seconds, levels); see
//! [`SynthParam::descriptor`] for ranges. [`SynthParam::Profile`] takes the
//! profile index.

use polypod_core::{ParamDescriptor, ParamScale, ParamUnit};

/// Number of routable parameters.
pub const PARAM_COUNT: usize = 14;

/// A routable synthesis or effect parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynthParam {
    /// Voice profile index.
    Profile,
    /// Secondary oscillator frequency multiplier.
    Detune,
    /// Filter cutoff in Hz.
    Cutoff,
    /// Filter resonance, 0 to 1.
    Resonance,
    /// Envelope attack in seconds.
    Attack,
    /// Envelope decay in seconds.
    Decay,
    /// Envelope sustain level.
    Sustain,
    /// Envelope release in seconds.
    Release,
    /// Vibrato LFO rate in Hz.
    LfoFrequency,
    /// Vibrato depth in Hz.
    LfoAmplitude,
    /// Reverb wet/dry blend.
    ReverbMix,
    /// Reverb tail feedback.
    ReverbFeedback,
    /// Delay feedback gain.
    DelayFeedback,
    /// Delay time as a fraction of one second.
    DelayTime,
}

const DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::custom("Profile", "Profile", "profile", ParamUnit::Index, 0.0, 2.0, 0.0)
        .with_step(1.0)
        .with_group("voice"),
    ParamDescriptor::custom("Detune", "Detune", "detune", ParamUnit::None, 0.0, 4.0, 1.0)
        .with_group("voice"),
    ParamDescriptor::frequency("Filter Cutoff", "Cutoff", "cutoff", 8.0, 20000.0, 10000.0)
        .with_step(1.0)
        .with_group("filter"),
    ParamDescriptor::custom("Resonance", "Reso", "resonance", ParamUnit::Percent, 0.0, 1.0, 0.8)
        .with_group("filter"),
    ParamDescriptor::seconds("Attack", "Attack", "attack", 0.0, 2.0, 0.1).with_group("envelope"),
    ParamDescriptor::seconds("Decay", "Decay", "decay", 0.0, 1.0, 0.1).with_group("envelope"),
    ParamDescriptor::custom("Sustain", "Sustain", "sustain", ParamUnit::Percent, 0.0, 1.0, 0.7)
        .with_group("envelope"),
    ParamDescriptor::seconds("Release", "Release", "release", 0.0, 1.0, 0.1)
        .with_group("envelope"),
    ParamDescriptor::custom("LFO Rate", "LFO Rate", "lfo_frequency", ParamUnit::Hertz, 0.0, 1000.0, 0.1)
        .with_scale(ParamScale::Power(3.0))
        .with_group("lfo"),
    ParamDescriptor::custom("LFO Depth", "LFO Dpth", "lfo_amplitude", ParamUnit::Hertz, 0.0, 100.0, 1.0)
        .with_group("lfo"),
    ParamDescriptor::custom("Reverb Mix", "Rev Mix", "reverb_mix", ParamUnit::Percent, 0.0, 1.0, 0.25)
        .with_group("reverb"),
    ParamDescriptor::custom("Reverb Feedback", "Rev Fb", "reverb_feedback", ParamUnit::Percent, 0.0, 1.0, 0.85)
        .with_group("reverb"),
    ParamDescriptor::custom("Delay Feedback", "Dly Fb", "delay_feedback", ParamUnit::Percent, 0.0, 1.0, 0.0)
        .with_group("delay"),
    ParamDescriptor::seconds("Delay Time", "Dly Time", "delay_time", 0.0, 1.0, 0.5)
        .with_group("delay"),
];

impl SynthParam {
    /// All parameters in index order.
    pub const ALL: [Self; PARAM_COUNT] = [
        Self::Profile,
        Self::Detune,
        Self::Cutoff,
        Self::Resonance,
        Self::Attack,
        Self::Decay,
        Self::Sustain,
        Self::Release,
        Self::LfoFrequency,
        Self::LfoAmplitude,
        Self::ReverbMix,
        Self::ReverbFeedback,
        Self::DelayFeedback,
        Self::DelayTime,
    ];

    /// Position in [`SynthParam::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parameter at `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Metadata: names, unit, range and power-on default.
    pub const fn descriptor(self) -> ParamDescriptor {
        DESCRIPTORS[self as usize]
    }

    /// Stable identifier used in configuration files.
    pub const fn id(self) -> &'static str {
        self.descriptor().string_id
    }

    /// Look a parameter up by [`id`](Self::id).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_table() {
        for (i, param) in SynthParam::ALL.into_iter().enumerate() {
            assert_eq!(param.index(), i);
            assert_eq!(SynthParam::from_index(i), Some(param));
        }
        assert_eq!(SynthParam::from_index(PARAM_COUNT), None);
    }

    #[test]
    fn ids_round_trip_and_are_unique() {
        for param in SynthParam::ALL {
            assert_eq!(SynthParam::from_id(param.id()), Some(param));
            assert_eq!(
                SynthParam::ALL.iter().filter(|p| p.id() == param.id()).count(),
                1
            );
        }
        assert_eq!(SynthParam::from_id("volume"), None);
    }

    #[test]
    fn defaults_are_in_range() {
        for param in SynthParam::ALL {
            let d = param.descriptor();
            assert!(d.min <= d.default && d.default <= d.max, "{}", d.name);
        }
    }

    #[test]
    fn spot_check_descriptors() {
        assert_eq!(SynthParam::Cutoff.descriptor().default, 10_000.0);
        assert_eq!(SynthParam::Resonance.descriptor().default, 0.8);
        assert_eq!(SynthParam::Sustain.descriptor().default, 0.7);
        assert_eq!(SynthParam::LfoFrequency.descriptor().default, 0.1);
        assert_eq!(SynthParam::Attack.descriptor().max, 2.0);
    }
}
