//! Voice profiles: the oscillator pair and default detune a voice plays with.

use crate::OscillatorWaveform;

/// Number of selectable profiles.
pub const PROFILE_COUNT: usize = 3;

/// A named timbre.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Sine + triangle in unison.
    #[default]
    Default,
    /// Triangle + saw a fifth apart.
    Alt,
    /// Saw + square an octave apart.
    BuzzSaw,
}

/// What a profile sets on a voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileSpec {
    /// Primary oscillator shape.
    pub primary: OscillatorWaveform,
    /// Secondary oscillator shape.
    pub secondary: OscillatorWaveform,
    /// Secondary/primary frequency ratio.
    pub detune: f32,
}

impl Profile {
    /// All profiles in selection order.
    pub const ALL: [Profile; PROFILE_COUNT] = [Profile::Default, Profile::Alt, Profile::BuzzSaw];

    /// Waveforms and default detune.
    pub const fn spec(self) -> ProfileSpec {
        match self {
            Profile::Default => ProfileSpec {
                primary: OscillatorWaveform::Sine,
                secondary: OscillatorWaveform::Triangle,
                detune: 1.0,
            },
            Profile::Alt => ProfileSpec {
                primary: OscillatorWaveform::Triangle,
                secondary: OscillatorWaveform::Saw,
                detune: 1.5,
            },
            Profile::BuzzSaw => ProfileSpec {
                primary: OscillatorWaveform::Saw,
                secondary: OscillatorWaveform::Square,
                detune: 2.0,
            },
        }
    }

    /// Profile at `index`, clamped to the last one.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(PROFILE_COUNT - 1)]
    }

    /// Position in [`Profile::ALL`].
    pub fn index(self) -> usize {
        match self {
            Profile::Default => 0,
            Profile::Alt => 1,
            Profile::BuzzSaw => 2,
        }
    }

    /// Pick from a normalized control: `clamp(round(norm * PROFILE_COUNT), 0, PROFILE_COUNT - 1)`.
    ///
    /// ```rust
    /// use polypod_synth::Profile;
    ///
    /// assert_eq!(Profile::from_normalized(0.0), Profile::Default);
    /// assert_eq!(Profile::from_normalized(0.5), Profile::BuzzSaw);
    /// assert_eq!(Profile::from_normalized(1.0), Profile::BuzzSaw);
    /// ```
    pub fn from_normalized(norm: f32) -> Self {
        let scaled = libm::roundf(norm * PROFILE_COUNT as f32);
        // negative and NaN inputs land on the first profile
        let index = if scaled > 0.0 { scaled as usize } else { 0 };
        Self::from_index(index)
    }

    /// The next profile, wrapping.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % PROFILE_COUNT]
    }

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Profile::Default => "default",
            Profile::Alt => "alt",
            Profile::BuzzSaw => "buzz_saw",
        }
    }

    /// Inverse of [`name`](Self::name), ASCII case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}
