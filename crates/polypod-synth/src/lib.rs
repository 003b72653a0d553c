//! polypod synth - voices for the polypod synthesizer
//!
//! Oscillators, envelopes and the fixed voice pool the engine plays notes on.
//!
//! # Core Components
//!
//! ## Oscillators
//!
//! - [`Oscillator`] - Phase accumulator with polyBLEP saw/square
//! - [`OscillatorWaveform`] - Sine, Triangle, Saw, Square
//!
//! ## Envelopes
//!
//! - [`AdsrEnvelope`] - Gate-driven ADSR with times in seconds
//! - [`EnvelopeState`] - Stage tracking
//!
//! ## Voices
//!
//! - [`Profile`] - Named oscillator pair + default detune
//! - [`Voice`] - Oscillator pair, envelope and note bookkeeping
//! - [`VoicePool`] - Fixed polyphony with oldest-first stealing
//!
//! ```rust
//! use polypod_synth::{Profile, VoicePool};
//!
//! let mut pool: VoicePool<8> = VoicePool::new(48000.0);
//! pool.set_profile(Profile::Alt);
//! pool.allocate(60, 0);
//! pool.allocate(64, 1);
//!
//! let mut block = [0.0f32; 64];
//! for sample in &mut block {
//!     *sample = pool.mix();
//! }
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! polypod-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod envelope;
pub mod oscillator;
pub mod pool;
pub mod profile;
pub mod voice;

pub use envelope::{AdsrEnvelope, EnvelopeState};
pub use oscillator::{Oscillator, OscillatorWaveform};
pub use pool::{POLYSYNTH_VOICES, VoicePool};
pub use profile::{PROFILE_COUNT, Profile, ProfileSpec};
pub use voice::Voice;
