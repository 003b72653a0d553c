//! polypod effects - the shared effects stage
//!
//! Every voice is mixed to mono and runs through one [`EffectsChain`]:
//!
//! - state variable low-pass filter (from `polypod-core`)
//! - [`StereoReverb`] - Freeverb with a stereo spread
//! - [`FeedbackDelay`] - Feedback delay whose length glides toward its target
//!
//! ## Example
//!
//! ```rust
//! use polypod_effects::EffectsChain;
//!
//! let mut chain = EffectsChain::new(48000.0);
//! chain.set_cutoff(1200.0);
//! chain.set_resonance(0.4);
//! chain.set_reverb_mix(0.3);
//! chain.set_delay_feedback(0.4);
//! chain.set_delay_time(0.25);
//!
//! let mut out = [0.0f32; 128];
//! for frame in out.chunks_exact_mut(2) {
//!     let (l, r) = chain.process(0.1);
//!     frame[0] = l;
//!     frame[1] = r;
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod chain;
pub mod delay;
pub mod reverb;

pub use chain::{DEFAULT_CUTOFF, DEFAULT_RESONANCE, EffectsChain, resonance_to_q};
pub use delay::{DELAY_SMOOTHING, FeedbackDelay, MIN_LOOP_LENGTH};
pub use reverb::{STEREO_SPREAD_44K, StereoReverb};
