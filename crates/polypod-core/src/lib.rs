//! polypod core - DSP primitives for the polypod synthesizer
//!
//! The building blocks the voice engine and the effects chain are made of.
//! Everything here is allocation-free once constructed and safe to call from
//! an audio interrupt.
//!
//! # Contents
//!
//! ## Parameter Smoothing
//!
//! - [`SmoothedParam`] - One-pole approach toward a target, either from a
//!   smoothing time or from a fixed per-sample coefficient
//!
//! ## Filters
//!
//! - [`StateVariableFilter`] - TPT state-variable filter (low-pass by default)
//! - [`CombFilter`] - Damped feedback comb for reverbs
//! - [`AllpassFilter`] - Schroeder allpass diffuser
//!
//! ## Delay Lines
//!
//! - [`InterpolatedDelay`] - Fractional-length circular buffer
//!
//! ## Modulation
//!
//! - [`Lfo`] - Low-frequency oscillator with amplitude
//!
//! ## Metadata
//!
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Parameter ranges, units and
//!   normalized-value mapping for knobs and host listings
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets:
//!
//! ```toml
//! [dependencies]
//! polypod-core = { version = "0.1", default-features = false }
//! ```
//!
//! Delay buffers are heap-allocated at construction, so an allocator is still
//! required on embedded targets.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod lfo;
pub mod math;
pub mod param;
pub mod param_info;
pub mod svf;

pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use delay::InterpolatedDelay;
pub use effect::Effect;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{cc_to_unit, flush_denormal, midi_to_freq, wet_dry_mix};
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamScale, ParamUnit, ParameterInfo};
pub use svf::{StateVariableFilter, SvfOutput};
