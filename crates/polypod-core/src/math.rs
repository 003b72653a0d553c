//! Small numeric helpers shared by the synth and effects crates.
//!
//! - [`midi_to_freq`] - Equal-tempered note number to Hz (A4 = 440 Hz)
//! - [`cc_to_unit`] - 7-bit controller value to \[0.0, 1.0\]
//! - [`flush_denormal`] - Zero out subnormal-range values in feedback paths
//! - [`wet_dry_mix`] - Linear crossfade

use libm::powf;

/// Convert a (possibly fractional) MIDI note number to frequency in Hz.
///
/// `440 * 2^((note - 69) / 12)`. Fractional notes are allowed so controller
/// values can be used directly as pitches (e.g. filter cutoff from a CC).
///
/// ```rust
/// use polypod_core::midi_to_freq;
///
/// assert!((midi_to_freq(69.0) - 440.0).abs() < 1e-3);
/// assert!((midi_to_freq(81.0) - 880.0).abs() < 1e-2);
/// ```
#[inline]
pub fn midi_to_freq(note: f32) -> f32 {
    440.0 * powf(2.0, (note - 69.0) / 12.0)
}

/// Normalize a 7-bit controller value to `value / 127`.
///
/// The high bit is masked off; decoders are expected to deliver 0..=127.
#[inline]
pub fn cc_to_unit(value: u8) -> f32 {
    f32::from(value & 0x7F) / 127.0
}

/// Replace values below 1e-20 with zero.
///
/// Feedback loops (combs, allpasses, delay feedback) decay toward zero forever
/// and would otherwise spend their tail in the subnormal range.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet: `dry + (wet - dry) * mix`.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}
