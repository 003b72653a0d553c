//! Circular-buffer delay line with fractional read positions.
//!
//! The buffer is allocated once in the constructor. `read`, `write` and
//! `read_write` never allocate.
//!
//! Read-before-write convention: `read(d)` returns the sample written `d`
//! writes ago, counting the most recent write as `d = 0`.

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Delay line with linear interpolation between neighbouring samples.
///
/// ```rust
/// use polypod_core::InterpolatedDelay;
///
/// let mut delay = InterpolatedDelay::new(16);
/// delay.write(1.0);
/// delay.write(0.0);
/// assert_eq!(delay.read(1.0), 1.0);
/// assert_eq!(delay.read(0.5), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Create a delay line holding `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "delay capacity must be > 0");
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    /// Create a delay line long enough for `max_seconds` at `sample_rate`.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds) as usize + 2)
    }

    /// Read `delay_samples` behind the most recent write.
    ///
    /// The delay is clamped to `[0, capacity - 2]` so the interpolation
    /// partner is always a valid sample.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let max = len.saturating_sub(2) as f32;
        let delay = delay_samples.clamp(0.0, max);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let newer = (self.write_pos + len - 1 - whole) % len;
        let older = (newer + len - 1) % len;
        let a = self.buffer[newer];
        let b = self.buffer[older];
        a + (b - a) * frac
    }

    /// Push one sample.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Read at `delay_samples`, then push `sample`.
    #[inline]
    pub fn read_write(&mut self, sample: f32, delay_samples: f32) -> f32 {
        let out = self.read(delay_samples);
        self.write(sample);
        out
    }

    /// Zero the buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Buffer length in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
