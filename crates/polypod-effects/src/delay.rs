//! Stereo feedback delay with a gliding delay length.
//!
//! The length follows its target one-pole style at [`DELAY_SMOOTHING`] of
//! the remaining distance per sample, so changing the delay time bends the
//! pitch of the repeats instead of clicking. Both channels read at the same
//! smoothed length.

use polypod_core::{Effect, InterpolatedDelay, SmoothedParam, flush_denormal};

/// Fraction of the remaining distance the delay length covers per sample.
pub const DELAY_SMOOTHING: f32 = 0.00007;

/// Shortest loop in samples; the output is the sample being written, so a
/// delay time of zero still recirculates one sample back.
pub const MIN_LOOP_LENGTH: f32 = 1.0;

/// Feedback delay where the output is the recirculated signal itself.
///
/// Per sample and channel:
///
/// ```text
/// read    = line[length]
/// written = feedback * read + dry
/// line   <- written
/// out     = written
/// ```
///
/// With feedback 0 the delay is transparent. The feedback gain is applied
/// as set, so 1.0 recirculates forever. Lengths below [`MIN_LOOP_LENGTH`]
/// read as [`MIN_LOOP_LENGTH`].
///
/// ```rust
/// use polypod_core::Effect;
/// use polypod_effects::FeedbackDelay;
///
/// let mut delay = FeedbackDelay::new(48000.0);
/// delay.set_feedback(0.5);
/// delay.set_target_length(12000.0);
/// let (l, r) = delay.process_stereo(0.25, 0.25);
/// assert_eq!((l, r), (0.25, 0.25));
/// ```
#[derive(Debug, Clone)]
pub struct FeedbackDelay {
    line_l: InterpolatedDelay,
    line_r: InterpolatedDelay,
    length: SmoothedParam,
    feedback: f32,
    sample_rate: f32,
}

impl FeedbackDelay {
    /// Create a delay with one second of buffer and zero length.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            line_l: InterpolatedDelay::from_time(sample_rate, 1.0),
            line_r: InterpolatedDelay::from_time(sample_rate, 1.0),
            length: SmoothedParam::with_coeff(0.0, DELAY_SMOOTHING),
            feedback: 0.0,
            sample_rate,
        }
    }

    /// Longest settable length in samples.
    pub fn max_length(&self) -> f32 {
        self.line_l.capacity().saturating_sub(1) as f32
    }

    /// Set the length (samples) to glide toward, clamped to the buffer.
    pub fn set_target_length(&mut self, samples: f32) {
        self.length.set_target(samples.clamp(0.0, self.max_length()));
    }

    /// Jump to `samples` with no glide.
    pub fn set_length_immediate(&mut self, samples: f32) {
        self.length
            .set_immediate(samples.clamp(0.0, self.max_length()));
    }

    /// Length the delay is gliding toward.
    pub fn target_length(&self) -> f32 {
        self.length.target()
    }

    /// Length used by the most recent sample.
    pub fn current_length(&self) -> f32 {
        self.length.get()
    }

    /// Set the feedback gain (0.0 to 1.0).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 1.0);
    }

    /// Feedback gain.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Sample rate the buffer was sized for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    #[inline]
    fn tap(line: &mut InterpolatedDelay, dry: f32, length: f32, gain: f32) -> f32 {
        // read(0) is one sample back
        let read = line.read(length.max(MIN_LOOP_LENGTH) - 1.0);
        let written = flush_denormal(gain * read + dry);
        line.write(written);
        written
    }
}

impl Effect for FeedbackDelay {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let length = self.length.advance();
        Self::tap(&mut self.line_l, input, length, self.feedback)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let length = self.length.advance();
        (
            Self::tap(&mut self.line_l, left, length, self.feedback),
            Self::tap(&mut self.line_r, right, length, self.feedback),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let ratio = sample_rate / self.sample_rate;
        self.sample_rate = sample_rate;
        self.line_l = InterpolatedDelay::from_time(sample_rate, 1.0);
        self.line_r = InterpolatedDelay::from_time(sample_rate, 1.0);
        let target = self.length.target() * ratio;
        self.set_length_immediate(target);
    }

    fn reset(&mut self) {
        self.line_l.clear();
        self.line_r.clear();
        self.length.snap_to_target();
    }
}
