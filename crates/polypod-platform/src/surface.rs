//! Block-rate handling of the pod's controls.
//!
//! [`ControlSurface`] is polled once per audio block. It owns the state
//! the pod needs between polls: the current [`ControlMode`], last block's
//! knob readings (for hysteresis) and last block's button levels (for edge
//! detection). What to do with a knob move or a button press is up to the
//! caller; the surface only reports them.

use crate::{ControlId, ControlState, PlatformController, pod};

/// Smallest knob movement between two blocks that counts as a change.
pub const KNOB_HYSTERESIS: f32 = 0.00005;

/// Number of control modes.
pub const MODE_COUNT: usize = 4;

/// An RGB colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
}

impl Rgb {
    /// All channels off.
    pub const OFF: Self = Self::new(0.0, 0.0, 0.0);

    /// Build a colour.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Channels as `[r, g, b]`.
    pub const fn channels(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Constant colour of LED 2.
pub const LED2_COLOR: Rgb = Rgb::new(0.0, 1.0, 1.0);

/// Which parameter page the knobs edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlMode {
    /// Oscillator profile and detune.
    #[default]
    Vco,
    /// Filter cutoff and resonance.
    Filter,
    /// Envelope attack and release.
    Envelope,
    /// Vibrato LFO frequency and depth.
    Lfo,
}

impl ControlMode {
    /// All modes in encoder order.
    pub const ALL: [Self; MODE_COUNT] = [Self::Vco, Self::Filter, Self::Envelope, Self::Lfo];

    /// Position in encoder order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Mode at `index`, wrapping in both directions.
    pub fn from_index_wrapping(index: i64) -> Self {
        Self::ALL[index.rem_euclid(MODE_COUNT as i64) as usize]
    }

    /// Mode `steps` detents away, wrapping.
    pub fn advance(self, steps: i32) -> Self {
        Self::from_index_wrapping(self.index() as i64 + i64::from(steps))
    }

    /// LED 1 colour shown while the mode is active.
    pub const fn color(self) -> Rgb {
        match self {
            Self::Vco => Rgb::new(1.0, 0.5, 0.0),
            Self::Filter => Rgb::new(1.0, 0.0, 0.0),
            Self::Envelope => Rgb::new(0.0, 1.0, 0.0),
            Self::Lfo => Rgb::new(1.0, 0.0, 1.0),
        }
    }

    /// Lowercase name, as used in configuration files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vco => "vco",
            Self::Filter => "filter",
            Self::Envelope => "envelope",
            Self::Lfo => "lfo",
        }
    }

    /// Parse a name produced by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// What one poll of the surface produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceUpdate {
    /// Mode after encoder handling.
    pub mode: ControlMode,
    /// True if the encoder changed the mode this block.
    pub mode_changed: bool,
    /// New knob readings that moved past [`KNOB_HYSTERESIS`].
    pub knobs: [Option<f32>; 2],
    /// Buttons that went down this block.
    pub buttons_pressed: [bool; 2],
}

/// Mode, hysteresis and edge state for the pod's controls.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    mode: ControlMode,
    colors: [Rgb; MODE_COUNT],
    last_knobs: [f32; 2],
    last_buttons: [bool; 2],
    last_press: bool,
}

impl Default for ControlSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlSurface {
    /// Start in [`ControlMode::Vco`] with both knobs assumed at zero.
    pub fn new() -> Self {
        Self {
            mode: ControlMode::Vco,
            colors: ControlMode::ALL.map(ControlMode::color),
            last_knobs: [0.0; 2],
            last_buttons: [false; 2],
            last_press: false,
        }
    }

    /// Override the LED 1 colour of each mode, in mode order.
    pub fn set_colors(&mut self, colors: [Rgb; MODE_COUNT]) {
        self.colors = colors;
    }

    /// LED 1 colour of `mode`.
    pub fn color(&self, mode: ControlMode) -> Rgb {
        self.colors[mode.index()]
    }

    /// Current mode.
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Force the mode.
    pub fn set_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
    }

    /// Knob readings from the previous block.
    pub fn last_knobs(&self) -> [f32; 2] {
        self.last_knobs
    }

    /// Poll the controller and report this block's changes.
    ///
    /// Encoder rotation and encoder press both advance the mode. Knob
    /// readings are compared with the previous block's, and every reading
    /// becomes the new reference whether or not it was reported.
    pub fn update<C: PlatformController + ?Sized>(&mut self, controller: &mut C) -> SurfaceUpdate {
        controller.poll();

        let read = |id: ControlId| controller.read_control(id).unwrap_or_default();

        let mut steps = detents(read(pod::ENCODER));
        let press = read(pod::ENCODER_PRESS).is_pressed();
        if press && !self.last_press {
            steps += 1;
        }
        self.last_press = press;

        let previous = self.mode;
        self.mode = self.mode.advance(steps);
        let mode_changed = self.mode != previous;
        if mode_changed {
            #[cfg(feature = "tracing")]
            tracing::debug!(from = previous.name(), to = self.mode.name(), "control mode");
        }

        let mut knobs = [None; 2];
        for (i, id) in pod::KNOBS.into_iter().enumerate() {
            let value = read(id).value;
            if (self.last_knobs[i] - value).abs() > KNOB_HYSTERESIS {
                knobs[i] = Some(value);
            }
            self.last_knobs[i] = value;
        }

        let mut buttons_pressed = [false; 2];
        for (i, id) in pod::BUTTONS.into_iter().enumerate() {
            let down = read(id).is_pressed();
            buttons_pressed[i] = down && !self.last_buttons[i];
            self.last_buttons[i] = down;
        }

        SurfaceUpdate {
            mode: self.mode,
            mode_changed,
            knobs,
            buttons_pressed,
        }
    }

    /// Show the mode colour on LED 1, the constant colour on LED 2, then flush.
    pub fn write_leds<C: PlatformController + ?Sized>(&self, controller: &mut C) {
        for (led, color) in [(0, self.color(self.mode)), (1, LED2_COLOR)] {
            for (id, value) in pod::LEDS[led].into_iter().zip(color.channels()) {
                controller.write_control(id, value);
            }
        }
        controller.flush();
    }
}

fn detents(state: ControlState) -> i32 {
    if state.value > 0.5 {
        1
    } else if state.value < -0.5 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_both_ways() {
        assert_eq!(ControlMode::Vco.advance(1), ControlMode::Filter);
        assert_eq!(ControlMode::Lfo.advance(1), ControlMode::Vco);
        assert_eq!(ControlMode::Vco.advance(-1), ControlMode::Lfo);
        assert_eq!(ControlMode::Filter.advance(-6), ControlMode::Lfo);
        assert_eq!(ControlMode::Envelope.advance(0), ControlMode::Envelope);
    }

    #[test]
    fn mode_colors() {
        assert_eq!(ControlMode::Vco.color(), Rgb::new(1.0, 0.5, 0.0));
        assert_eq!(ControlMode::Filter.color(), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(ControlMode::Envelope.color(), Rgb::new(0.0, 1.0, 0.0));
        assert_eq!(ControlMode::Lfo.color(), Rgb::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn names_round_trip() {
        for mode in ControlMode::ALL {
            assert_eq!(ControlMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(ControlMode::from_name("vca"), None);
    }

    #[test]
    fn detent_sign() {
        assert_eq!(detents(ControlState::new(1.0)), 1);
        assert_eq!(detents(ControlState::new(-1.0)), -1);
        assert_eq!(detents(ControlState::new(0.0)), 0);
    }
}
