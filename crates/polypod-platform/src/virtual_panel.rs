//! An in-memory pod.
//!
//! Inputs are set by the host (a score, a test, a desktop UI) and become
//! visible to readers on the next [`poll`](PlatformController::poll). LED
//! writes are staged and only show up in [`VirtualPanel::led`] after
//! [`flush`](PlatformController::flush), like the hardware.

use crate::{ControlId, ControlState, ControlType, PlatformController, Rgb, pod};

/// A host-side gesture on the virtual pod.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelInput {
    /// Move a knob.
    Knob {
        /// Knob 0 or 1.
        index: usize,
        /// Position in `[0, 1]`.
        value: f32,
    },
    /// Turn the encoder by some detents.
    Encoder {
        /// Signed detent count.
        detents: i32,
    },
    /// Hold or release the encoder switch.
    EncoderPress {
        /// Switch level.
        pressed: bool,
    },
    /// Hold or release a button.
    Button {
        /// Button 0 or 1.
        index: usize,
        /// Switch level.
        pressed: bool,
    },
}

/// Virtual pod controls.
///
/// ```rust
/// use polypod_platform::{PlatformController, VirtualPanel, pod};
///
/// let mut panel = VirtualPanel::new();
/// panel.set_knob(0, 0.75);
/// panel.poll();
/// assert_eq!(panel.read_control(pod::KNOBS[0]).map(|s| s.value), Some(0.75));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VirtualPanel {
    knobs: [ControlState; 2],
    pending_knobs: [f32; 2],
    encoder: ControlState,
    pending_detents: i32,
    encoder_press: ControlState,
    pending_press: bool,
    buttons: [ControlState; 2],
    pending_buttons: [bool; 2],
    staged_leds: [Rgb; 2],
    leds: [Rgb; 2],
    flushes: u64,
}

impl VirtualPanel {
    /// All controls at rest, LEDs off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move knob `index` (0 or 1) to `value`, clamped to `[0, 1]`.
    pub fn set_knob(&mut self, index: usize, value: f32) {
        if let Some(knob) = self.pending_knobs.get_mut(index) {
            *knob = value.clamp(0.0, 1.0);
        }
    }

    /// Queue encoder detents; each poll delivers one.
    pub fn turn_encoder(&mut self, detents: i32) {
        self.pending_detents = self.pending_detents.saturating_add(detents);
    }

    /// Hold or release the encoder switch.
    pub fn set_encoder_pressed(&mut self, pressed: bool) {
        self.pending_press = pressed;
    }

    /// Hold or release button `index` (0 or 1).
    pub fn set_button(&mut self, index: usize, pressed: bool) {
        if let Some(button) = self.pending_buttons.get_mut(index) {
            *button = pressed;
        }
    }

    /// Apply a host gesture.
    pub fn apply(&mut self, input: PanelInput) {
        match input {
            PanelInput::Knob { index, value } => self.set_knob(index, value),
            PanelInput::Encoder { detents } => self.turn_encoder(detents),
            PanelInput::EncoderPress { pressed } => self.set_encoder_pressed(pressed),
            PanelInput::Button { index, pressed } => self.set_button(index, pressed),
        }
    }

    /// Latched value of knob `index`.
    pub fn knob(&self, index: usize) -> f32 {
        self.knobs.get(index).map_or(0.0, |s| s.value)
    }

    /// Encoder detents not yet delivered.
    pub fn pending_detents(&self) -> i32 {
        self.pending_detents
    }

    /// Colour LED `index` showed at the last flush.
    pub fn led(&self, index: usize) -> Rgb {
        self.leds.get(index).copied().unwrap_or(Rgb::OFF)
    }

    /// Number of flushes so far.
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    fn input_state(&self, id: ControlId) -> Option<&ControlState> {
        match id {
            id if id == pod::KNOBS[0] => Some(&self.knobs[0]),
            id if id == pod::KNOBS[1] => Some(&self.knobs[1]),
            id if id == pod::ENCODER => Some(&self.encoder),
            id if id == pod::ENCODER_PRESS => Some(&self.encoder_press),
            id if id == pod::BUTTONS[0] => Some(&self.buttons[0]),
            id if id == pod::BUTTONS[1] => Some(&self.buttons[1]),
            _ => None,
        }
    }
}

fn level(pressed: bool) -> f32 {
    if pressed { 1.0 } else { 0.0 }
}

impl PlatformController for VirtualPanel {
    fn control_count(&self) -> usize {
        pod::ALL.len()
    }

    fn control_id(&self, index: usize) -> Option<ControlId> {
        pod::ALL.get(index).copied()
    }

    fn control_type(&self, id: ControlId) -> Option<ControlType> {
        pod::control_type(id)
    }

    fn read_control(&self, id: ControlId) -> Option<ControlState> {
        self.input_state(id).copied()
    }

    fn write_control(&mut self, id: ControlId, value: f32) -> bool {
        let Some((led, channel)) = pod::led_channel(id) else {
            return false;
        };
        let value = value.clamp(0.0, 1.0);
        let rgb = &mut self.staged_leds[led];
        match channel {
            0 => rgb.r = value,
            1 => rgb.g = value,
            _ => rgb.b = value,
        }
        true
    }

    fn poll(&mut self) {
        for (state, &pending) in self.knobs.iter_mut().zip(&self.pending_knobs) {
            state.clear_changed();
            state.set(pending);
        }

        let step = self.pending_detents.signum();
        self.pending_detents -= step;
        self.encoder.clear_changed();
        self.encoder.set(step as f32);

        self.encoder_press.clear_changed();
        self.encoder_press.set(level(self.pending_press));

        for (state, &pending) in self.buttons.iter_mut().zip(&self.pending_buttons) {
            state.clear_changed();
            state.set(level(pending));
        }
    }

    fn flush(&mut self) {
        self.leds = self.staged_leds;
        self.flushes += 1;
    }
}
