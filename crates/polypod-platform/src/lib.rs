//! polypod platform - control surface abstraction for the pod
//!
//! The pod has two knobs, a push encoder, two momentary buttons and two RGB
//! LEDs. This crate names those controls, reads them through the
//! [`PlatformController`] trait and turns raw readings into block-rate
//! decisions (mode changes, knob moves past the hysteresis threshold, button
//! edges).
//!
//! # Core Abstractions
//!
//! ## Control System
//!
//! - [`ControlId`] - Namespaced control identifier (hardware, virtual, MIDI)
//! - [`ControlType`] - Knob, encoder, button or LED
//! - [`ControlState`] - Current control state with change flag
//! - [`PlatformController`] - Trait for hardware/software implementations
//!
//! ## Pod
//!
//! - [`pod`] - Control ids of the pod layout
//! - [`ControlMode`] - Which page the knobs currently edit
//! - [`ControlSurface`] - Block-rate edge detection and LED output
//! - [`VirtualPanel`] - In-memory pod for tests and desktop hosts
//!
//! # Control ID Namespaces
//!
//! - `0x00XX` - Hardware controls (physical knobs, buttons, LEDs)
//! - `0x01XX` - Virtual controls (desktop panel, scripted scores)
//! - `0x02XX` - MIDI controls (CC messages)
//!
//! # Example
//!
//! ```rust
//! use polypod_platform::{ControlMode, ControlSurface, VirtualPanel};
//!
//! let mut panel = VirtualPanel::new();
//! let mut surface = ControlSurface::new();
//!
//! panel.turn_encoder(1);
//! let update = surface.update(&mut panel);
//! assert_eq!(update.mode, ControlMode::Filter);
//!
//! surface.write_leds(&mut panel);
//! assert_eq!(panel.led(0), ControlMode::Filter.color());
//! ```
//!
//! # no_std Support
//!
//! ```toml
//! [dependencies]
//! polypod-platform = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod pod;
pub mod surface;
pub mod virtual_panel;

pub use surface::{
    ControlMode, ControlSurface, KNOB_HYSTERESIS, LED2_COLOR, MODE_COUNT, Rgb, SurfaceUpdate,
};
pub use virtual_panel::{PanelInput, VirtualPanel};

/// Namespace identifiers for control sources.
pub mod namespace {
    /// Hardware controls (physical knobs, buttons, LEDs on the device).
    pub const HARDWARE: u16 = 0x0000;
    /// Virtual controls (desktop panel, scripted scores).
    pub const VIRTUAL: u16 = 0x0100;
    /// MIDI controls (CC messages).
    pub const MIDI: u16 = 0x0200;
}

/// A namespaced control identifier.
///
/// The high byte is the namespace, the low byte the control index within
/// it.
///
/// # Example
///
/// ```rust
/// use polypod_platform::ControlId;
///
/// let knob = ControlId::hardware(0x00);
/// assert_eq!(knob.raw(), 0x0000);
/// assert!(knob.is_hardware());
///
/// let cc = ControlId::midi(97);
/// assert_eq!(cc.raw(), 0x0261);
/// assert!(cc.is_midi());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(u16);

impl ControlId {
    /// Creates a ControlId from a raw 16-bit value.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Creates a hardware control ID (namespace 0x00XX).
    #[inline]
    pub const fn hardware(index: u8) -> Self {
        Self(namespace::HARDWARE | index as u16)
    }

    /// Creates a virtual control ID (namespace 0x01XX).
    #[inline]
    pub const fn virtual_control(index: u8) -> Self {
        Self(namespace::VIRTUAL | index as u16)
    }

    /// Creates a MIDI control ID (namespace 0x02XX).
    #[inline]
    pub const fn midi(index: u8) -> Self {
        Self(namespace::MIDI | index as u16)
    }

    /// Returns the raw 16-bit value.
    #[inline]
    pub const fn raw(&self) -> u16 {
        self.0
    }

    /// Returns the namespace portion (high byte).
    #[inline]
    pub const fn namespace(&self) -> u16 {
        self.0 & 0xFF00
    }

    /// Returns the index within the namespace (low byte).
    #[inline]
    pub const fn index(&self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// Returns true if this is a hardware control.
    #[inline]
    pub const fn is_hardware(&self) -> bool {
        self.namespace() == namespace::HARDWARE
    }

    /// Returns true if this is a virtual control.
    #[inline]
    pub const fn is_virtual(&self) -> bool {
        self.namespace() == namespace::VIRTUAL
    }

    /// Returns true if this is a MIDI control.
    #[inline]
    pub const fn is_midi(&self) -> bool {
        self.namespace() == namespace::MIDI
    }
}

/// Physical or virtual control type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    /// Rotary knob with continuous value (0.0 to 1.0).
    Knob,
    /// Detented rotary encoder; the value is the step since the last poll
    /// (-1.0, 0.0 or 1.0).
    Encoder,
    /// Momentary push button (pressed = 1.0, released = 0.0).
    Button,
    /// One colour channel of an RGB LED (0.0 = off, 1.0 = full brightness).
    Led,
}

impl ControlType {
    /// Returns the number of discrete positions for this control type.
    ///
    /// Returns `None` for continuous controls (Knob, Led).
    ///
    /// ```rust
    /// use polypod_platform::ControlType;
    ///
    /// assert_eq!(ControlType::Button.discrete_positions(), Some(2));
    /// assert_eq!(ControlType::Encoder.discrete_positions(), Some(3));
    /// assert_eq!(ControlType::Knob.discrete_positions(), None);
    /// ```
    #[inline]
    pub const fn discrete_positions(&self) -> Option<u8> {
        match self {
            ControlType::Knob | ControlType::Led => None,
            ControlType::Encoder => Some(3),
            ControlType::Button => Some(2),
        }
    }

    /// Returns true if this is an output control (LED).
    #[inline]
    pub const fn is_output(&self) -> bool {
        matches!(self, ControlType::Led)
    }

    /// Returns true if this is an input control.
    #[inline]
    pub const fn is_input(&self) -> bool {
        !self.is_output()
    }
}

/// Current state of a control.
///
/// # Value Range
///
/// - **Knob**: 0.0 = fully counter-clockwise, 1.0 = fully clockwise
/// - **Encoder**: -1.0, 0.0 or 1.0 detents since the last poll
/// - **Button**: 0.0 = released, 1.0 = pressed
/// - **LED**: 0.0 = off, 1.0 = full brightness
///
/// ```rust
/// use polypod_platform::ControlState;
///
/// let mut state = ControlState::new(0.25);
/// assert!(!state.changed);
/// state.set(0.5);
/// assert!(state.changed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Control value.
    pub value: f32,
    /// True if the value has changed since last read.
    pub changed: bool,
}

impl ControlState {
    /// Creates a new control state with the given value (not marked as changed).
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self {
            value,
            changed: false,
        }
    }

    /// Creates a control state marked as changed.
    #[inline]
    pub const fn changed(value: f32) -> Self {
        Self {
            value,
            changed: true,
        }
    }

    /// Clears the changed flag.
    #[inline]
    pub fn clear_changed(&mut self) {
        self.changed = false;
    }

    /// Sets a new value and marks the state as changed if different.
    #[inline]
    pub fn set(&mut self, value: f32) {
        const EPSILON: f32 = 1e-6;
        if (self.value - value).abs() > EPSILON {
            self.value = value;
            self.changed = true;
        }
    }

    /// True when the value reads as a pressed button.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.value >= 0.5
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Trait for platform-specific controller implementations.
///
/// Implemented by the firmware's board support and by [`VirtualPanel`].
/// The render loop calls [`poll`](Self::poll) once per audio block, reads
/// the input controls, writes the LEDs and finishes with
/// [`flush`](Self::flush).
pub trait PlatformController {
    /// Returns the total number of controls on this platform.
    fn control_count(&self) -> usize;

    /// Returns the control ID at the given index.
    ///
    /// Returns `None` if `index >= control_count()`.
    fn control_id(&self, index: usize) -> Option<ControlId>;

    /// Returns the type of the specified control.
    fn control_type(&self, id: ControlId) -> Option<ControlType>;

    /// Reads the current state of a control.
    ///
    /// Returns `None` if the control ID is not recognized or is not readable.
    fn read_control(&self, id: ControlId) -> Option<ControlState>;

    /// Writes a value to an output control (LED channel).
    ///
    /// Returns `false` if the control is not writable or not recognized.
    fn write_control(&mut self, id: ControlId, value: f32) -> bool;

    /// Latch fresh readings from hardware/OS.
    fn poll(&mut self) {}

    /// Push pending output changes (LEDs) to hardware/OS.
    fn flush(&mut self) {}
}
