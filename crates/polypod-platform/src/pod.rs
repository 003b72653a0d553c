//! Control layout of the pod.
//!
//! | Control | Id | Type |
//! |---------|----|------|
//! | knob 1 | `0x0000` | Knob |
//! | knob 2 | `0x0001` | Knob |
//! | encoder turn | `0x0010` | Encoder |
//! | encoder press | `0x0011` | Button |
//! | button 1 | `0x0020` | Button |
//! | button 2 | `0x0021` | Button |
//! | LED 1 r/g/b | `0x0030..=0x0032` | Led |
//! | LED 2 r/g/b | `0x0033..=0x0035` | Led |

use crate::{ControlId, ControlType};

/// Knobs, in panel order.
pub const KNOBS: [ControlId; 2] = [ControlId::hardware(0x00), ControlId::hardware(0x01)];

/// Encoder rotation.
pub const ENCODER: ControlId = ControlId::hardware(0x10);

/// Encoder push switch.
pub const ENCODER_PRESS: ControlId = ControlId::hardware(0x11);

/// Buttons, in panel order.
pub const BUTTONS: [ControlId; 2] = [ControlId::hardware(0x20), ControlId::hardware(0x21)];

/// Red, green and blue channels of each LED.
pub const LEDS: [[ControlId; 3]; 2] = [
    [
        ControlId::hardware(0x30),
        ControlId::hardware(0x31),
        ControlId::hardware(0x32),
    ],
    [
        ControlId::hardware(0x33),
        ControlId::hardware(0x34),
        ControlId::hardware(0x35),
    ],
];

/// Every control, inputs first.
pub const ALL: [ControlId; 12] = [
    KNOBS[0],
    KNOBS[1],
    ENCODER,
    ENCODER_PRESS,
    BUTTONS[0],
    BUTTONS[1],
    LEDS[0][0],
    LEDS[0][1],
    LEDS[0][2],
    LEDS[1][0],
    LEDS[1][1],
    LEDS[1][2],
];

/// Type of a pod control, `None` for ids outside the layout.
pub const fn control_type(id: ControlId) -> Option<ControlType> {
    if !id.is_hardware() {
        return None;
    }
    match id.index() {
        0x00 | 0x01 => Some(ControlType::Knob),
        0x10 => Some(ControlType::Encoder),
        0x11 | 0x20 | 0x21 => Some(ControlType::Button),
        0x30..=0x35 => Some(ControlType::Led),
        _ => None,
    }
}

/// LED index and colour channel of an LED control id.
pub const fn led_channel(id: ControlId) -> Option<(usize, usize)> {
    if !id.is_hardware() {
        return None;
    }
    match id.index() {
        i @ 0x30..=0x35 => {
            let offset = (i - 0x30) as usize;
            Some((offset / 3, offset % 3))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_control_has_a_type() {
        for id in ALL {
            assert!(control_type(id).is_some(), "{id:?}");
        }
        assert_eq!(control_type(ControlId::hardware(0x40)), None);
        assert_eq!(control_type(ControlId::midi(0x00)), None);
    }

    #[test]
    fn led_channels() {
        assert_eq!(led_channel(LEDS[0][0]), Some((0, 0)));
        assert_eq!(led_channel(LEDS[1][2]), Some((1, 2)));
        assert_eq!(led_channel(KNOBS[0]), None);
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
