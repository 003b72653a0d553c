//! Events the engine consumes.
//!
//! Decoding MIDI bytes is the transport's job; the engine only sees
//! [`MidiEvent`]s. Values are expected in `0..=127` and are masked to seven
//! bits before use.

/// A decoded channel-voice message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MidiEvent {
    /// Key pressed.
    NoteOn {
        /// Note number.
        note: u8,
    },
    /// Key released.
    NoteOff {
        /// Note number.
        note: u8,
    },
    /// Controller moved.
    ControlChange {
        /// Controller number.
        controller: u8,
        /// Controller value.
        value: u8,
    },
}

impl MidiEvent {
    /// The same event with every data byte masked to seven bits.
    #[must_use]
    pub const fn masked(self) -> Self {
        match self {
            Self::NoteOn { note } => Self::NoteOn { note: note & 0x7F },
            Self::NoteOff { note } => Self::NoteOff { note: note & 0x7F },
            Self::ControlChange { controller, value } => Self::ControlChange {
                controller: controller & 0x7F,
                value: value & 0x7F,
            },
        }
    }
}

/// Anything the render loop can be told between blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineEvent {
    /// A MIDI message.
    Midi(MidiEvent),
    /// Free every voice; envelopes release naturally.
    AllNotesOff,
}

impl From<MidiEvent> for EngineEvent {
    fn from(event: MidiEvent) -> Self {
        Self::Midi(event)
    }
}
