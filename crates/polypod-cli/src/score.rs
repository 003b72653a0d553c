//! Score files: timed note, controller and panel events.
//!
//! ```toml
//! name = "arpeggio"
//!
//! [[event]]
//! at = 0.0
//! type = "note_on"
//! note = 60
//!
//! [[event]]
//! at = 0.5
//! type = "cc"
//! controller = 97
//! value = 64
//!
//! [[event]]
//! at = 1.0
//! type = "knob"
//! index = 0
//! value = 0.3
//! ```
//!
//! Times are in seconds from the start of the render.

use anyhow::Context;
use polypod_engine::{EngineEvent, MidiEvent};
use polypod_platform::PanelInput;
use serde::Deserialize;
use std::path::Path;

/// One thing that happens in a score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoreAction {
    NoteOn { note: u8 },
    NoteOff { note: u8 },
    Cc { controller: u8, value: u8 },
    AllNotesOff,
    Knob { index: usize, value: f32 },
    Encoder { detents: i32 },
    EncoderPress { pressed: bool },
    Button { index: usize, pressed: bool },
}

/// Where an action is delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Engine(EngineEvent),
    Panel(PanelInput),
}

impl ScoreAction {
    pub fn target(self) -> Target {
        match self {
            Self::NoteOn { note } => Target::Engine(MidiEvent::NoteOn { note }.into()),
            Self::NoteOff { note } => Target::Engine(MidiEvent::NoteOff { note }.into()),
            Self::Cc { controller, value } => {
                Target::Engine(MidiEvent::ControlChange { controller, value }.into())
            }
            Self::AllNotesOff => Target::Engine(EngineEvent::AllNotesOff),
            Self::Knob { index, value } => Target::Panel(PanelInput::Knob { index, value }),
            Self::Encoder { detents } => Target::Panel(PanelInput::Encoder { detents }),
            Self::EncoderPress { pressed } => Target::Panel(PanelInput::EncoderPress { pressed }),
            Self::Button { index, pressed } => Target::Panel(PanelInput::Button { index, pressed }),
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        match *self {
            Self::NoteOn { note } | Self::NoteOff { note } if note > 127 => {
                anyhow::bail!("note {note} is not a MIDI note")
            }
            Self::Cc { controller, value } if controller > 127 || value > 127 => {
                anyhow::bail!("control change {controller}={value} is not 7-bit")
            }
            Self::Knob { index, .. } | Self::Button { index, .. } if index > 1 => {
                anyhow::bail!("the pod has two knobs and two buttons, got index {index}")
            }
            Self::Knob { value, .. } if !(0.0..=1.0).contains(&value) => {
                anyhow::bail!("knob position {value} outside [0, 1]")
            }
            _ => Ok(()),
        }
    }
}

/// A timed action.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoreEvent {
    /// Seconds from the start.
    pub at: f64,
    #[serde(flatten)]
    pub action: ScoreAction,
}

/// A score file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub name: Option<String>,
    /// Minimum length in seconds; the last event sets it otherwise.
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default, rename = "event")]
    pub events: Vec<ScoreEvent>,
}

impl Score {
    /// Load and check a score file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read score {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid score {}", path.display()))
    }

    /// Parse and check a score; events come back in time order.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let mut score: Self = toml::from_str(content)?;
        for event in &score.events {
            if !(event.at.is_finite() && event.at >= 0.0) {
                anyhow::bail!("event time {} must be a non-negative number of seconds", event.at);
            }
            event.action.check()?;
        }
        if let Some(length) = score.length
            && !(length.is_finite() && length >= 0.0)
        {
            anyhow::bail!("score length {length} must be a non-negative number of seconds");
        }
        score.events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(score)
    }

    /// A single held note.
    pub fn held_note(note: u8) -> Self {
        Self {
            name: Some(format!("note {note}")),
            length: None,
            events: vec![ScoreEvent {
                at: 0.0,
                action: ScoreAction::NoteOn { note },
            }],
        }
    }

    /// Seconds until the later of the last event and `length`.
    pub fn duration(&self) -> f64 {
        let last = self.events.last().map_or(0.0, |e| e.at);
        self.length.map_or(last, |len| len.max(last))
    }

    /// Frame index of each event at `sample_rate`.
    pub fn frames(&self, sample_rate: f32) -> impl Iterator<Item = (u64, ScoreAction)> + '_ {
        let sr = f64::from(sample_rate);
        self.events
            .iter()
            .map(move |e| ((e.at * sr).round() as u64, e.action))
    }
}
