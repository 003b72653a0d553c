//! polypod engine - the playable synthesizer
//!
//! Ties the voice pool, the vibrato LFO and the effects chain together and
//! drives them from MIDI events and the pod's controls.
//!
//! # Components
//!
//! - [`SynthEngine`] - Voices, LFO and effects advanced one stereo frame at a time
//! - [`ParameterRouter`] / [`CcMap`] - MIDI controller to parameter routing
//! - [`ModeTable`] / [`KnobBinding`] - What the knobs do in each control mode
//! - [`RenderLoop`] - Block loop: events, controls, LEDs, audio
//! - [`EventReceiver`] - Where the render loop pulls events from
//!
//! ```rust
//! use polypod_engine::{EngineSettings, MidiEvent, NoEvents, RenderLoop, SynthParam};
//! use polypod_platform::VirtualPanel;
//!
//! let mut render: RenderLoop = RenderLoop::new(&EngineSettings::new(48000.0));
//! render.handle(MidiEvent::NoteOn { note: 60 }.into());
//! render.handle(MidiEvent::ControlChange { controller: 97, value: 64 }.into());
//! assert!((render.engine().get(SynthParam::Cutoff) - 329.63).abs() < 0.01);
//!
//! let mut panel = VirtualPanel::new();
//! let mut out = vec![0.0f32; 2 * 512];
//! render.render(&mut panel, &mut NoEvents, &mut out);
//! ```
//!
//! # Features
//!
//! - `std` (default) - `VecDeque` event source
//! - `rtrb` - lock-free [`event_queue`] for feeding the audio thread
//! - `tracing` - debug events for mode changes, buttons and voice stealing

#![cfg_attr(not(feature = "std"), no_std)]

pub mod engine;
pub mod event;
pub mod modes;
pub mod param;
pub mod queue;
pub mod render;
pub mod router;
pub mod settings;

pub use engine::SynthEngine;
pub use event::{EngineEvent, MidiEvent};
pub use modes::{ButtonAction, KnobBinding, ModeBinding, ModeTable};
pub use param::{PARAM_COUNT, SynthParam};
#[cfg(feature = "rtrb")]
pub use queue::{EventSender, event_queue};
pub use queue::{EventReceiver, NoEvents};
pub use render::{MAX_EVENTS_PER_BLOCK, RenderLoop};
pub use router::{CcMap, ParameterRouter};
pub use settings::{DEFAULT_BLOCK_SIZE, EngineSettings};
