//! Audio I/O for the polypod synthesizer.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`write_wav_stereo`], [`read_wav_stereo`] and the
//!   incremental [`StereoWavWriter`] for offline renders
//! - **Real-time output**: [`SynthStream`] runs a [`RenderLoop`] inside a cpal
//!   output callback, fed by lock-free queues
//! - **Devices**: [`list_devices`] for choosing an output
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use polypod_engine::{EngineSettings, MidiEvent, RenderLoop, event_queue};
//! use polypod_io::{SynthStream, panel_queue};
//!
//! let render: RenderLoop = RenderLoop::new(&EngineSettings::new(48000.0));
//! let (mut events, consumer) = event_queue(256);
//! let (_panel, panel_rx) = panel_queue(64);
//!
//! let stream = SynthStream::start(None, render, consumer, panel_rx)?;
//! events.send(MidiEvent::NoteOn { note: 60 });
//! ```
//!
//! [`RenderLoop`]: polypod_engine::RenderLoop

mod stream;
mod wav;

pub use stream::{
    AudioDevice, PanelSender, SCRATCH_FRAMES, SynthStream, default_output_device, list_devices,
    panel_queue, render_interleaved, spread_stereo,
};
pub use wav::{StereoWavWriter, WavInfo, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
