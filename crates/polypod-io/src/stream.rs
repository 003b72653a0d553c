//! Real-time synthesizer output via cpal.
//!
//! The audio callback owns the [`RenderLoop`] and a [`VirtualPanel`]. Two
//! lock-free queues reach it from the control thread: engine events
//! ([`polypod_engine::event_queue`]) and panel gestures ([`panel_queue`]).

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, Stream};
use polypod_engine::{EngineEvent, EventReceiver, RenderLoop};
use polypod_platform::{PanelInput, PlatformController, VirtualPanel};
use rtrb::{Consumer, Producer, RingBuffer};

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Output device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Whether this is the host's default output.
    pub is_default: bool,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub channels: u16,
}

fn describe(device: &Device, default_name: Option<&str>) -> Option<AudioDevice> {
    let name = device_name(device).ok()?;
    let (default_sample_rate, channels) = device
        .default_output_config()
        .map(|c| (c.sample_rate(), c.channels()))
        .unwrap_or((48000, 2));
    Some(AudioDevice {
        is_default: default_name == Some(name.as_str()),
        name,
        default_sample_rate,
        channels,
    })
}

/// List the output devices of the default host.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let default_name = host.default_output_device().and_then(|d| device_name(&d).ok());
    let outputs = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;

    Ok(outputs
        .filter_map(|d| describe(&d, default_name.as_deref()))
        .collect())
}

/// The default output device, if the host has one.
pub fn default_output_device() -> Option<AudioDevice> {
    let device = cpal::default_host().default_output_device()?;
    let name = device_name(&device).ok()?;
    describe(&device, Some(name.as_str()))
}

/// Find an output device by index, exact name, or partial name
/// (case-insensitive).
fn find_output_device(host: &Host, name_or_index: &str) -> Result<Device> {
    let devices: Vec<_> = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
        .collect();

    if let Ok(index) = name_or_index.parse::<usize>() {
        return devices.get(index).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "output device index {} (only {} devices available)",
                index,
                devices.len()
            ))
        });
    }

    if let Some(device) = devices
        .iter()
        .find(|d| device_name(d).is_ok_and(|n| n == name_or_index))
    {
        return Ok(device.clone());
    }

    let search_lower = name_or_index.to_lowercase();
    let mut matches: Vec<_> = devices
        .iter()
        .filter_map(|d| {
            device_name(d)
                .ok()
                .filter(|name| name.to_lowercase().contains(&search_lower))
                .map(|name| (d.clone(), name))
        })
        .collect();

    match matches.len() {
        0 => Err(Error::DeviceNotFound(format!(
            "no output device matching '{name_or_index}'"
        ))),
        1 => Ok(matches.remove(0).0),
        _ => {
            let names: Vec<_> = matches.iter().map(|(_, n)| n.as_str()).collect();
            tracing::warn!(
                search = name_or_index,
                ?names,
                "multiple output devices match, using the first"
            );
            Ok(matches.remove(0).0)
        }
    }
}

/// Copy interleaved stereo into a buffer of `channels` interleaved channels.
///
/// Mono output gets the average of left and right; extra channels beyond
/// the first two are silenced. Frames beyond the shorter buffer are left
/// untouched.
pub fn spread_stereo(stereo: &[f32], out: &mut [f32], channels: usize) {
    if channels == 0 {
        return;
    }
    for (frame, dst) in stereo.chunks_exact(2).zip(out.chunks_exact_mut(channels)) {
        match dst {
            [mono] => *mono = (frame[0] + frame[1]) * 0.5,
            [l, r, rest @ ..] => {
                *l = frame[0];
                *r = frame[1];
                rest.fill(0.0);
            }
            [] => {}
        }
    }
}

/// Stereo frames rendered per pass for devices that are not stereo.
pub const SCRATCH_FRAMES: usize = 1024;

/// Render into a device buffer of `channels` interleaved channels.
///
/// Stereo buffers are rendered in place. Any other layout is rendered into
/// `scratch` at most `scratch.len() / 2` frames at a time and spread with
/// [`spread_stereo`]; `scratch` is never resized.
pub fn render_interleaved<const N: usize, P, R>(
    render: &mut RenderLoop<N>,
    panel: &mut P,
    events: &mut R,
    scratch: &mut [f32],
    data: &mut [f32],
    channels: usize,
) where
    P: PlatformController + ?Sized,
    R: EventReceiver + ?Sized,
{
    if channels == 2 {
        render.render(panel, events, data);
        return;
    }
    let frames_per_pass = scratch.len() / 2;
    if channels == 0 || frames_per_pass == 0 {
        data.fill(0.0);
        return;
    }
    for chunk in data.chunks_mut(frames_per_pass * channels) {
        let frames = chunk.len() / channels;
        let stereo = &mut scratch[..frames * 2];
        render.render(panel, events, stereo);
        spread_stereo(stereo, chunk, channels);
        chunk[frames * channels..].fill(0.0);
    }
}

/// Sending half of a [`panel_queue`].
#[derive(Debug)]
pub struct PanelSender {
    producer: Producer<PanelInput>,
}

impl PanelSender {
    /// Queue a gesture. Returns `false` if the queue was full.
    pub fn send(&mut self, input: PanelInput) -> bool {
        match self.producer.push(input) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(?input, "panel queue full, dropping");
                false
            }
        }
    }

    /// True once the audio side has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.producer.is_abandoned()
    }
}

/// Queue carrying panel gestures to the audio thread.
pub fn panel_queue(capacity: usize) -> (PanelSender, Consumer<PanelInput>) {
    let (producer, consumer) = RingBuffer::new(capacity);
    (PanelSender { producer }, consumer)
}

/// A running output stream rendering the synthesizer.
///
/// Audio stops when this is dropped.
pub struct SynthStream {
    _stream: Stream,
    device_name: String,
    sample_rate: u32,
    channels: u16,
}

impl SynthStream {
    /// Open `device` (default output when `None`) and start rendering.
    ///
    /// The render loop is retuned to the device's sample rate if it differs.
    pub fn start<const N: usize>(
        device: Option<&str>,
        mut render: RenderLoop<N>,
        mut events: Consumer<EngineEvent>,
        mut panel_rx: Consumer<PanelInput>,
    ) -> Result<Self> {
        let host = cpal::default_host();
        let device = match device {
            Some(name) => find_output_device(&host, name)?,
            None => host.default_output_device().ok_or(Error::NoDevice)?,
        };
        let device_name = device_name(&device).unwrap_or_else(|_| "<unnamed>".to_string());

        let config = device
            .default_output_config()
            .map_err(|e| Error::Stream(e.to_string()))?;
        let sample_rate = config.sample_rate();
        let channels = config.channels();

        let engine_rate = render.engine().sample_rate();
        if (engine_rate - sample_rate as f32).abs() > f32::EPSILON {
            tracing::info!(from = engine_rate, to = sample_rate, "retuning engine to device rate");
            render.engine_mut().set_sample_rate(sample_rate as f32);
        }

        let channel_count = usize::from(channels);
        let mut panel = VirtualPanel::new();
        let mut scratch = vec![0.0f32; SCRATCH_FRAMES * 2];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    while let Ok(input) = panel_rx.pop() {
                        panel.apply(input);
                    }
                    render_interleaved(
                        &mut render,
                        &mut panel,
                        &mut events,
                        &mut scratch,
                        data,
                        channel_count,
                    );
                },
                |err| tracing::error!(%err, "output stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(device = %device_name, sample_rate, channels, "output stream started");

        Ok(Self {
            _stream: stream,
            device_name,
            sample_rate,
            channels,
        })
    }

    /// Name of the device being played.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Device sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Device channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}
