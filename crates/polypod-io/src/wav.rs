//! WAV file reading and writing.
//!
//! Audio travels as interleaved stereo `f32`, the layout
//! [`RenderLoop::render`](polypod_engine::RenderLoop::render) produces.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Whether samples are IEEE floats rather than integers.
    pub is_float: bool,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.len()) / u64::from(spec.channels.max(1));

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate),
        is_float: spec.sample_format == SampleFormat::Float,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32; 32 is written as float).
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// 32-bit float stereo at `sample_rate`.
    pub fn stereo(sample_rate: u32) -> Self {
        Self {
            channels: 2,
            sample_rate,
            bits_per_sample: 32,
        }
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self::stereo(48000)
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

fn int_scale(bits: u16) -> f32 {
    (1i64 << (bits - 1)) as f32
}

fn write_samples<W>(writer: &mut WavWriter<W>, samples: &[f32], bits: u16) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    if bits == 32 {
        for &sample in samples {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = int_scale(bits);
        for &sample in samples {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }
    Ok(())
}

/// Write interleaved stereo samples to a WAV file.
///
/// The channel count of `spec` is forced to 2. A trailing odd sample is
/// dropped.
///
/// # Example
/// ```ignore
/// let samples = vec![0.0f32; 2 * 48000]; // 1 second of stereo silence
/// write_wav_stereo("output.wav", &samples, WavSpec::stereo(48000))?;
/// ```
pub fn write_wav_stereo<P: AsRef<Path>>(path: P, interleaved: &[f32], spec: WavSpec) -> Result<()> {
    let spec = WavSpec { channels: 2, ..spec };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    let whole = interleaved.len() - interleaved.len() % 2;
    write_samples(&mut writer, &interleaved[..whole], spec.bits_per_sample)?;
    writer.finalize()?;
    Ok(())
}

/// Read a WAV file as interleaved stereo along with its spec.
///
/// Mono files are expanded to stereo by duplicating to both channels.
/// Files with more than 2 channels use only the first two channels.
/// The returned spec describes the file, not the returned samples.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));

    let all_samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = int_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let stereo = match channels {
        1 => all_samples.iter().flat_map(|&s| [s, s]).collect(),
        2 => all_samples,
        _ => all_samples
            .chunks_exact(channels)
            .flat_map(|frame| [frame[0], frame[1]])
            .collect(),
    };

    Ok((stereo, spec))
}

/// Stereo WAV writer fed one block at a time.
///
/// Offline renders stream through this instead of holding the whole take
/// in memory.
pub struct StereoWavWriter {
    writer: WavWriter<BufWriter<File>>,
    bits_per_sample: u16,
    frames: u64,
}

impl StereoWavWriter {
    /// Create `path` as a 32-bit float stereo file.
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Self> {
        Self::with_spec(path, WavSpec::stereo(sample_rate))
    }

    /// Create `path` with an explicit bit depth; channels are forced to 2.
    pub fn with_spec<P: AsRef<Path>>(path: P, spec: WavSpec) -> Result<Self> {
        let spec = WavSpec { channels: 2, ..spec };
        let writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
        Ok(Self {
            writer,
            bits_per_sample: spec.bits_per_sample,
            frames: 0,
        })
    }

    /// Append interleaved stereo frames. A trailing odd sample is dropped.
    pub fn write_frames(&mut self, interleaved: &[f32]) -> Result<()> {
        let whole = interleaved.len() - interleaved.len() % 2;
        write_samples(&mut self.writer, &interleaved[..whole], self.bits_per_sample)?;
        self.frames += (whole / 2) as u64;
        Ok(())
    }

    /// Frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Patch the header and close the file.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}
