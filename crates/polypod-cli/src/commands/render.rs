//! Offline rendering of a score to a WAV file.

use super::common::{linear_to_db, load_settings, peak};
use crate::score::{Score, Target};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use polypod_engine::{EngineEvent, EngineSettings, RenderLoop};
use polypod_io::{StereoWavWriter, WavSpec};
use polypod_platform::VirtualPanel;
use std::collections::VecDeque;
use std::path::PathBuf;

/// Frames written to the file per write call.
const WRITE_CHUNK: usize = 4096;

#[derive(Args)]
pub struct RenderArgs {
    /// Score file (TOML)
    #[arg(value_name = "SCORE")]
    score: PathBuf,

    /// Output WAV file
    #[arg(short, long, value_name = "WAV")]
    output: PathBuf,

    /// Configuration name or path
    #[arg(short, long)]
    config: Option<String>,

    /// Seconds rendered after the last event
    #[arg(long, default_value = "1.0")]
    tail: f64,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("Unsupported bit depth {} (use 16, 24, or 32)", args.bit_depth);
    }
    if !(args.tail.is_finite() && args.tail >= 0.0) {
        anyhow::bail!("--tail must be a non-negative number of seconds");
    }

    let score = Score::load(&args.score)?;
    let (config, settings) = load_settings(args.config.as_deref())?;

    println!(
        "Rendering {} with '{}' ({} events)...",
        score.name.as_deref().unwrap_or("score"),
        config.name,
        score.events.len()
    );

    let spec = WavSpec {
        channels: 2,
        sample_rate: config.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    let mut writer = StereoWavWriter::with_spec(&args.output, spec)?;
    let total_frames = ((score.duration() + args.tail) * f64::from(config.sample_rate)).ceil() as u64;

    let pb = ProgressBar::new(total_frames);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let peak_level = render_score(&score, &settings, total_frames, |chunk, frames_done| {
        writer.write_frames(chunk)?;
        pb.set_position(frames_done);
        Ok(())
    })?;

    pb.finish_with_message("done");
    writer.finalize()?;

    println!(
        "\n  {} frames, {} Hz, {:.2}s, peak {:.1} dB",
        total_frames,
        config.sample_rate,
        total_frames as f64 / f64::from(config.sample_rate),
        linear_to_db(peak_level)
    );
    println!("Wrote {}", args.output.display());

    Ok(())
}

/// Render `total_frames` of `score`, handing interleaved chunks to `sink`.
///
/// Events land at the first control block starting at or after their frame,
/// at most [`polypod_engine::MAX_EVENTS_PER_BLOCK`] of them per block.
/// Returns the peak absolute sample.
pub fn render_score<F>(
    score: &Score,
    settings: &EngineSettings,
    total_frames: u64,
    mut sink: F,
) -> anyhow::Result<f32>
where
    F: FnMut(&[f32], u64) -> anyhow::Result<()>,
{
    let mut render: RenderLoop = RenderLoop::new(settings);
    let mut panel = VirtualPanel::new();
    let mut queue: VecDeque<EngineEvent> = VecDeque::new();
    let mut timeline = score.frames(settings.sample_rate).peekable();

    let block = render.block_size();
    let chunk_frames = (WRITE_CHUNK / block).max(1) * block;
    let mut buffer = vec![0.0f32; chunk_frames * 2];
    let mut peak_level = 0.0f32;
    let mut frame = 0u64;

    while frame < total_frames {
        let frames = chunk_frames.min((total_frames - frame) as usize);
        let out = &mut buffer[..frames * 2];

        for slice in out.chunks_mut(block * 2) {
            while let Some((_, action)) = timeline.next_if(|&(at, _)| at <= frame) {
                match action.target() {
                    Target::Engine(event) => queue.push_back(event),
                    Target::Panel(input) => panel.apply(input),
                }
            }
            render.render(&mut panel, &mut queue, slice);
            frame += (slice.len() / 2) as u64;
        }

        peak_level = peak_level.max(peak(out));
        sink(out, frame)?;
    }

    Ok(peak_level)
}
