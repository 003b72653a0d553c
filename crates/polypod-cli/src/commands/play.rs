//! Real-time playback of a score.

use super::common::load_settings;
use crate::score::{Score, Target};
use clap::Args;
use polypod_engine::{EngineEvent, RenderLoop, event_queue};
use polypod_io::{SynthStream, panel_queue};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Longest the control thread sleeps before checking for Ctrl+C.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Args)]
pub struct PlayArgs {
    /// Score file (TOML); without one a single note is held
    #[arg(value_name = "SCORE")]
    score: Option<PathBuf>,

    /// Configuration name or path
    #[arg(short, long)]
    config: Option<String>,

    /// Output device (index, exact name, or partial name)
    #[arg(short, long)]
    device: Option<String>,

    /// Note held when no score is given
    #[arg(long, default_value = "69")]
    note: u8,

    /// Seconds to keep playing after the last event (forever if omitted)
    #[arg(long)]
    tail: Option<f64>,

    /// Event queue capacity
    #[arg(long, default_value = "1024")]
    queue: usize,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let score = match &args.score {
        Some(path) => Score::load(path)?,
        None => {
            if args.note > 127 {
                anyhow::bail!("--note must be a MIDI note (0-127)");
            }
            Score::held_note(args.note)
        }
    };
    if let Some(tail) = args.tail
        && !(tail.is_finite() && tail >= 0.0)
    {
        anyhow::bail!("--tail must be a non-negative number of seconds");
    }

    let (config, settings) = load_settings(args.config.as_deref())?;
    let render: RenderLoop = RenderLoop::new(&settings);
    let (mut events, event_rx) = event_queue(args.queue.max(1));
    let (mut panel, panel_rx) = panel_queue(args.queue.max(1));

    let stream = SynthStream::start(args.device.as_deref(), render, event_rx, panel_rx)?;
    println!(
        "Playing {} on {} ({} Hz, {} ch) with '{}'. Press Ctrl+C to stop.",
        score.name.as_deref().unwrap_or("score"),
        stream.device_name(),
        stream.sample_rate(),
        stream.channels(),
        config.name
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let start = Instant::now();
    let wait_until = |at: Duration| {
        while running.load(Ordering::SeqCst) {
            let now = start.elapsed();
            if now >= at {
                return true;
            }
            std::thread::sleep((at - now).min(POLL_INTERVAL));
        }
        false
    };

    for event in &score.events {
        if !wait_until(Duration::from_secs_f64(event.at)) {
            break;
        }
        tracing::debug!(at = event.at, action = ?event.action, "score event");
        let sent = match event.action.target() {
            Target::Engine(e) => events.send(e),
            Target::Panel(input) => panel.send(input),
        };
        if !sent && (events.is_abandoned() || panel.is_abandoned()) {
            anyhow::bail!("audio stream stopped");
        }
    }

    match args.tail {
        Some(tail) => {
            wait_until(Duration::from_secs_f64(score.duration() + tail));
        }
        None => {
            wait_until(Duration::MAX);
        }
    }

    events.send(EngineEvent::AllNotesOff);
    println!("\nStopping...");
    drop(stream);
    Ok(())
}
