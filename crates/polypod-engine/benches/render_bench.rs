//! Criterion benchmarks for polypod-engine
//!
//! Run with: cargo bench -p polypod-engine
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use polypod_engine::{EngineSettings, MidiEvent, NoEvents, RenderLoop, SynthEngine};
use polypod_platform::VirtualPanel;

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn bench_engine_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("SynthEngine");

    for voices in [1usize, 4, 8] {
        let mut engine: SynthEngine<8> = SynthEngine::new(SAMPLE_RATE);
        for note in 0..voices {
            engine.note_on(60 + note as u8 * 3);
        }
        group.bench_with_input(BenchmarkId::new("voices", voices), &voices, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..256 {
                    let (l, r) = engine.next_frame();
                    sum += l + r;
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn bench_render_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("RenderLoop");

    for (name, settings) in [
        ("default", EngineSettings::new(SAMPLE_RATE)),
        ("reference", EngineSettings::reference(SAMPLE_RATE)),
    ] {
        for &frames in BLOCK_SIZES {
            let mut render: RenderLoop = RenderLoop::new(&settings);
            for note in [48, 55, 60, 64, 67, 71, 74, 79] {
                render.handle(MidiEvent::NoteOn { note }.into());
            }
            let mut panel = VirtualPanel::new();
            let mut out = vec![0.0f32; frames * 2];

            group.bench_with_input(BenchmarkId::new(name, frames), &frames, |b, _| {
                b.iter(|| {
                    render.render(&mut panel, &mut NoEvents, &mut out);
                    black_box(&out);
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_engine_frames, bench_render_loop);
criterion_main!(benches);
