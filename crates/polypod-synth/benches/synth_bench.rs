//! Criterion benchmarks for polypod-synth components
//!
//! Run with: cargo bench -p polypod-synth
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use polypod_synth::{Oscillator, OscillatorWaveform, Profile, VoicePool};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[4, 64, 256, 1024];

// ============================================================================
// Oscillator benchmarks
// ============================================================================

fn bench_oscillator_waveforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("Oscillator");

    let waveforms = [
        ("Sine", OscillatorWaveform::Sine),
        ("Triangle", OscillatorWaveform::Triangle),
        ("Saw", OscillatorWaveform::Saw),
        ("Square", OscillatorWaveform::Square),
    ];

    for (name, waveform) in &waveforms {
        for &block_size in BLOCK_SIZES {
            let mut osc = Oscillator::new(SAMPLE_RATE);
            osc.set_frequency(440.0);
            osc.set_waveform(*waveform);

            group.bench_with_input(
                BenchmarkId::new(*name, block_size),
                &block_size,
                |b, &size| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for _ in 0..size {
                            sum += osc.advance();
                        }
                        black_box(sum)
                    })
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Voice pool benchmarks
// ============================================================================

fn bench_pool_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("VoicePool");

    for profile in Profile::ALL {
        group.bench_with_input(
            BenchmarkId::new("mix_8_voices_256", profile.name()),
            &profile,
            |b, &profile| {
                let mut pool: VoicePool<8> = VoicePool::new(SAMPLE_RATE);
                pool.set_profile(profile);
                for (i, note) in (60..68).enumerate() {
                    pool.allocate(note, i as u64);
                }
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..256 {
                        pool.set_vibrato(black_box(0.5));
                        sum += pool.mix();
                    }
                    black_box(sum)
                })
            },
        );
    }

    // steady-state stealing: every note-on scans and steals
    group.bench_function("allocate_full_pool", |b| {
        let mut pool: VoicePool<8> = VoicePool::new(SAMPLE_RATE);
        let mut t = 0u64;
        b.iter(|| {
            t += 1;
            black_box(pool.allocate(black_box((t % 128) as u8), t))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_oscillator_waveforms, bench_pool_mix);
criterion_main!(benches);
