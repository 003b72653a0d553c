//! End-to-end scenarios: notes, controllers and the pod's controls driven
//! through the render loop.

use std::collections::VecDeque;

use polypod_engine::{
    ButtonAction, EngineEvent, EngineSettings, MAX_EVENTS_PER_BLOCK, MidiEvent, NoEvents,
    ParameterRouter, RenderLoop, SynthEngine, SynthParam,
};
use polypod_platform::{ControlMode, LED2_COLOR, VirtualPanel};
use polypod_synth::EnvelopeState;

const SR: f32 = 48000.0;

fn on(note: u8) -> EngineEvent {
    MidiEvent::NoteOn { note }.into()
}

fn off(note: u8) -> EngineEvent {
    MidiEvent::NoteOff { note }.into()
}

fn cc(controller: u8, value: u8) -> EngineEvent {
    MidiEvent::ControlChange { controller, value }.into()
}

/// Render exactly one control block.
fn block<const N: usize>(render: &mut RenderLoop<N>, panel: &mut VirtualPanel) {
    let mut out = vec![0.0f32; render.block_size() * 2];
    render.render(panel, &mut NoEvents, &mut out);
}

// ---------------------------------------------------------------------------
// 1. Notes
// ---------------------------------------------------------------------------

#[test]
fn nine_notes_steal_the_oldest() {
    let router = ParameterRouter::default();
    let mut engine: SynthEngine<8> = SynthEngine::new(SR);

    for note in 60..68 {
        engine.handle(on(note), &router);
    }
    assert_eq!(engine.pool().busy_count(), 8);

    engine.handle(on(72), &router);
    let voices = engine.pool().voices();
    assert_eq!(voices[0].note(), Some(72));
    assert!(voices.iter().all(|v| v.note() != Some(60)));
    for (i, voice) in voices.iter().enumerate().skip(1) {
        assert_eq!(voice.note(), Some(60 + i as u8));
    }
}

#[test]
fn steal_order_follows_arrival_across_time() {
    let mut engine: SynthEngine<2> = SynthEngine::new(SR);
    engine.note_on(60);
    for _ in 0..480 {
        engine.next_frame();
    }
    engine.note_on(62);
    // oldest first, then the one that replaced it is newest
    assert_eq!(engine.note_on(64), 0);
    assert_eq!(engine.note_on(65), 1);
    assert_eq!(engine.note_on(67), 0);
}

#[test]
fn single_voice_is_reused() {
    let mut engine: SynthEngine<1> = SynthEngine::new(SR);
    assert_eq!(engine.note_on(60), 0);
    assert_eq!(engine.note_on(62), 0);
    assert_eq!(engine.pool().voices()[0].note(), Some(62));
    assert_eq!(engine.note_off(60), None);
    assert_eq!(engine.note_off(62), Some(0));
}

#[test]
fn repeated_note_on_is_silenced_by_one_note_off() {
    let router = ParameterRouter::default();
    let mut engine: SynthEngine<4> = SynthEngine::new(SR);
    engine.handle(on(60), &router);
    engine.handle(on(60), &router);
    let holders = engine.pool().voices().iter().filter(|v| v.note() == Some(60)).count();
    assert_eq!(holders, 1);

    engine.handle(off(60), &router);
    assert_eq!(engine.pool().busy_count(), 0);
}

#[test]
fn note_off_for_unheld_note_changes_nothing() {
    let router = ParameterRouter::default();
    let mut engine: SynthEngine<4> = SynthEngine::new(SR);
    engine.handle(on(60), &router);
    engine.handle(on(64), &router);

    engine.handle(off(61), &router);

    let notes: Vec<Option<u8>> = engine.pool().voices().iter().map(|v| v.note()).collect();
    assert_eq!(notes, vec![Some(60), Some(64), None, None]);
}

#[test]
fn released_voice_keeps_sounding_then_goes_idle() {
    let router = ParameterRouter::default();
    let mut engine: SynthEngine<2> = SynthEngine::new(SR);
    engine.set(SynthParam::Release, 0.01);
    engine.handle(on(69), &router);
    for _ in 0..4800 {
        engine.next_frame();
    }
    engine.handle(off(69), &router);
    engine.next_frame();
    let voice = &engine.pool().voices()[0];
    assert!(!voice.is_busy());
    assert_eq!(voice.envelope_state(), EnvelopeState::Release);

    for _ in 0..48000 {
        engine.next_frame();
    }
    assert_eq!(engine.pool().voices()[0].envelope_state(), EnvelopeState::Idle);
}

#[test]
fn all_notes_off_event_frees_every_voice() {
    let router = ParameterRouter::default();
    let mut engine: SynthEngine<4> = SynthEngine::new(SR);
    for note in [60, 64, 67] {
        engine.handle(on(note), &router);
    }
    engine.handle(EngineEvent::AllNotesOff, &router);
    assert_eq!(engine.pool().busy_count(), 0);
}

// ---------------------------------------------------------------------------
// 2. Controllers
// ---------------------------------------------------------------------------

#[test]
fn repeated_cutoff_controller_is_idempotent() {
    let router = ParameterRouter::default();
    let mut engine: SynthEngine<2> = SynthEngine::new(SR);
    engine.handle(cc(97, 64), &router);
    let first = engine.get(SynthParam::Cutoff);
    engine.handle(cc(97, 64), &router);
    assert_eq!(engine.get(SynthParam::Cutoff), first);
    assert!((first - 329.63).abs() < 0.01);
}

#[test]
fn profile_controller_resets_detune() {
    let router = ParameterRouter::default();
    let mut engine: SynthEngine<2> = SynthEngine::new(SR);
    engine.handle(cc(105, 127), &router);
    assert_eq!(engine.get(SynthParam::Detune), 4.0);

    engine.handle(cc(96, 127), &router);
    assert_eq!(engine.get(SynthParam::Profile), 2.0);
    assert_eq!(engine.get(SynthParam::Detune), 2.0);
}

#[test]
fn profile_knob_jitter_keeps_detune() {
    let mut render: RenderLoop<4> = RenderLoop::new(&EngineSettings::new(SR));
    let mut panel = VirtualPanel::new();
    render.handle(cc(105, 127));
    block(&mut render, &mut panel);
    assert_eq!(render.engine().get(SynthParam::Detune), 4.0);

    // still the default profile, so detune is left alone
    panel.set_knob(0, 0.0001);
    block(&mut render, &mut panel);
    assert_eq!(render.engine().get(SynthParam::Profile), 0.0);
    assert_eq!(render.engine().get(SynthParam::Detune), 4.0);

    // crossing into the next profile does reset it
    panel.set_knob(0, 0.5);
    block(&mut render, &mut panel);
    assert_eq!(render.engine().get(SynthParam::Profile), 1.0);
    assert_eq!(render.engine().get(SynthParam::Detune), 1.5);
}

#[test]
fn reselecting_the_profile_keeps_detune() {
    let router = ParameterRouter::default();
    let mut engine: SynthEngine<2> = SynthEngine::new(SR);
    engine.handle(cc(105, 127), &router);
    engine.handle(cc(96, 0), &router);
    assert_eq!(engine.get(SynthParam::Profile), 0.0);
    assert_eq!(engine.get(SynthParam::Detune), 4.0);
}

#[test]
fn events_are_drained_before_the_block_renders() {
    let mut render: RenderLoop<4> = RenderLoop::new(&EngineSettings::new(SR));
    let mut events: VecDeque<EngineEvent> = VecDeque::from([on(60), cc(106, 0), on(64)]);
    let mut out = vec![0.0f32; 8];
    render.render(&mut VirtualPanel::new(), &mut events, &mut out);

    assert!(events.is_empty());
    assert_eq!(render.engine().pool().busy_count(), 2);
    assert_eq!(render.engine().get(SynthParam::Resonance), 0.0);
}

#[test]
fn a_flood_of_events_spreads_over_blocks() {
    let mut render: RenderLoop<4> = RenderLoop::new(&EngineSettings::new(SR));
    let total = MAX_EVENTS_PER_BLOCK * 2 + 3;
    let mut events: VecDeque<EngineEvent> = (0..total).map(|_| cc(106, 0)).collect();

    // one control block per render call
    let mut out = vec![0.0f32; render.block_size() * 2];
    let mut panel = VirtualPanel::new();
    render.render(&mut panel, &mut events, &mut out);
    assert_eq!(events.len(), total - MAX_EVENTS_PER_BLOCK);
    render.render(&mut panel, &mut events, &mut out);
    assert_eq!(events.len(), 3);
    render.render(&mut panel, &mut events, &mut out);
    assert!(events.is_empty());
}

// ---------------------------------------------------------------------------
// 3. Pod controls
// ---------------------------------------------------------------------------

#[test]
fn encoder_selects_mode_and_knob_follows_it() {
    let mut render: RenderLoop<4> = RenderLoop::new(&EngineSettings::new(SR));
    let mut panel = VirtualPanel::new();

    panel.turn_encoder(1);
    panel.set_knob(0, 1.0);
    block(&mut render, &mut panel);

    assert_eq!(render.surface().mode(), ControlMode::Filter);
    assert!((render.engine().get(SynthParam::Cutoff) - 20000.0).abs() < 0.5);
    // knob 2 never moved
    assert_eq!(render.engine().get(SynthParam::Resonance), 0.8);
}

#[test]
fn knob_moves_inside_hysteresis_are_ignored() {
    let mut render: RenderLoop<4> = RenderLoop::new(&EngineSettings::new(SR));
    let mut panel = VirtualPanel::new();
    panel.turn_encoder(1);
    panel.set_knob(1, 0.5);
    block(&mut render, &mut panel);
    assert_eq!(render.engine().get(SynthParam::Resonance), 0.5);

    panel.set_knob(1, 0.50004);
    block(&mut render, &mut panel);
    assert_eq!(render.engine().get(SynthParam::Resonance), 0.5);

    panel.set_knob(1, 0.6);
    block(&mut render, &mut panel);
    assert!((render.engine().get(SynthParam::Resonance) - 0.6).abs() < 1e-6);
}

#[test]
fn knobs_drive_every_mode() {
    let mut render: RenderLoop<4> = RenderLoop::new(&EngineSettings::new(SR));
    let mut panel = VirtualPanel::new();

    // VCO: profile and detune
    panel.set_knob(0, 1.0);
    panel.set_knob(1, 1.0);
    block(&mut render, &mut panel);
    assert_eq!(render.engine().get(SynthParam::Profile), 2.0);
    assert!((render.engine().get(SynthParam::Detune) - 2.0).abs() < 1e-6);

    // envelope: one detent per block, knobs untouched on the way
    panel.turn_encoder(2);
    block(&mut render, &mut panel);
    block(&mut render, &mut panel);
    assert_eq!(render.surface().mode(), ControlMode::Envelope);
    assert_eq!(render.engine().get(SynthParam::Cutoff), 10_000.0);

    panel.set_knob(0, 0.25);
    panel.set_knob(1, 0.75);
    block(&mut render, &mut panel);
    assert_eq!(render.engine().get(SynthParam::Attack), 0.25);
    assert_eq!(render.engine().get(SynthParam::Release), 0.75);

    // LFO: rate and depth
    panel.turn_encoder(1);
    panel.set_knob(0, 0.0);
    panel.set_knob(1, 0.5);
    block(&mut render, &mut panel);
    assert_eq!(render.surface().mode(), ControlMode::Lfo);
    assert!((render.engine().get(SynthParam::LfoFrequency) - 0.25).abs() < 1e-6);
    assert_eq!(render.engine().get(SynthParam::LfoAmplitude), 50.0);
}

#[test]
fn leds_show_the_mode() {
    let mut render: RenderLoop<4> = RenderLoop::new(&EngineSettings::new(SR));
    let mut panel = VirtualPanel::new();

    block(&mut render, &mut panel);
    assert_eq!(panel.led(0), ControlMode::Vco.color());
    assert_eq!(panel.led(1), LED2_COLOR);

    panel.set_encoder_pressed(true);
    block(&mut render, &mut panel);
    assert_eq!(panel.led(0), ControlMode::Filter.color());

    // held press does not advance again
    block(&mut render, &mut panel);
    assert_eq!(panel.led(0), ControlMode::Filter.color());
    assert_eq!(panel.led(1), LED2_COLOR);
}

#[test]
fn buttons_fire_once_per_press() {
    let mut settings = EngineSettings::new(SR);
    settings.buttons = [ButtonAction::AllNotesOff, ButtonAction::ToggleEffects];
    let mut render: RenderLoop<4> = RenderLoop::new(&settings);
    let mut panel = VirtualPanel::new();

    render.handle(on(60));
    panel.set_button(0, true);
    block(&mut render, &mut panel);
    assert_eq!(render.engine().pool().busy_count(), 0);

    render.handle(on(62));
    block(&mut render, &mut panel);
    assert_eq!(render.engine().pool().busy_count(), 1, "held button fired again");

    panel.set_button(0, false);
    block(&mut render, &mut panel);
    panel.set_button(0, true);
    block(&mut render, &mut panel);
    assert_eq!(render.engine().pool().busy_count(), 0);

    panel.set_button(1, true);
    block(&mut render, &mut panel);
    assert!(!render.engine().chain().effects_enabled());
}

#[test]
fn default_buttons_do_nothing() {
    let mut render: RenderLoop<4> = RenderLoop::new(&EngineSettings::new(SR));
    let mut panel = VirtualPanel::new();
    render.handle(on(60));
    panel.set_button(0, true);
    panel.set_button(1, true);
    block(&mut render, &mut panel);
    assert_eq!(render.engine().pool().busy_count(), 1);
    assert!(render.engine().chain().effects_enabled());
}

#[test]
fn reference_settings_only_move_the_lfo() {
    let mut render: RenderLoop<4> = RenderLoop::new(&EngineSettings::reference(SR));
    let mut panel = VirtualPanel::new();
    assert!(!render.engine().chain().effects_enabled());

    panel.set_knob(0, 1.0);
    panel.set_knob(1, 1.0);
    block(&mut render, &mut panel);
    assert_eq!(render.engine().get(SynthParam::Profile), 0.0);
    assert_eq!(render.engine().get(SynthParam::Detune), 1.0);

    panel.turn_encoder(-1);
    panel.set_knob(0, 0.5);
    panel.set_knob(1, 0.25);
    block(&mut render, &mut panel);
    assert_eq!(render.surface().mode(), ControlMode::Lfo);
    let rate = render.engine().get(SynthParam::LfoFrequency);
    assert!((rate - (0.25f32 * 1000.0).sqrt()).abs() < 1e-2, "rate {rate}");
    assert_eq!(render.engine().get(SynthParam::LfoAmplitude), 25.0);
}

#[test]
fn reference_output_is_mono_on_both_channels() {
    let mut render: RenderLoop<4> = RenderLoop::new(&EngineSettings::reference(SR));
    render.handle(on(57));
    render.handle(on(64));
    let mut out = vec![0.0f32; 2048];
    render.render(&mut VirtualPanel::new(), &mut NoEvents, &mut out);
    for frame in out.chunks_exact(2) {
        assert_eq!(frame[0], frame[1]);
    }
    assert!(out.iter().any(|&s| s.abs() > 1e-3));
}
