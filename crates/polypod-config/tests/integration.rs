//! Integration tests for polypod-config: files on disk through to a running
//! render loop.

use polypod_config::{CcRoute, ConfigError, EngineConfig, KnobConfig, KnobScale, factory_config};
use polypod_engine::{ButtonAction, MidiEvent, NoEvents, RenderLoop, SynthParam};
use polypod_platform::{ControlMode, VirtualPanel};
use tempfile::TempDir;

#[test]
fn save_and_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("studio.toml");

    let mut config = EngineConfig::default().with_description("round trip");
    config.name = "studio".into();
    config.initial.insert("attack".into(), 0.75);
    config.buttons.button1 = "next_profile".into();
    config.modes[2].knob2 = Some(KnobConfig::new("sustain", 0.0, 1.0, KnobScale::Power(2.0)));

    config.save(&path).unwrap();
    let loaded = EngineConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn factory_configs_survive_toml() {
    for name in polypod_config::FACTORY_CONFIG_NAMES {
        let config = factory_config(name).unwrap();
        let text = config.to_toml().unwrap();
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), config, "{name}");
    }
}

#[test]
fn load_missing_file_reports_path() {
    let err = EngineConfig::load("/nonexistent/polypod/config.toml").unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("/nonexistent/polypod/config.toml"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = EngineConfig::from_toml("name = ").unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)));
}

#[test]
fn config_drives_the_render_loop() {
    let config = EngineConfig::from_toml(
        r#"
name = "custom"
block_size = 8

[effects]
enabled = false

[initial]
cutoff = 1200.0

[[cc]]
controller = 74
param = "cutoff"

[[modes]]
mode = "vco"
color = [0.0, 0.0, 1.0]
knob1 = { param = "sustain", min = 0.0, max = 1.0 }

[buttons]
button1 = "all_notes_off"
"#,
    )
    .unwrap();
    let settings = config.to_settings().unwrap();
    assert_eq!(settings.buttons, [ButtonAction::AllNotesOff, ButtonAction::None]);

    let mut render: RenderLoop<4> = RenderLoop::new(&settings);
    assert_eq!(render.block_size(), 8);
    assert_eq!(render.engine().get(SynthParam::Cutoff), 1200.0);
    assert!(!render.engine().chain().effects_enabled());

    // only controller 74 is routed now
    render.handle(MidiEvent::ControlChange { controller: 97, value: 0 }.into());
    assert_eq!(render.engine().get(SynthParam::Cutoff), 1200.0);
    render.handle(MidiEvent::ControlChange { controller: 74, value: 69 }.into());
    assert!((render.engine().get(SynthParam::Cutoff) - 440.0).abs() < 1e-3);

    let mut panel = VirtualPanel::new();
    panel.set_knob(0, 0.3);
    let mut out = vec![0.0f32; 16];
    render.render(&mut panel, &mut NoEvents, &mut out);
    assert!((render.engine().get(SynthParam::Sustain) - 0.3).abs() < 1e-6);
    assert_eq!(panel.led(0).channels(), [0.0, 0.0, 1.0]);
    assert_eq!(render.surface().mode(), ControlMode::Vco);
}

#[test]
fn invalid_routes_are_rejected_before_use() {
    let mut config = EngineConfig::default();
    config.cc.push(CcRoute::new(97, "cutoff"));
    let err = config.to_settings().unwrap_err();
    assert!(err.to_string().contains("controller 97"), "{err}");
}
