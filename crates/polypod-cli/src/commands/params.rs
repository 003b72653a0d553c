//! Parameter, controller and knob binding listing.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use super::common::load_settings;
use clap::Args;
use polypod_core::ParamScale;
use polypod_engine::{EngineSettings, KnobBinding, SynthParam};
use polypod_platform::ControlMode;
use serde_json::{Value, json};

#[derive(Args)]
pub struct ParamsArgs {
    /// Configuration name or path
    #[arg(short, long)]
    config: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let (config, settings) = load_settings(args.config.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&to_json(&settings))?);
        return Ok(());
    }

    println!("Parameters ({})", config.name);
    println!("{}", "=".repeat(13 + config.name.len()));
    println!();
    println!(
        "  {:16}  {:20}  {:18}  {:10}  {}",
        "Id", "Name", "Range", "Default", "CC"
    );
    println!(
        "  {:16}  {:20}  {:18}  {:10}  {}",
        "--", "----", "-----", "-------", "--"
    );
    for param in SynthParam::ALL {
        let desc = param.descriptor();
        let cc = settings
            .cc_map
            .controller_for(param)
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        println!(
            "  {:16}  {:20}  {:18}  {:10}  {}",
            param.id(),
            desc.name,
            format!("{}..{}{}", desc.min, desc.max, desc.unit.suffix()),
            settings.initial(param),
            cc
        );
    }

    println!();
    println!("Control modes:");
    for mode in ControlMode::ALL {
        let binding = settings.modes.binding(mode);
        let knobs: Vec<String> = binding.knobs.iter().map(describe_knob).collect();
        println!("  {:10}  knob 1: {:28}  knob 2: {}", mode.name(), knobs[0], knobs[1]);
    }

    println!();
    println!(
        "Buttons: 1 = {}, 2 = {}",
        settings.buttons[0].name(),
        settings.buttons[1].name()
    );

    Ok(())
}

fn scale_name(scale: ParamScale) -> String {
    match scale {
        ParamScale::Linear => "linear".to_string(),
        ParamScale::Logarithmic => "log".to_string(),
        ParamScale::Power(exp) => format!("power {exp}"),
    }
}

fn describe_knob(knob: &Option<KnobBinding>) -> String {
    match knob {
        Some(k) => format!("{} {}..{} {}", k.param.id(), k.min, k.max, scale_name(k.scale)),
        None => "-".to_string(),
    }
}

fn knob_json(knob: &Option<KnobBinding>) -> Value {
    match knob {
        Some(k) => json!({
            "param": k.param.id(),
            "min": k.min,
            "max": k.max,
            "scale": scale_name(k.scale),
        }),
        None => Value::Null,
    }
}

fn to_json(settings: &EngineSettings) -> Value {
    let params: Vec<Value> = SynthParam::ALL
        .into_iter()
        .map(|param| {
            let desc = param.descriptor();
            json!({
                "id": param.id(),
                "name": desc.name,
                "min": desc.min,
                "max": desc.max,
                "default": settings.initial(param),
                "unit": desc.unit.suffix().trim(),
                "cc": settings.cc_map.controller_for(param),
            })
        })
        .collect();

    let modes: Vec<Value> = ControlMode::ALL
        .into_iter()
        .map(|mode| {
            let binding = settings.modes.binding(mode);
            json!({
                "mode": mode.name(),
                "color": [binding.color.r, binding.color.g, binding.color.b],
                "knob1": knob_json(&binding.knobs[0]),
                "knob2": knob_json(&binding.knobs[1]),
            })
        })
        .collect();

    json!({
        "params": params,
        "modes": modes,
        "buttons": [settings.buttons[0].name(), settings.buttons[1].name()],
    })
}
