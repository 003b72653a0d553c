//! Engine configuration file format.

use std::collections::BTreeMap;
use std::path::Path;

use polypod_core::ParamScale;
use polypod_engine::{
    ButtonAction, CcMap, EngineSettings, KnobBinding, ModeBinding, ModeTable, SynthParam,
};
use polypod_platform::{ControlMode, Rgb};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_config};

/// Everything needed to build a render loop, as stored on disk.
///
/// Sections left out of a file take their defaults; an explicit empty
/// `cc = []` unbinds every controller.
///
/// # TOML Format
///
/// ```toml
/// name = "studio"
/// description = "Slow attack pads"
/// sample_rate = 48000
/// block_size = 4
///
/// [voices]
/// detune_scale = 4.0
/// attack_scale = 2.0
/// hard_retrigger = false
///
/// [effects]
/// enabled = true
///
/// [initial]
/// attack = 0.8
/// cutoff = 2500.0
///
/// [[cc]]
/// controller = 74
/// param = "cutoff"
///
/// [[modes]]
/// mode = "filter"
/// color = [1.0, 0.0, 0.0]
/// knob1 = { param = "cutoff", min = 100.0, max = 20000.0, scale = "logarithmic" }
/// knob2 = { param = "resonance", min = 0.0, max = 1.0 }
///
/// [buttons]
/// button1 = "all_notes_off"
/// button2 = "toggle_effects"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Name of the configuration.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Frames between control updates.
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Voice behaviour and controller ranges.
    #[serde(default)]
    pub voices: VoicesConfig,

    /// Effects stage.
    #[serde(default)]
    pub effects: EffectsConfig,

    /// Power-on parameter values by parameter id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub initial: BTreeMap<String, f32>,

    /// Controller routes.
    #[serde(default = "default_cc")]
    pub cc: Vec<CcRoute>,

    /// Mode bindings. Modes not listed keep their default binding.
    #[serde(default = "default_modes")]
    pub modes: Vec<ModeConfig>,

    /// Button actions.
    #[serde(default)]
    pub buttons: ButtonsConfig,
}

fn default_sample_rate() -> u32 {
    48000
}

fn default_block_size() -> usize {
    polypod_engine::DEFAULT_BLOCK_SIZE
}

fn default_cc() -> Vec<CcRoute> {
    routes_from_map(&CcMap::firmware())
}

fn default_modes() -> Vec<ModeConfig> {
    modes_from_table(&ModeTable::default())
}

fn routes_from_map(map: &CcMap) -> Vec<CcRoute> {
    map.iter()
        .map(|(controller, param)| CcRoute::new(controller, param.id()))
        .collect()
}

fn modes_from_table(table: &ModeTable) -> Vec<ModeConfig> {
    ControlMode::ALL
        .into_iter()
        .map(|mode| ModeConfig::from_binding(mode, table.binding(mode)))
        .collect()
}

/// `[voices]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoicesConfig {
    /// Detune reached at controller value 127.
    #[serde(default = "default_detune_scale")]
    pub detune_scale: f32,
    /// Attack seconds reached at controller value 127.
    #[serde(default = "default_attack_scale")]
    pub attack_scale: f32,
    /// Restart envelopes from zero on every note.
    #[serde(default)]
    pub hard_retrigger: bool,
}

fn default_detune_scale() -> f32 {
    polypod_engine::router::DEFAULT_DETUNE_SCALE
}

fn default_attack_scale() -> f32 {
    polypod_engine::router::DEFAULT_ATTACK_SCALE
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            detune_scale: default_detune_scale(),
            attack_scale: default_attack_scale(),
            hard_retrigger: false,
        }
    }
}

/// `[effects]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectsConfig {
    /// Run reverb and delay after the filter.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// One `[[cc]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CcRoute {
    /// Controller number, 0 to 127.
    pub controller: u8,
    /// Parameter id.
    pub param: String,
}

impl CcRoute {
    /// Route `controller` to the parameter with id `param`.
    pub fn new(controller: u8, param: impl Into<String>) -> Self {
        Self {
            controller,
            param: param.into(),
        }
    }
}

/// Knob travel curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum KnobScale {
    /// Straight line from min to max.
    #[default]
    Linear,
    /// Equal ratios per unit of travel.
    Logarithmic,
    /// `min + k^exp * (max - min)`.
    Power(f32),
}

impl From<KnobScale> for ParamScale {
    fn from(scale: KnobScale) -> Self {
        match scale {
            KnobScale::Linear => ParamScale::Linear,
            KnobScale::Logarithmic => ParamScale::Logarithmic,
            KnobScale::Power(exp) => ParamScale::Power(exp),
        }
    }
}

impl From<ParamScale> for KnobScale {
    fn from(scale: ParamScale) -> Self {
        match scale {
            ParamScale::Linear => KnobScale::Linear,
            ParamScale::Logarithmic => KnobScale::Logarithmic,
            ParamScale::Power(exp) => KnobScale::Power(exp),
        }
    }
}

/// A knob's parameter and range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnobConfig {
    /// Parameter id.
    pub param: String,
    /// Value at the counter-clockwise stop.
    pub min: f32,
    /// Value at the clockwise stop.
    pub max: f32,
    /// Travel curve.
    #[serde(default)]
    pub scale: KnobScale,
}

impl KnobConfig {
    /// A knob over `min..=max`.
    pub fn new(param: impl Into<String>, min: f32, max: f32, scale: KnobScale) -> Self {
        Self {
            param: param.into(),
            min,
            max,
            scale,
        }
    }

    fn from_binding(binding: &KnobBinding) -> Self {
        Self::new(binding.param.id(), binding.min, binding.max, binding.scale.into())
    }

    fn to_binding(&self) -> Option<KnobBinding> {
        let param = SynthParam::from_id(&self.param)?;
        Some(KnobBinding::new(param, self.min, self.max, self.scale.into()))
    }
}

/// One `[[modes]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModeConfig {
    /// Mode name: `vco`, `filter`, `envelope` or `lfo`.
    pub mode: String,
    /// LED 1 colour while the mode is active.
    pub color: [f32; 3],
    /// Knob 1 binding; absent leaves the knob inert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knob1: Option<KnobConfig>,
    /// Knob 2 binding; absent leaves the knob inert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knob2: Option<KnobConfig>,
}

impl ModeConfig {
    /// A mode with no knob bindings.
    pub fn inert(mode: impl Into<String>, color: [f32; 3]) -> Self {
        Self {
            mode: mode.into(),
            color,
            knob1: None,
            knob2: None,
        }
    }

    fn from_binding(mode: ControlMode, binding: &ModeBinding) -> Self {
        let [knob1, knob2] = binding.knobs.map(|k| k.as_ref().map(KnobConfig::from_binding));
        Self {
            mode: mode.name().to_string(),
            color: binding.color.channels(),
            knob1,
            knob2,
        }
    }

    fn to_binding(&self) -> ModeBinding {
        let [r, g, b] = self.color;
        ModeBinding {
            color: Rgb::new(r, g, b),
            knobs: [
                self.knob1.as_ref().and_then(KnobConfig::to_binding),
                self.knob2.as_ref().and_then(KnobConfig::to_binding),
            ],
        }
    }
}

/// `[buttons]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ButtonsConfig {
    /// Button 1 action name.
    #[serde(default = "default_button")]
    pub button1: String,
    /// Button 2 action name.
    #[serde(default = "default_button")]
    pub button2: String,
}

fn default_button() -> String {
    ButtonAction::None.name().to_string()
}

impl Default for ButtonsConfig {
    fn default() -> Self {
        Self {
            button1: default_button(),
            button2: default_button(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_settings("default", &EngineSettings::default())
    }
}

impl EngineConfig {
    /// Describe `settings` as a configuration named `name`.
    pub fn from_settings(name: impl Into<String>, settings: &EngineSettings) -> Self {
        let initial = SynthParam::ALL
            .into_iter()
            .filter_map(|p| settings.overrides[p.index()].map(|v| (p.id().to_string(), v)))
            .collect();
        Self {
            name: name.into(),
            description: None,
            sample_rate: settings.sample_rate.round() as u32,
            block_size: settings.block_size,
            voices: VoicesConfig {
                detune_scale: settings.detune_scale,
                attack_scale: settings.attack_scale,
                hard_retrigger: settings.hard_retrigger,
            },
            effects: EffectsConfig {
                enabled: settings.effects_enabled,
            },
            initial,
            cc: routes_from_map(&settings.cc_map),
            modes: modes_from_table(&settings.modes),
            buttons: ButtonsConfig {
                button1: settings.buttons[0].name().to_string(),
                button2: settings.buttons[1].name().to_string(),
            },
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %config.name, "loaded config");
        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_config(self)
    }

    /// Validate and convert to engine settings.
    pub fn to_settings(&self) -> Result<EngineSettings, ConfigError> {
        self.validate()?;

        let mut settings = EngineSettings::new(self.sample_rate as f32);
        settings.block_size = self.block_size;
        settings.hard_retrigger = self.voices.hard_retrigger;
        settings.detune_scale = self.voices.detune_scale;
        settings.attack_scale = self.voices.attack_scale;
        settings.effects_enabled = self.effects.enabled;

        for (id, &value) in &self.initial {
            if let Some(param) = SynthParam::from_id(id) {
                settings.overrides[param.index()] = Some(value);
            }
        }

        let mut cc_map = CcMap::empty();
        for route in &self.cc {
            if let Some(param) = SynthParam::from_id(&route.param) {
                cc_map.bind(route.controller, param);
            }
        }
        settings.cc_map = cc_map;

        let mut modes = ModeTable::default();
        for mode in &self.modes {
            if let Some(m) = ControlMode::from_name(&mode.mode) {
                modes.set_binding(m, mode.to_binding());
            }
        }
        settings.modes = modes;

        let action = |name: &str| ButtonAction::from_name(name).unwrap_or_default();
        settings.buttons = [action(&self.buttons.button1), action(&self.buttons.button2)];

        Ok(settings)
    }
}
