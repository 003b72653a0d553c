//! Built-in configurations.

use polypod_engine::EngineSettings;

use crate::EngineConfig;

/// Names of the built-in configurations.
pub const FACTORY_CONFIG_NAMES: &[&str] = &["default", "reference"];

/// A built-in configuration by name.
///
/// - `default`: every mode's knobs live, effects on
/// - `reference`: behaves like the pod firmware; only the LFO mode's knobs
///   do anything and the effects stage is off
///
/// ```rust
/// use polypod_config::factory_config;
///
/// let reference = factory_config("reference").unwrap();
/// assert!(!reference.effects.enabled);
/// assert!(factory_config("nope").is_none());
/// ```
pub fn factory_config(name: &str) -> Option<EngineConfig> {
    match name {
        "default" => Some(
            EngineConfig::from_settings("default", &EngineSettings::default())
                .with_description("All four modes live, reverb and delay on"),
        ),
        "reference" => Some(
            EngineConfig::from_settings("reference", &EngineSettings::reference(48000.0))
                .with_description("Pod firmware behaviour: LFO knobs only, effects off"),
        ),
        _ => None,
    }
}

/// Every built-in configuration.
pub fn factory_configs() -> Vec<EngineConfig> {
    FACTORY_CONFIG_NAMES
        .iter()
        .filter_map(|name| factory_config(name))
        .collect()
}

/// True if `name` is a built-in configuration.
pub fn is_factory_config(name: &str) -> bool {
    FACTORY_CONFIG_NAMES.contains(&name)
}
