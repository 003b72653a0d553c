//! Shared CLI helpers used across multiple commands.

use polypod_config::{EngineConfig, factory_config, find_config};
use polypod_engine::EngineSettings;

/// Load a configuration by name or path.
///
/// Searches in this order:
/// 1. Factory configurations (by name)
/// 2. File path, then user configurations (by name)
///
/// `None` loads the `default` factory configuration.
pub fn load_config(name: Option<&str>) -> anyhow::Result<EngineConfig> {
    let name = name.unwrap_or("default");

    if let Some(config) = factory_config(name) {
        return Ok(config);
    }

    if let Some(path) = find_config(name) {
        tracing::debug!(path = %path.display(), "loading configuration");
        return Ok(EngineConfig::load(&path)?);
    }

    anyhow::bail!(
        "Configuration '{}' not found. Use 'polypod config list' to see available configurations.",
        name
    )
}

/// Load a configuration and turn it into engine settings.
pub fn load_settings(name: Option<&str>) -> anyhow::Result<(EngineConfig, EngineSettings)> {
    let config = load_config(name)?;
    let settings = config.to_settings()?;
    Ok((config, settings))
}

pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
