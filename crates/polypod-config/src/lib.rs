//! Engine configuration for polypod.
//!
//! An [`EngineConfig`] is the on-disk form of [`EngineSettings`]: sample rate,
//! block size, voice options, power-on parameter values, controller routes,
//! knob bindings per control mode and button actions. Configurations are TOML
//! files, validated as a whole before they reach the engine.
//!
//! # Example
//!
//! ```rust,no_run
//! use polypod_config::{EngineConfig, paths};
//!
//! let config = EngineConfig::load("studio.toml").unwrap();
//! let settings = config.to_settings().unwrap();
//!
//! config.save(paths::user_configs_dir().join("studio.toml")).unwrap();
//! ```
//!
//! [`EngineSettings`]: polypod_engine::EngineSettings

mod config;
mod error;

/// Built-in configurations.
pub mod factory;

/// Platform-specific configuration paths.
pub mod paths;

/// Configuration validation.
pub mod validation;

pub use config::{
    ButtonsConfig, CcRoute, EffectsConfig, EngineConfig, KnobConfig, KnobScale, ModeConfig,
    VoicesConfig,
};
pub use error::ConfigError;
pub use factory::{FACTORY_CONFIG_NAMES, factory_config, factory_configs, is_factory_config};
pub use paths::{ensure_user_configs_dir, find_config, list_user_configs, user_config_dir, user_configs_dir};
pub use validation::{ValidationError, ValidationResult, validate_config};
