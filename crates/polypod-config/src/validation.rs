//! Configuration validation.
//!
//! Every problem in a configuration is collected, so a file with three bad
//! entries reports all three.
//!
//! ```rust
//! use polypod_config::{EngineConfig, ValidationError};
//!
//! let mut config = EngineConfig::default();
//! config.initial.insert("volume".into(), 0.5);
//! assert_eq!(
//!     config.validate(),
//!     Err(ValidationError::UnknownParameter("volume".into()))
//! );
//! ```

use std::collections::HashSet;

use polypod_engine::{ButtonAction, SynthParam};
use polypod_platform::ControlMode;
use thiserror::Error;

use crate::config::{EngineConfig, KnobConfig, KnobScale};

/// Lowest accepted sample rate in Hz.
pub const MIN_SAMPLE_RATE: u32 = 8000;
/// Highest accepted sample rate in Hz.
pub const MAX_SAMPLE_RATE: u32 = 192_000;
/// Largest accepted control block in frames.
pub const MAX_BLOCK_SIZE: usize = 4096;

/// A single problem with a configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter id not recognised.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Mode name not recognised.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// Mode listed more than once.
    #[error("mode '{0}' is listed more than once")]
    DuplicateMode(String),

    /// Button action not recognised.
    #[error("unknown button action: {0}")]
    UnknownButtonAction(String),

    /// Controller number above 127.
    #[error("controller {0} is not a 7-bit controller number")]
    ControllerOutOfRange(u8),

    /// Controller routed more than once.
    #[error("controller {0} is routed more than once")]
    DuplicateController(u8),

    /// Numeric field outside its range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Field or parameter name.
        field: String,
        /// Offending value.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Knob binding that cannot be evaluated.
    #[error("knob {knob} of mode '{mode}': {reason}")]
    InvalidKnob {
        /// Mode name.
        mode: String,
        /// Knob number, 1 or 2.
        knob: usize,
        /// What is wrong.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

impl ValidationError {
    fn out_of_range(field: impl Into<String>, value: f32, min: f32, max: f32) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    /// The individual errors, flattening [`Multiple`](Self::Multiple).
    pub fn errors(&self) -> Vec<&ValidationError> {
        match self {
            Self::Multiple(errors) => errors.iter().flat_map(ValidationError::errors).collect(),
            other => vec![other],
        }
    }
}

fn check_range(errors: &mut Vec<ValidationError>, field: &str, value: f32, min: f32, max: f32) {
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::out_of_range(field, value, min, max));
    }
}

fn check_knob(errors: &mut Vec<ValidationError>, mode: &str, knob: usize, config: &KnobConfig) {
    let invalid = |reason: String| ValidationError::InvalidKnob {
        mode: mode.to_string(),
        knob,
        reason,
    };

    let Some(param) = SynthParam::from_id(&config.param) else {
        errors.push(ValidationError::UnknownParameter(config.param.clone()));
        return;
    };
    if !config.min.is_finite() || !config.max.is_finite() {
        errors.push(invalid("range must be finite".into()));
        return;
    }
    let desc = param.descriptor();
    for value in [config.min, config.max] {
        check_range(errors, &config.param, value, desc.min, desc.max);
    }
    match config.scale {
        KnobScale::Logarithmic if config.min <= 0.0 || config.max <= 0.0 => {
            errors.push(invalid("logarithmic range must be above zero".into()));
        }
        KnobScale::Power(exp) if !(exp.is_finite() && exp > 0.0) => {
            errors.push(invalid(format!("power exponent {exp} must be positive")));
        }
        _ => {}
    }
}

/// Check a configuration; `Ok` means [`EngineConfig::to_settings`] will succeed.
pub fn validate_config(config: &EngineConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&config.sample_rate) {
        errors.push(ValidationError::out_of_range(
            "sample_rate",
            config.sample_rate as f32,
            MIN_SAMPLE_RATE as f32,
            MAX_SAMPLE_RATE as f32,
        ));
    }
    if !(1..=MAX_BLOCK_SIZE).contains(&config.block_size) {
        errors.push(ValidationError::out_of_range(
            "block_size",
            config.block_size as f32,
            1.0,
            MAX_BLOCK_SIZE as f32,
        ));
    }
    check_range(&mut errors, "voices.detune_scale", config.voices.detune_scale, 0.01, 16.0);
    check_range(&mut errors, "voices.attack_scale", config.voices.attack_scale, 0.001, 10.0);

    for (id, &value) in &config.initial {
        match SynthParam::from_id(id) {
            Some(param) => {
                let desc = param.descriptor();
                check_range(&mut errors, id, value, desc.min, desc.max);
            }
            None => errors.push(ValidationError::UnknownParameter(id.clone())),
        }
    }

    let mut controllers = HashSet::new();
    for route in &config.cc {
        if route.controller > 127 {
            errors.push(ValidationError::ControllerOutOfRange(route.controller));
        } else if !controllers.insert(route.controller) {
            errors.push(ValidationError::DuplicateController(route.controller));
        }
        if SynthParam::from_id(&route.param).is_none() {
            errors.push(ValidationError::UnknownParameter(route.param.clone()));
        }
    }

    let mut modes = HashSet::new();
    for mode in &config.modes {
        match ControlMode::from_name(&mode.mode) {
            Some(m) => {
                if !modes.insert(m) {
                    errors.push(ValidationError::DuplicateMode(mode.mode.clone()));
                }
            }
            None => errors.push(ValidationError::UnknownMode(mode.mode.clone())),
        }
        for (channel, value) in ["r", "g", "b"].into_iter().zip(mode.color) {
            check_range(&mut errors, &format!("modes.{}.color.{channel}", mode.mode), value, 0.0, 1.0);
        }
        for (knob, binding) in [(1, &mode.knob1), (2, &mode.knob2)] {
            if let Some(binding) = binding {
                check_knob(&mut errors, &mode.mode, knob, binding);
            }
        }
    }

    for name in [&config.buttons.button1, &config.buttons.button2] {
        if ButtonAction::from_name(name).is_none() {
            errors.push(ValidationError::UnknownButtonAction(name.clone()));
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
