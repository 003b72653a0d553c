//! Parameter introspection.
//!
//! [`ParameterInfo`] exposes a processor's parameters by index so hosts (the
//! CLI `params` listing, knob bindings, presets) can discover ranges and units
//! without knowing the concrete type. Each parameter is described by a
//! [`ParamDescriptor`].
//!
//! ```rust
//! use polypod_core::{ParamDescriptor, ParamUnit, ParameterInfo};
//!
//! struct Level(f32);
//!
//! impl ParameterInfo for Level {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         (index == 0).then(|| {
//!             ParamDescriptor::custom("Level", "Lvl", "level", ParamUnit::None, 0.0, 1.0, 0.5)
//!         })
//!     }
//!
//!     fn get_param(&self, _index: usize) -> f32 { self.0 }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.0 = desc.clamp(value);
//!         }
//!     }
//! }
//!
//! let mut level = Level(0.5);
//! level.set_param(0, 3.0);
//! assert_eq!(level.get_param(0), 1.0);
//! assert_eq!(level.find_param_by_name("lvl"), Some(0));
//! ```

/// Curve between a parameter's plain value and normalized `[0, 1]`.
///
/// - **Linear**: `n = (v - min) / (max - min)`
/// - **Logarithmic**: `n = ln(v / min) / ln(max / min)`, requires `min > 0`
/// - **Power(exp)**: `n = ((v - min) / (max - min))^(1 / exp)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// More resolution at low values. Used for frequencies.
    Logarithmic,
    /// Power curve; exponents above 1 favour the low end of the knob travel.
    Power(f32),
}

/// Parameter metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Display name.
    pub name: &'static str,
    /// Name for small displays, 8 characters or fewer.
    pub short_name: &'static str,
    /// Stable identifier used in config files and JSON output.
    pub string_id: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Lowest accepted value.
    pub min: f32,
    /// Highest accepted value.
    pub max: f32,
    /// Value after construction.
    pub default: f32,
    /// Suggested encoder increment.
    pub step: f32,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Group for tree display, empty for top level.
    pub group: &'static str,
}

impl ParamDescriptor {
    /// Descriptor with a linear scale, step `0.01` and no group.
    pub const fn custom(
        name: &'static str,
        short_name: &'static str,
        string_id: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            string_id,
            unit,
            min,
            max,
            default,
            step: 0.01,
            scale: ParamScale::Linear,
            group: "",
        }
    }

    /// Wet/dry blend, 0 to 1.
    pub const fn mix(name: &'static str, string_id: &'static str) -> Self {
        Self::custom(name, "Mix", string_id, ParamUnit::Percent, 0.0, 1.0, 0.0)
    }

    /// Frequency in Hz on a logarithmic scale.
    pub const fn frequency(
        name: &'static str,
        short_name: &'static str,
        string_id: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::custom(name, short_name, string_id, ParamUnit::Hertz, min, max, default)
            .with_scale(ParamScale::Logarithmic)
    }

    /// Time in seconds.
    pub const fn seconds(
        name: &'static str,
        short_name: &'static str,
        string_id: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::custom(name, short_name, string_id, ParamUnit::Seconds, min, max, default)
    }

    /// Set the normalization curve.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Set the encoder increment.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Set the display group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Clamp to `[min, max]`.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Plain value to `[0, 1]`, following [`ParamScale`].
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
            ParamScale::Power(exp) => libm::powf((value - self.min) / range, 1.0 / exp),
        }
    }

    /// `[0, 1]` to plain value. Inverse of [`normalize`](Self::normalize).
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
            ParamScale::Power(exp) => self.min + libm::powf(normalized, exp) * (self.max - self.min),
        }
    }
}

/// Display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hz.
    Hertz,
    /// Seconds.
    Seconds,
    /// Fraction shown as a percentage.
    Percent,
    /// Samples.
    Samples,
    /// Discrete index.
    Index,
    /// Dimensionless.
    None,
}

impl ParamUnit {
    /// Suffix appended after a formatted value.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Seconds => " s",
            ParamUnit::Percent => "%",
            ParamUnit::Samples => " smp",
            ParamUnit::Index | ParamUnit::None => "",
        }
    }
}

/// Index-based parameter access.
///
/// Indices are `0..param_count()` and stable for the life of the value.
/// Out-of-range reads return `0.0`; out-of-range writes are ignored.
pub trait ParameterInfo {
    /// Number of parameters.
    fn param_count(&self) -> usize;

    /// Descriptor for `index`, `None` when out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of `index`.
    fn get_param(&self, index: usize) -> f32;

    /// Set `index`, clamped to its descriptor's range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find an index by name, short name or string id (ASCII case-insensitive).
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || desc.string_id.eq_ignore_ascii_case(name)
            })
        })
    }
}
