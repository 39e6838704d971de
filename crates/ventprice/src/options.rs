//! Engine configuration
//!
//! Every field has a default that reproduces the catalog's long-standing
//! constants, so an empty TOML document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading options or building the override registry
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A model may belong to one override family only
    #[error("model {0} is assigned to more than one pricing override")]
    DuplicateOverride(String),

    #[error("{field} must be {expected}, got {value}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        field,
        expected: "a positive number",
        value,
    })
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        field,
        expected: "zero or more",
        value,
    })
}

/// Options for a [`PricingEngine`](crate::PricingEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Product families priced with a hand-gear surcharge and oversize panels
    pub hand_gear_families: Vec<HandGearFamily>,

    /// Insect screen pricing
    pub accessory: AccessoryOptions,

    /// Multiplier used for Special Color when a request carries none
    pub default_special_color_multiplier: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hand_gear_families: vec![HandGearFamily::default()],
            accessory: AccessoryOptions::default(),
            default_special_color_multiplier: 1.0,
        }
    }
}

impl EngineOptions {
    /// Parse options from a TOML document.
    ///
    /// # Example
    /// ```rust
    /// use ventprice::EngineOptions;
    ///
    /// let options = EngineOptions::from_toml_str(r#"
    ///     [[hand_gear_families]]
    ///     models = ["VD", "VD-2"]
    ///     unit_price = 700.0
    /// "#).unwrap();
    /// assert_eq!(options.hand_gear_families[0].unit_price, 700.0);
    /// assert_eq!(options.hand_gear_families[0].max_height, 40.0);
    /// assert_eq!(options.accessory.minimum, 50.0);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Check that every amount and limit is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(
            "default_special_color_multiplier",
            self.default_special_color_multiplier,
        )?;
        self.accessory.validate()?;
        self.hand_gear_families
            .iter()
            .try_for_each(HandGearFamily::validate)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// A family of products with hand-operated gear
///
/// Items beyond the panel limits are built from several panels. Every item
/// carries a surcharge per gear cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandGearFamily {
    /// Exact model names in the family
    pub models: Vec<String>,
    /// Price of one gear cell
    pub unit_price: f64,
    /// Largest panel height in inches
    pub max_height: f64,
    /// Largest panel width in inches
    pub max_width: f64,
    /// Side of one gear cell in millimeters
    pub cell_mm: f64,
}

impl Default for HandGearFamily {
    fn default() -> Self {
        Self {
            models: vec!["VD".to_string()],
            unit_price: 600.0,
            max_height: 40.0,
            max_width: 80.0,
            cell_mm: 1500.0,
        }
    }
}

impl HandGearFamily {
    /// Panel limits and cell size must be positive, the unit price not negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_height", self.max_height)?;
        positive("max_width", self.max_width)?;
        positive("cell_mm", self.cell_mm)?;
        non_negative("unit_price", self.unit_price)
    }
}

/// Insect screen pricing: `max(width × height × rate, minimum)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessoryOptions {
    /// Price per square inch
    pub rate: f64,
    /// Floor price
    pub minimum: f64,
}

impl Default for AccessoryOptions {
    fn default() -> Self {
        Self {
            rate: 0.15,
            minimum: 50.0,
        }
    }
}

impl AccessoryOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("accessory.rate", self.rate)?;
        non_negative("accessory.minimum", self.minimum)
    }

    pub fn price(&self, width: f64, height: f64) -> f64 {
        (width * height * self.rate).max(self.minimum)
    }
}
