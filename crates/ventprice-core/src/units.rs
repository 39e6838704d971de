//! Length units and conversion to inches
//!
//! Every price table is indexed in whole inches, so all caller-supplied
//! lengths are converted to inches before any lookup.
//!
//! Two conversion flavours exist and both are kept on purpose:
//!
//! - [`LengthUnit::to_inches`] is the quoting convention: millimetres are
//!   divided by 25 (and centimetres by 2.5, metres multiplied by 40). Quotes
//!   built over the years use these factors and must keep producing the
//!   same rounded sizes.
//! - [`LengthUnit::to_physical_inches`] uses the physical factor 25.4. Size
//!   strings written with explicit metric suffixes (`"610mm x 305mm"`) are
//!   read with it.

use crate::error::{Error, Result};
use lazy_regex::regex_captures;
use std::fmt;

/// Millimetres per inch used when quoting.
pub const QUOTE_MM_PER_INCH: f64 = 25.0;

/// Millimetres per inch, physical.
pub const PHYSICAL_MM_PER_INCH: f64 = 25.4;

/// Supported length units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LengthUnit {
    Inches,
    Millimeters,
    Centimeters,
    Meters,
    Feet,
}

impl LengthUnit {
    /// Parse a unit token (`mm`, `Millimeters`, `"`, `ft`, ...).
    ///
    /// Matching is case-insensitive and checks the more specific metric
    /// tokens first so that `mm` is never read as metres.
    pub fn parse(token: &str) -> Result<Self> {
        let lower = token.trim().to_lowercase();

        if lower.contains("mm") || lower.contains("millimeter") {
            return Ok(LengthUnit::Millimeters);
        }
        if lower.contains("cm") || lower.contains("centimeter") {
            return Ok(LengthUnit::Centimeters);
        }
        if lower == "m" || lower.contains("meter") || lower.contains("metre") {
            return Ok(LengthUnit::Meters);
        }
        if lower == "ft" || lower == "'" || lower.contains("foot") || lower.contains("feet") {
            return Ok(LengthUnit::Feet);
        }
        if lower.contains("inch") || lower == "\"" || lower == "in" {
            return Ok(LengthUnit::Inches);
        }

        Err(Error::InvalidUnit(token.to_string()))
    }

    /// Convert a value in this unit to inches using the quoting factors.
    pub fn to_inches(self, value: f64) -> f64 {
        match self {
            LengthUnit::Inches => value,
            LengthUnit::Millimeters => value / QUOTE_MM_PER_INCH,
            LengthUnit::Centimeters => value / 2.5,
            LengthUnit::Meters => value * 40.0,
            LengthUnit::Feet => value * 12.0,
        }
    }

    /// Convert a value in this unit to inches using the physical factors.
    pub fn to_physical_inches(self, value: f64) -> f64 {
        match self {
            LengthUnit::Inches => value,
            LengthUnit::Millimeters => value / PHYSICAL_MM_PER_INCH,
            LengthUnit::Centimeters => value / (PHYSICAL_MM_PER_INCH / 10.0),
            LengthUnit::Meters => value * 1000.0 / PHYSICAL_MM_PER_INCH,
            LengthUnit::Feet => value * 12.0,
        }
    }

    /// Short suffix used when echoing a caller's size back (`mm`, `"`).
    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Inches => "\"",
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Meters => "m",
            LengthUnit::Feet => "ft",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LengthUnit::Inches => "inches",
            LengthUnit::Millimeters => "millimeters",
            LengthUnit::Centimeters => "centimeters",
            LengthUnit::Meters => "meters",
            LengthUnit::Feet => "feet",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LengthUnit::parse(s)
    }
}

/// A caller-supplied length in its original unit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn inches(value: f64) -> Self {
        Self::new(value, LengthUnit::Inches)
    }

    pub fn millimeters(value: f64) -> Self {
        Self::new(value, LengthUnit::Millimeters)
    }

    /// Parse a length such as `550mm`, `3"`, `2ft`, `1.0m` or `50cm`.
    ///
    /// A bare number takes `default_unit`.
    pub fn parse(text: &str, default_unit: LengthUnit) -> Result<Self> {
        let trimmed = text.trim();
        let (_, number) = regex_captures!(r"(\d+(?:\.\d+)?)", trimmed)
            .ok_or_else(|| Error::InvalidDimension(text.to_string()))?;
        let value: f64 = number
            .parse()
            .map_err(|_| Error::InvalidDimension(text.to_string()))?;

        Ok(Self::new(value, detect_unit(trimmed).unwrap_or(default_unit)))
    }

    /// Value in inches, quoting convention.
    pub fn to_inches(&self) -> f64 {
        self.unit.to_inches(self.value)
    }

    /// Value in inches, physical convention.
    pub fn to_physical_inches(&self) -> f64 {
        self.unit.to_physical_inches(self.value)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Detect the unit written after a number, if any.
fn detect_unit(text: &str) -> Option<LengthUnit> {
    let lower = text.to_lowercase();

    if text.contains('"') {
        return Some(LengthUnit::Inches);
    }
    if text.contains('\'') {
        return Some(LengthUnit::Feet);
    }
    if lower.contains("mm") {
        return Some(LengthUnit::Millimeters);
    }
    if lower.contains("cm") {
        return Some(LengthUnit::Centimeters);
    }
    if lower.contains("ft") || lower.contains("feet") || lower.contains("foot") {
        return Some(LengthUnit::Feet);
    }
    if lower.contains("in") {
        return Some(LengthUnit::Inches);
    }
    if lower.contains('m') {
        return Some(LengthUnit::Meters);
    }
    None
}
