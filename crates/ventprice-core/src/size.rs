//! Size strings
//!
//! Sizes travel between the catalog and the engine as display strings:
//! `12" x 8"` for rectangular items (width first) and `8" diameter` for
//! round ones. Parsing truncates to whole inches, matching the way price
//! tables are indexed.

use crate::error::{Error, Result};
use crate::units::LengthUnit;
use lazy_regex::regex_captures;

/// Width and height of a rectangular item, in inches
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Order the pair so that width ≥ height.
    ///
    /// The flag is set when the pair had to be swapped.
    pub fn canonicalize(self) -> (Self, bool) {
        if self.height > self.width {
            (Self::new(self.height, self.width), true)
        } else {
            (self, false)
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Parse a `W x H` size string into whole-inch dimensions.
///
/// Plain numbers and `"` are inches. Metric or feet suffixes (`610mm x
/// 305mm`) are converted with the physical factors before truncation.
pub fn parse_size_string(size: &str) -> Result<Dimensions> {
    let lower = size.to_lowercase();
    let (_, width, width_unit, height, height_unit) = regex_captures!(
        r#"(\d+(?:\.\d+)?)\s*(mm|cm|ft|in|m|"|')?\s*x\s*(\d+(?:\.\d+)?)\s*(mm|cm|ft|in|m|"|')?"#,
        &lower
    )
    .ok_or_else(|| Error::InvalidSize(size.to_string()))?;

    let width = to_whole_inches(width, width_unit, size)?;
    let height = to_whole_inches(height, height_unit, size)?;
    Ok(Dimensions::new(width, height))
}

/// Parse a diameter string (`8"`, `8" diameter`, `8`) into whole inches.
pub fn parse_diameter(diameter: &str) -> Result<f64> {
    let (_, number) = regex_captures!(r"(\d+(?:\.\d+)?)", diameter)
        .ok_or_else(|| Error::InvalidDiameter(diameter.to_string()))?;
    number
        .parse::<f64>()
        .map(f64::trunc)
        .map_err(|_| Error::InvalidDiameter(diameter.to_string()))
}

/// Format inches the way the catalog shows them: `12"` or `12.5"`.
pub fn format_inches(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}\"", value as i64)
    } else {
        format!("{}\"", value)
    }
}

/// `12" x 8"`
pub fn format_rect(width: f64, height: f64) -> String {
    format!("{} x {}", format_inches(width), format_inches(height))
}

/// `8" diameter`
pub fn format_diameter(diameter: f64) -> String {
    format!("{} diameter", format_inches(diameter))
}

fn to_whole_inches(number: &str, unit: &str, original: &str) -> Result<f64> {
    let value: f64 = number
        .parse()
        .map_err(|_| Error::InvalidSize(original.to_string()))?;
    let inches = if unit.is_empty() {
        value
    } else {
        LengthUnit::parse(unit)?.to_physical_inches(value)
    };
    Ok(inches.trunc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_inch_sizes() {
        assert_eq!(parse_size_string("12\" x 8\"").unwrap(), Dimensions::new(12.0, 8.0));
        assert_eq!(parse_size_string("12 x 8").unwrap(), Dimensions::new(12.0, 8.0));
        assert_eq!(parse_size_string("12X8").unwrap(), Dimensions::new(12.0, 8.0));
        assert_eq!(
            parse_size_string("12.9\" x 8.2\"").unwrap(),
            Dimensions::new(12.0, 8.0)
        );
    }

    #[test]
    fn test_parse_metric_sizes_uses_physical_factor() {
        // 610mm = 24.02", 305mm = 12.01"
        assert_eq!(
            parse_size_string("610mm x 305mm").unwrap(),
            Dimensions::new(24.0, 12.0)
        );
        // 254mm is exactly 10" physically
        assert_eq!(
            parse_size_string("254mm x 254mm").unwrap(),
            Dimensions::new(10.0, 10.0)
        );
        assert_eq!(
            parse_size_string("2ft x 6\"").unwrap(),
            Dimensions::new(24.0, 6.0)
        );
    }

    #[test]
    fn test_parse_invalid_size() {
        assert_eq!(
            parse_size_string("twelve by eight"),
            Err(Error::InvalidSize("twelve by eight".into()))
        );
    }

    #[test]
    fn test_parse_diameter() {
        assert_eq!(parse_diameter("8\" diameter").unwrap(), 8.0);
        assert_eq!(parse_diameter("10.7").unwrap(), 10.0);
        assert!(parse_diameter("round").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_rect(12.0, 8.0), "12\" x 8\"");
        assert_eq!(format_rect(12.5, 8.0), "12.5\" x 8\"");
        assert_eq!(format_diameter(8.0), "8\" diameter");
    }

    #[test]
    fn test_canonicalize() {
        let (dims, swapped) = Dimensions::new(8.0, 12.0).canonicalize();
        assert_eq!(dims, Dimensions::new(12.0, 8.0));
        assert!(swapped);

        let (dims, swapped) = Dimensions::new(12.0, 8.0).canonicalize();
        assert_eq!(dims, Dimensions::new(12.0, 8.0));
        assert!(!swapped);
    }
}
