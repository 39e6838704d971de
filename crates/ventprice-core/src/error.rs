//! Error types for ventprice-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while interpreting caller-supplied sizes and units
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Size string does not look like `W x H`
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    /// Diameter string carries no number
    #[error("Invalid diameter: {0}")]
    InvalidDiameter(String),

    /// Length unit is not one of the supported units
    #[error(
        "Incompatible unit \"{0}\". Supported units are: inches (or \"), millimeters (or mm), \
         centimeters (or cm), meters (or m), feet (or ft)"
    )]
    InvalidUnit(String),

    /// Dimension value could not be read as a number
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
}
