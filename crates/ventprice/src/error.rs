//! Error types for pricing and quoting

use thiserror::Error;
use ventprice_formula::FormulaError;
use ventprice_store::StoreError;

/// Result type alias using [`PricingError`]
pub type Result<T> = std::result::Result<T, PricingError>;

/// Errors raised while pricing one item
///
/// None of these leave anything behind; the caller shows "N/A" and moves on.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Model is not in the catalog
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Model exists but nothing prices the requested size
    #[error("price not available for {model} at {size}")]
    PriceNotFound { model: String, size: String },

    /// No tabulated size covers the request
    #[error("size not available for {model}: {size}")]
    SizeNotFound { model: String, size: String },

    /// Size, diameter or length could not be read
    #[error(transparent)]
    InvalidSize(#[from] ventprice_core::Error),

    /// Special Color multiplier is not a positive finite number
    #[error("invalid special color multiplier: {0}")]
    InvalidMultiplier(f64),

    /// The chain produced a negative or non-finite amount
    #[error("price is not a valid amount: {0}")]
    InvalidPrice(f64),

    /// Formula rejected outside the recoverable modifier stages
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// Price database failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PricingError {
    /// Short label shown to users instead of a price
    pub fn label(&self) -> &'static str {
        match self {
            PricingError::ProductNotFound(_) => "product not found",
            PricingError::PriceNotFound { .. } | PricingError::SizeNotFound { .. } => {
                "size not available"
            }
            PricingError::InvalidSize(_) => "invalid size",
            PricingError::InvalidMultiplier(_) => "invalid multiplier",
            PricingError::InvalidPrice(_) => "invalid price",
            PricingError::Formula(_) => "invalid formula",
            PricingError::Store(_) => "price list unavailable",
        }
    }

    pub(crate) fn price_not_found(model: &str, size: impl Into<String>) -> Self {
        PricingError::PriceNotFound {
            model: model.to_string(),
            size: size.into(),
        }
    }

    pub(crate) fn size_not_found(model: &str, size: impl Into<String>) -> Self {
        PricingError::SizeNotFound {
            model: model.to_string(),
            size: size.into(),
        }
    }
}

/// Errors raised while building a quote line
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Pricing the item or its filter failed
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A length or unit could not be read
    #[error(transparent)]
    Dimension(#[from] ventprice_core::Error),

    /// The request lacks the dimensions this product is priced by
    #[error("{what} required for {model}")]
    MissingDimension { model: String, what: &'static str },

    /// No catalog model matches the filter name
    #[error("Filter \"{0}\" not found in database")]
    FilterNotFound(String),

    /// An amount could not be represented as a decimal
    #[error("amount out of range: {0}")]
    Amount(f64),
}

/// Errors raised while opening an engine over a database file
#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] crate::options::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(
            PricingError::ProductNotFound("X".into()).label(),
            "product not found"
        );
        assert_eq!(
            PricingError::price_not_found("X", "12\" x 8\"").label(),
            "size not available"
        );
        assert_eq!(
            PricingError::size_not_found("X", "8\" diameter").to_string(),
            "size not available for X: 8\" diameter"
        );
        assert_eq!(PricingError::InvalidMultiplier(-2.0).label(), "invalid multiplier");
        assert_eq!(
            PricingError::InvalidPrice(f64::INFINITY).to_string(),
            "price is not a valid amount: inf"
        );
    }
}
