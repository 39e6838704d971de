//! Prelude module - common imports for ventprice users
//!
//! ```rust
//! use ventprice::prelude::*;
//! ```

pub use crate::{
    // Engine
    EngineOptions,
    Finish,
    ItemOptions,
    Length,
    LengthUnit,
    PriceBreakdown,
    PriceRepository,
    PricingEngine,
    // Errors
    PricingError,
    // Quotes
    ProductCode,
    QuoteDimensions,
    QuoteError,
    QuoteItem,
    QuoteRequest,
    QuoteWarning,
    Shape,
    SqlitePriceStore,
};
