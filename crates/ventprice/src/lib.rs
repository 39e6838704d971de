//! # ventprice
//!
//! Parametric pricing for custom ventilation products.
//!
//! Prices come from size-indexed tables and are adjusted by per-product
//! modifiers stored as numbers or formulas.
//!
//! ## Features
//!
//! - Rectangular, diameter, per-foot and dimensionless price tables
//! - Rounding of requested sizes up to tabulated ones
//! - Extrapolation past the largest tabulated size
//! - The TB → BP → MWD → finish modifier chain
//! - Per-family overrides (hand-gear surcharge, oversize panels)
//! - Quote lines with filters, insect screens, quantities and discounts
//!
//! ## Example
//!
//! ```rust,no_run
//! use ventprice::prelude::*;
//!
//! let engine = PricingEngine::open("prices.db", EngineOptions::default())?;
//!
//! let item = ItemOptions::new().with_finish(Finish::Anodized);
//! let price = engine.price_for_default_table("ABC", &item, "12\" x 8\"")?;
//! println!("ABC 12x8 anodized: {price}");
//!
//! let request = QuoteRequest::from_product_code(
//!     "ABC(WD)+F.Nylon",
//!     QuoteDimensions::Rectangular {
//!         width: Length::millimeters(300.0),
//!         height: Length::millimeters(200.0),
//!     },
//! )
//! .with_quantity(4);
//! let line = engine.build_quote_item(&request)?;
//! println!("{} {} = {}", line.product_code, line.size, line.total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod calculator;
mod engine;
pub mod error;
pub mod options;
pub mod overrides;
pub mod prelude;
pub mod quote;
pub mod resolver;

pub use calculator::PriceBreakdown;
pub use engine::{ItemOptions, PricingEngine};
pub use error::{OpenError, PricingError, QuoteError, Result};
pub use options::{AccessoryOptions, ConfigError, EngineOptions, HandGearFamily};
pub use overrides::{HandGear, OverrideRegistry, PricingOverride};
pub use quote::{ProductCode, QuoteDimensions, QuoteItem, QuoteRequest, QuoteWarning};

// Re-export the types callers pass in
pub use ventprice_core::{size, Dimensions, Finish, Length, LengthUnit, Product, Shape};
pub use ventprice_formula::{Formula, FormulaError};
pub use ventprice_store::{PriceRepository, SqlitePriceStore, StoreError};
