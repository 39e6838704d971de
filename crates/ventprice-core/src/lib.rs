//! # ventprice-core
//!
//! Core data model for the ventprice pricing engine.
//!
//! This crate provides the types shared by every other ventprice crate:
//! - [`Product`] - A sellable model and its modifier slots
//! - [`TablePrice`] and [`PriceRow`] - Tabulated prices
//! - [`Finish`] - Surface finishes as named in the catalog
//! - [`LengthUnit`] and [`Length`] - Caller-supplied lengths
//! - [`Dimensions`] and the size string helpers in [`size`]
//!
//! ## Example
//!
//! ```rust
//! use ventprice_core::{size, Finish, Length, LengthUnit};
//!
//! let dims = size::parse_size_string("12\" x 8\"").unwrap();
//! assert_eq!((dims.width, dims.height), (12.0, 8.0));
//!
//! let length = Length::parse("300mm", LengthUnit::Inches).unwrap();
//! assert_eq!(length.to_inches(), 12.0);
//!
//! assert_eq!(Finish::parse("Anodized Aluminum"), Finish::Anodized);
//! ```

pub mod error;
pub mod finish;
pub mod price;
pub mod product;
pub mod size;
pub mod units;

// Re-exports for convenience
pub use error::{Error, Result};
pub use finish::Finish;
pub use price::{ClosestPrice, PriceRow, TablePrice};
pub use product::{Product, Shape};
pub use size::Dimensions;
pub use units::{Length, LengthUnit};
