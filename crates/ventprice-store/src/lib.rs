//! # ventprice-store
//!
//! Read-only price repository for ventprice.
//!
//! - [`PriceRepository`] - The data access interface the engine prices against
//! - [`SqlitePriceStore`] - Implementation over the importer's SQLite database
//!
//! ## Example
//!
//! ```rust,no_run
//! use ventprice_store::{PriceRepository, SqlitePriceStore};
//!
//! let store = SqlitePriceStore::open("prices.db")?;
//! for model in store.available_models()? {
//!     println!("{model}");
//! }
//! # Ok::<(), ventprice_store::StoreError>(())
//! ```

pub mod error;
pub mod repository;
pub mod schema;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use repository::PriceRepository;
pub use sqlite::SqlitePriceStore;
