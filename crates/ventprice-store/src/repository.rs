//! The price repository interface

use crate::error::StoreResult;
use ventprice_core::{ClosestPrice, PriceRow, Product, Shape, TablePrice};

/// Read-only access to products, price tables and extrapolation multipliers
///
/// Pure data access: no modifier is applied here. Missing rows and null
/// columns come back as `None`.
pub trait PriceRepository {
    /// Every model name, sorted.
    fn available_models(&self) -> StoreResult<Vec<String>>;

    /// Product row for a model.
    fn product(&self, model: &str) -> StoreResult<Option<Product>>;

    /// Price table a model is priced from.
    fn table_id(&self, model: &str) -> StoreResult<Option<i64>>;

    /// Exact rectangular lookup.
    fn price_for_dimensions(
        &self,
        table_id: i64,
        height: f64,
        width: f64,
    ) -> StoreResult<Option<TablePrice>>;

    /// Exact diameter lookup (diameter is stored in the height column).
    fn price_for_diameter(&self, table_id: i64, diameter: f64) -> StoreResult<Option<TablePrice>>;

    /// Per-foot rate for a matching size (stored in the height column).
    fn price_per_foot(&self, table_id: i64, size: f64) -> StoreResult<Option<f64>>;

    /// Per-foot rate of a specific row.
    fn price_per_foot_by_id(&self, price_id: i64) -> StoreResult<Option<f64>>;

    /// Full row by id.
    fn price_by_id(&self, price_id: i64) -> StoreResult<Option<PriceRow>>;

    /// Largest tabulated `(height, width)` of a table.
    fn max_dimensions(&self, table_id: i64) -> StoreResult<Option<(f64, f64)>>;

    /// Per-area extrapolation rate for a size beyond the table.
    ///
    /// - both dimensions exceed: the larger of the highest row multiplier and
    ///   the highest column multiplier; either may be missing and
    ///   non-positive values count as missing
    /// - width exceeds: the column multiplier at or below `height`
    /// - height exceeds: the row multiplier at or below `width`
    ///
    /// `None` when the size is inside the table or nothing is tabulated.
    fn exceeded_multiplier(
        &self,
        table_id: i64,
        width: f64,
        height: f64,
        with_damper: bool,
    ) -> StoreResult<Option<f64>>;

    /// Largest tabulated size at or below the requested one.
    fn closest_price_at_or_below(
        &self,
        table_id: i64,
        height: f64,
        width: f64,
    ) -> StoreResult<Option<ClosestPrice>>;

    /// Whether any price row of the model has no width.
    fn is_other_table(&self, model: &str) -> StoreResult<bool>;

    /// Whether any price row of the model carries a per-foot rate.
    fn has_price_per_foot(&self, model: &str) -> StoreResult<bool>;

    /// Whether any price row of the model has neither height nor width.
    fn has_no_dimensions(&self, model: &str) -> StoreResult<bool>;

    /// Tabulated `(width, height)` pairs of a rectangular table.
    fn rectangular_sizes(&self, table_id: i64) -> StoreResult<Vec<(f64, f64)>>;

    /// Tabulated diameters of a diameter table.
    fn diameters(&self, table_id: i64) -> StoreResult<Vec<f64>>;

    /// Matching sizes that carry a per-foot rate.
    fn price_per_foot_sizes(&self, table_id: i64) -> StoreResult<Vec<f64>>;

    /// Price row of a dimensionless product.
    ///
    /// The Nth product of a table (by `product_id`) owns the Nth row
    /// without dimensions.
    fn price_id_for_no_dimensions(&self, model: &str) -> StoreResult<Option<i64>>;

    /// How the model's table is indexed.
    fn shape(&self, model: &str) -> StoreResult<Shape> {
        if self.has_no_dimensions(model)? {
            return Ok(Shape::Dimensionless {
                per_foot: self.has_price_per_foot(model)?,
            });
        }
        if self.has_price_per_foot(model)? {
            return Ok(Shape::PricePerFoot);
        }
        if self.is_other_table(model)? {
            return Ok(Shape::Diameter);
        }
        Ok(Shape::Rectangular)
    }
}
