//! Quote lines
//!
//! A quote line prices one catalog item as ordered: dimensions in the
//! caller's units, the selected finish, options encoded in the product code,
//! quantity and discount. Money amounts are [`Decimal`]s.

use crate::engine::{ItemOptions, PricingEngine};
use crate::error::{PricingError, QuoteError};
use crate::resolver::canonicalize;
use lazy_regex::{regex, regex_captures};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use ventprice_core::size::{format_diameter, format_inches, format_rect};
use ventprice_core::{Dimensions, Finish, Length, LengthUnit, Shape};
use ventprice_store::PriceRepository;

/// Dimensions as entered for a quote line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum QuoteDimensions {
    Rectangular { width: Length, height: Length },
    Diameter(Length),
    /// Height only, for slot products priced per foot
    Height(Length),
    None,
}

/// One line to be quoted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub model: String,
    pub finish: Option<Finish>,
    pub quantity: u32,
    pub with_damper: bool,
    /// Insect screen
    pub accessory: bool,
    pub filter: Option<String>,
    /// Percentage, 0-100
    pub discount_percent: Decimal,
    pub special_color_multiplier: Option<f64>,
    pub dimensions: QuoteDimensions,
}

impl QuoteRequest {
    /// A single plain item.
    pub fn new(model: impl Into<String>, dimensions: QuoteDimensions) -> Self {
        Self {
            model: model.into(),
            finish: None,
            quantity: 1,
            with_damper: false,
            accessory: false,
            filter: None,
            discount_percent: Decimal::ZERO,
            special_color_multiplier: None,
            dimensions,
        }
    }

    /// A request with the model and options taken from a product code.
    pub fn from_product_code(code: &str, dimensions: QuoteDimensions) -> Self {
        let code = ProductCode::parse(code);
        Self {
            with_damper: code.with_damper,
            accessory: code.accessory,
            filter: code.filter,
            ..Self::new(code.model, dimensions)
        }
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.finish = Some(finish);
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_discount(mut self, percent: Decimal) -> Self {
        self.discount_percent = percent;
        self
    }

    pub fn product_code(&self) -> ProductCode {
        ProductCode {
            model: self.model.clone(),
            with_damper: self.with_damper,
            accessory: self.accessory,
            filter: self.filter.clone(),
        }
    }

    fn item_options(&self) -> ItemOptions {
        ItemOptions {
            finish: self.finish.clone(),
            with_damper: self.with_damper,
            special_color_multiplier: self.special_color_multiplier,
        }
    }

    fn filter_name(&self) -> Option<&str> {
        self.filter.as_deref().map(str::trim).filter(|f| !f.is_empty())
    }
}

/// Something the caller should see but that did not stop the quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuoteWarning {
    /// Height was larger than width; the pair was priced the other way round
    DimensionsSwapped { width: f64, height: f64 },
}

impl fmt::Display for QuoteWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteWarning::DimensionsSwapped { width, height } => write!(
                f,
                "Width and height appear to be swapped. Using {} instead.",
                format_rect(*width, *height)
            ),
        }
    }
}

/// A priced quote line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub product_code: String,
    /// Size as entered, in the caller's units
    pub size: String,
    /// Tabulated size the item was priced at
    pub rounded_size: Option<String>,
    pub finish: Option<String>,
    pub quantity: u32,
    /// Price without finish
    pub table_price: Decimal,
    pub price_after_finish: Decimal,
    pub filter_price: Decimal,
    pub accessory_price: Decimal,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub discounted_unit_price: Decimal,
    pub total: Decimal,
    pub warnings: Vec<QuoteWarning>,
}

/// Model plus options, as written on a quote: `ABC(WD)(INS)+F.Nylon`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCode {
    pub model: String,
    pub with_damper: bool,
    pub accessory: bool,
    pub filter: Option<String>,
}

impl ProductCode {
    /// Split a product code into model and options.
    ///
    /// Accepts `(WD)(INS)`, `(WD,INS)`, `(INS,WD)` and options written after
    /// the filter (`ABC+F.Nylon(WD)`).
    ///
    /// ```rust
    /// use ventprice::ProductCode;
    ///
    /// let code = ProductCode::parse("ABC(WD,INS)+F.Nylon");
    /// assert_eq!(code.model, "ABC");
    /// assert!(code.with_damper && code.accessory);
    /// assert_eq!(code.filter.as_deref(), Some("Nylon"));
    /// ```
    pub fn parse(code: &str) -> Self {
        let mut product = code.trim().to_string();
        let mut filter = None;

        if let Some((head, tail)) = code.trim().split_once("+F.") {
            let tail = tail.trim();
            product = head.trim().to_string();
            match tail.find('(') {
                Some(pos) => {
                    product.push_str(&tail[pos..]);
                    filter = Some(tail[..pos].trim().to_string());
                }
                None => filter = Some(tail.to_string()),
            }
        }

        let mut with_damper = false;
        let mut accessory = false;
        let combined = [
            regex!(r"(?i)\(?\s*WD\s*,\s*INS\s*\)?$"),
            regex!(r"(?i)\(?\s*INS\s*,\s*WD\s*\)?$"),
        ];

        if let Some(pattern) = combined.iter().find(|re| re.is_match(&product)) {
            let stripped = pattern.replace(&product, "").trim().to_string();
            product = stripped;
            with_damper = true;
            accessory = true;
        } else {
            if product.contains("(INS)") {
                product = product.replace("(INS)", "").trim().to_string();
                accessory = true;
            }
            if product.contains("(WD)") {
                product = product.replace("(WD)", "").trim().to_string();
                with_damper = true;
            }
        }

        Self {
            model: product,
            with_damper,
            accessory,
            filter: filter.filter(|f| !f.is_empty()),
        }
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.model)?;
        if self.with_damper {
            f.write_str("(WD)")?;
        }
        if self.accessory {
            f.write_str("(INS)")?;
        }
        if let Some(filter) = &self.filter {
            write!(f, "+F.{}", filter)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ProductCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ProductCode::parse(s))
    }
}

/// Leading digits of a model name (`"3 SLOT"` → `"3"`).
pub fn slot_number(model: &str) -> Option<&str> {
    regex_captures!(r"^(\d+)", model.trim()).map(|(_, digits)| digits)
}

/// What a pricing path produced before money arithmetic
struct PricedLine {
    table_price: i64,
    price_after_finish: i64,
    filter_price: f64,
    accessory_price: f64,
    size: String,
    rounded_size: Option<String>,
}

/// Size a filter is priced at
#[derive(Debug, Clone, Copy)]
enum FilterSize {
    Rect(Dimensions),
    Diameter(f64),
}

impl<R: PriceRepository> PricingEngine<R> {
    /// Price one quote line.
    pub fn build_quote_item(&self, request: &QuoteRequest) -> Result<QuoteItem, QuoteError> {
        let model = request.model.trim();
        let shape = self.shape(model)?;
        let mut warnings = Vec::new();

        let line = match shape {
            Shape::Rectangular => self.quote_rectangular(model, request, &mut warnings)?,
            Shape::PricePerFoot => self.quote_price_per_foot(model, request, &mut warnings)?,
            Shape::Diameter => self.quote_diameter(model, request)?,
            Shape::Dimensionless { per_foot } => {
                self.quote_dimensionless(model, request, per_foot)?
            }
        };

        let unit_price = Decimal::from(line.price_after_finish)
            + money(line.filter_price)?
            + money(line.accessory_price)?;
        let discount_factor = Decimal::ONE - request.discount_percent / Decimal::ONE_HUNDRED;
        let discounted_unit_price = unit_price * discount_factor;
        let total = discounted_unit_price * Decimal::from(request.quantity);

        let item = QuoteItem {
            product_code: request.product_code().to_string(),
            size: line.size,
            rounded_size: line.rounded_size,
            finish: request.finish.as_ref().map(ToString::to_string),
            quantity: request.quantity,
            table_price: Decimal::from(line.table_price),
            price_after_finish: Decimal::from(line.price_after_finish),
            filter_price: money(line.filter_price)?,
            accessory_price: money(line.accessory_price)?,
            unit_price,
            discount_percent: request.discount_percent,
            discounted_unit_price,
            total,
            warnings,
        };
        debug!(
            product_code = %item.product_code,
            unit_price = %item.unit_price,
            total = %item.total,
            "built quote item"
        );
        Ok(item)
    }

    fn quote_rectangular(
        &self,
        model: &str,
        request: &QuoteRequest,
        warnings: &mut Vec<QuoteWarning>,
    ) -> Result<PricedLine, QuoteError> {
        let (mut width, mut height) = rect_lengths(model, request)?;
        let (dims, swapped) = canonicalize(Dimensions::new(width.to_inches(), height.to_inches()));
        if swapped {
            std::mem::swap(&mut width, &mut height);
            warnings.push(QuoteWarning::DimensionsSwapped {
                width: dims.width,
                height: dims.height,
            });
        }

        let size = self
            .find_rounded_default_table_size(model, dims.width, dims.height)?
            .unwrap_or_else(|| format_rect(dims.width, dims.height));

        let item = request.item_options();
        let neutral = ItemOptions {
            finish: None,
            ..item.clone()
        };

        Ok(PricedLine {
            table_price: self.price_for_default_table(model, &neutral, &size)?,
            price_after_finish: self.price_for_default_table(model, &item, &size)?,
            filter_price: self.filter_price(request, FilterSize::Rect(dims))?,
            accessory_price: self.accessory_price(request, dims),
            size: format!("{} x {}", width, height),
            rounded_size: Some(size),
        })
    }

    fn quote_price_per_foot(
        &self,
        model: &str,
        request: &QuoteRequest,
        warnings: &mut Vec<QuoteWarning>,
    ) -> Result<PricedLine, QuoteError> {
        let (width, height) = rect_lengths(model, request)?;
        let (dims, swapped) = canonicalize(Dimensions::new(width.to_inches(), height.to_inches()));
        if swapped {
            warnings.push(QuoteWarning::DimensionsSwapped {
                width: dims.width,
                height: dims.height,
            });
        }

        let match_dimension = self
            .find_rounded_price_per_foot_width(model, dims.height.round())?
            .ok_or_else(|| PricingError::size_not_found(model, format_inches(dims.height)))?;

        let item = request.item_options();
        let neutral = ItemOptions {
            finish: None,
            ..item.clone()
        };

        Ok(PricedLine {
            table_price: self.price_for_price_per_foot(model, &neutral, match_dimension, dims.width)?,
            price_after_finish: self.price_for_price_per_foot(
                model,
                &item,
                match_dimension,
                dims.width,
            )?,
            filter_price: self.filter_price(request, FilterSize::Rect(dims))?,
            accessory_price: self.accessory_price(request, dims),
            size: format!("{} x {}", width, height),
            rounded_size: Some(format_rect(dims.width, match_dimension)),
        })
    }

    fn quote_diameter(&self, model: &str, request: &QuoteRequest) -> Result<PricedLine, QuoteError> {
        let diameter = match request.dimensions {
            QuoteDimensions::Diameter(size) => size,
            _ => return Err(missing(model, "Size")),
        };
        let inches = diameter.to_inches();

        let size = self
            .find_rounded_other_table_size(model, inches)?
            .unwrap_or_else(|| format_diameter(inches));

        if request.accessory {
            warn!(model, "insect screen is not priced for round products");
        }

        let item = request.item_options();
        let neutral = ItemOptions {
            finish: None,
            ..item.clone()
        };

        Ok(PricedLine {
            table_price: self.price_for_other_table(model, &neutral, &size)?,
            price_after_finish: self.price_for_other_table(model, &item, &size)?,
            filter_price: self.filter_price(request, FilterSize::Diameter(inches))?,
            accessory_price: 0.0,
            size: diameter.to_string(),
            rounded_size: Some(size),
        })
    }

    fn quote_dimensionless(
        &self,
        model: &str,
        request: &QuoteRequest,
        per_foot: bool,
    ) -> Result<PricedLine, QuoteError> {
        if request.accessory || request.filter_name().is_some() {
            warn!(model, "options are not priced for products without dimensions");
        }

        let height = match request.dimensions {
            QuoteDimensions::Height(height) => Some(height),
            QuoteDimensions::Rectangular { height, .. } => Some(height),
            _ => None,
        };
        if per_foot && height.is_none() {
            return Err(missing(model, "Height"));
        }

        let length = if per_foot {
            height.map(|h| h.to_inches())
        } else {
            None
        };
        let item = request.item_options();
        let neutral = ItemOptions {
            finish: None,
            ..item.clone()
        };

        let slot = slot_number(model).unwrap_or_default();
        let size = match height.filter(|_| per_foot) {
            Some(h) if h.unit == LengthUnit::Millimeters => format!("{}Slot x {}", slot, h),
            Some(h) => format!("{}Slot x {}", slot, format_inches(h.to_inches())),
            // Rows picked by position may still carry a diameter
            None => match self.dimensionless_row_height(model)? {
                Some(diameter) => format!("{}Slot x {}", slot, format_inches(diameter)),
                None => format!("{}Slot", slot),
            },
        };

        Ok(PricedLine {
            table_price: self.price_for_no_dimensions(model, &neutral, length)?,
            price_after_finish: self.price_for_no_dimensions(model, &item, length)?,
            filter_price: 0.0,
            accessory_price: 0.0,
            size,
            rounded_size: None,
        })
    }

    /// Height stored on the row a dimensionless model is priced from.
    fn dimensionless_row_height(&self, model: &str) -> Result<Option<f64>, QuoteError> {
        let repo = self.repository();
        let Some(price_id) = repo
            .price_id_for_no_dimensions(model)
            .map_err(PricingError::from)?
        else {
            return Ok(None);
        };
        let row = repo.price_by_id(price_id).map_err(PricingError::from)?;
        Ok(row.and_then(|row| row.height))
    }

    /// Filter priced finish-neutral and without damper at the host's size.
    fn filter_price(&self, request: &QuoteRequest, size: FilterSize) -> Result<f64, QuoteError> {
        let Some(name) = request.filter_name() else {
            return Ok(0.0);
        };
        let filter_model = self
            .find_filter_model(name)?
            .ok_or_else(|| QuoteError::FilterNotFound(name.to_string()))?;
        let item = ItemOptions::new();

        let price = match size {
            FilterSize::Rect(dims) => {
                let width = dims.width.max(dims.height).trunc();
                let height = dims.width.min(dims.height).trunc();
                let size = self
                    .find_rounded_default_table_size(&filter_model, width, height)?
                    .unwrap_or_else(|| format_rect(width, height));
                self.price_for_default_table(&filter_model, &item, &size)?
            }
            FilterSize::Diameter(diameter) => {
                let size = self
                    .find_rounded_other_table_size(&filter_model, diameter)?
                    .unwrap_or_else(|| format_diameter(diameter.trunc()));
                self.price_for_other_table(&filter_model, &item, &size)?
            }
        };

        debug!(filter = %filter_model, price, "priced filter");
        Ok(price as f64)
    }

    fn accessory_price(&self, request: &QuoteRequest, dims: Dimensions) -> f64 {
        if request.accessory {
            self.options().accessory.price(dims.width, dims.height)
        } else {
            0.0
        }
    }
}

fn rect_lengths(model: &str, request: &QuoteRequest) -> Result<(Length, Length), QuoteError> {
    match request.dimensions {
        QuoteDimensions::Rectangular { width, height } => Ok((width, height)),
        _ => Err(missing(model, "Width and height")),
    }
}

fn missing(model: &str, what: &'static str) -> QuoteError {
    QuoteError::MissingDimension {
        model: model.to_string(),
        what,
    }
}

fn money(value: f64) -> Result<Decimal, QuoteError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .ok_or(QuoteError::Amount(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn code(model: &str, with_damper: bool, accessory: bool, filter: Option<&str>) -> ProductCode {
        ProductCode {
            model: model.to_string(),
            with_damper,
            accessory,
            filter: filter.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_plain_and_flagged_codes() {
        assert_eq!(ProductCode::parse("ABC"), code("ABC", false, false, None));
        assert_eq!(ProductCode::parse("ABC(WD)"), code("ABC", true, false, None));
        assert_eq!(ProductCode::parse("ABC(INS)"), code("ABC", false, true, None));
        assert_eq!(ProductCode::parse("ABC(WD)(INS)"), code("ABC", true, true, None));
    }

    #[test]
    fn test_parse_combined_flags() {
        assert_eq!(ProductCode::parse("ABC(WD,INS)"), code("ABC", true, true, None));
        assert_eq!(ProductCode::parse("ABC (ins, wd)"), code("ABC", true, true, None));
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            ProductCode::parse("ABC(WD)+F.Nylon"),
            code("ABC", true, false, Some("Nylon"))
        );
        assert_eq!(
            ProductCode::parse("ABC+F.Nylon(WD)"),
            code("ABC", true, false, Some("Nylon"))
        );
        assert_eq!(ProductCode::parse("ABC+F."), code("ABC", false, false, None));
    }

    #[test]
    fn test_display_round_trips_canonical_form() {
        let full = code("ABC", true, true, Some("Nylon"));
        assert_eq!(full.to_string(), "ABC(WD)(INS)+F.Nylon");
        assert_eq!(ProductCode::parse(&full.to_string()), full);
    }

    #[test]
    fn test_slot_number() {
        assert_eq!(slot_number("3 SLOT"), Some("3"));
        assert_eq!(slot_number("10XYZ"), Some("10"));
        assert_eq!(slot_number("ABC"), None);
    }

    #[test]
    fn test_swap_warning_text() {
        let warning = QuoteWarning::DimensionsSwapped {
            width: 12.0,
            height: 8.0,
        };
        assert_eq!(
            warning.to_string(),
            "Width and height appear to be swapped. Using 12\" x 8\" instead."
        );
    }

    #[test]
    fn test_money_rounds_to_cents() {
        assert_eq!(money(14.4).unwrap(), Decimal::new(1440, 2));
        assert_eq!(money(50.0).unwrap(), Decimal::from(50));
        assert!(money(f64::NAN).is_err());
    }
}
