//! The pricing engine

use crate::calculator::{run_chain, CatalogResolver, ChainInput, PriceBreakdown, SizeVars};
use crate::error::{OpenError, PricingError, Result};
use crate::options::{ConfigError, EngineOptions};
use crate::overrides::OverrideRegistry;
use crate::resolver::{find_rounded_size, find_rounded_value};
use std::path::Path;
use tracing::debug;
use ventprice_core::size::{
    format_diameter, format_inches, format_rect, parse_diameter, parse_size_string,
};
use ventprice_core::{Dimensions, Finish, Product, Shape, TablePrice};
use ventprice_store::{PriceRepository, SqlitePriceStore};

/// How an item is ordered, independent of its size
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemOptions {
    /// Finish to price, `None` for the finish-neutral table price
    pub finish: Option<Finish>,

    /// Price with a damper (uses `MWD` as the base)
    pub with_damper: bool,

    /// Multiplier for Special Color; the engine default when unset
    pub special_color_multiplier: Option<f64>,
}

impl ItemOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.finish = Some(finish);
        self
    }

    pub fn damper(mut self, with_damper: bool) -> Self {
        self.with_damper = with_damper;
        self
    }

    pub fn with_special_color_multiplier(mut self, multiplier: f64) -> Self {
        self.special_color_multiplier = Some(multiplier);
        self
    }
}

/// Prices catalog items against a [`PriceRepository`]
///
/// The engine holds no mutable state: identical calls against an unchanged
/// repository return identical prices.
#[derive(Debug)]
pub struct PricingEngine<R = SqlitePriceStore> {
    repo: R,
    options: EngineOptions,
    overrides: OverrideRegistry,
}

impl PricingEngine<SqlitePriceStore> {
    /// Open a price database read-only.
    pub fn open(path: impl AsRef<Path>, options: EngineOptions) -> std::result::Result<Self, OpenError> {
        let store = SqlitePriceStore::open(path)?;
        Ok(Self::new(store, options)?)
    }
}

impl<R: PriceRepository> PricingEngine<R> {
    /// Create an engine, resolving the configured overrides.
    pub fn new(repo: R, options: EngineOptions) -> std::result::Result<Self, ConfigError> {
        options.validate()?;
        let overrides = OverrideRegistry::from_options(&options)?;
        Ok(Self {
            repo,
            options,
            overrides,
        })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn overrides(&self) -> &OverrideRegistry {
        &self.overrides
    }

    /// Give the repository back.
    pub fn into_repository(self) -> R {
        self.repo
    }

    // === Catalog ===

    pub fn available_models(&self) -> Result<Vec<String>> {
        Ok(self.repo.available_models()?)
    }

    /// Finishes offered for a model: the stored ones in catalog order, then
    /// Special Color.
    pub fn available_finishes(&self, model: &str) -> Result<Vec<String>> {
        Ok(self.product(model)?.available_finishes())
    }

    pub fn is_other_table(&self, model: &str) -> Result<bool> {
        Ok(self.repo.is_other_table(model)?)
    }

    pub fn has_price_per_foot(&self, model: &str) -> Result<bool> {
        Ok(self.repo.has_price_per_foot(model)?)
    }

    pub fn has_no_dimensions(&self, model: &str) -> Result<bool> {
        Ok(self.repo.has_no_dimensions(model)?)
    }

    pub fn has_damper_option(&self, model: &str) -> Result<bool> {
        Ok(self.product(model)?.has_damper_option())
    }

    pub fn shape(&self, model: &str) -> Result<Shape> {
        self.product(model)?;
        Ok(self.repo.shape(model)?)
    }

    /// First model whose name contains `name`, ignoring case.
    pub fn find_filter_model(&self, name: &str) -> Result<Option<String>> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }
        Ok(self
            .repo
            .available_models()?
            .into_iter()
            .find(|model| model.to_lowercase().contains(&needle)))
    }

    // === Size rounding ===

    /// Smallest tabulated size covering `width × height`, as `12" x 8"`.
    pub fn find_rounded_default_table_size(
        &self,
        model: &str,
        width: f64,
        height: f64,
    ) -> Result<Option<String>> {
        let product = self.product(model)?;
        let sizes = self.repo.rectangular_sizes(product.table_id)?;
        let rounded = find_rounded_size(&sizes, width, height);
        debug!(model, width, height, ?rounded, "rounded rectangular size");
        Ok(rounded.map(|(w, h)| format_rect(w, h)))
    }

    /// Smallest tabulated diameter covering the request, as `8" diameter`.
    pub fn find_rounded_other_table_size(&self, model: &str, diameter: f64) -> Result<Option<String>> {
        let product = self.product(model)?;
        let diameters = self.repo.diameters(product.table_id)?;
        let rounded = find_rounded_value(&diameters, diameter.trunc());
        debug!(model, diameter, ?rounded, "rounded diameter");
        Ok(rounded.map(format_diameter))
    }

    /// Smallest per-foot matching size covering `width`.
    pub fn find_rounded_price_per_foot_width(&self, model: &str, width: f64) -> Result<Option<f64>> {
        let product = self.product(model)?;
        let sizes = self.repo.price_per_foot_sizes(product.table_id)?;
        Ok(find_rounded_value(&sizes, width.trunc()))
    }

    // === Pricing ===

    /// Price a rectangular item from a `W x H` size string.
    pub fn price_for_default_table(&self, model: &str, item: &ItemOptions, size: &str) -> Result<i64> {
        self.breakdown_for_default_table(model, item, size)
            .map(|b| b.price)
    }

    pub fn breakdown_for_default_table(
        &self,
        model: &str,
        item: &ItemOptions,
        size: &str,
    ) -> Result<PriceBreakdown> {
        let dims = parse_size_string(size)?;
        let product = self.product(model)?;
        let family = self.overrides.for_model(model);

        if let Some(family) = family {
            if let Some(breakdown) =
                family.price_oversized(&self.repo, &product, dims, item.with_damper)?
            {
                return Ok(breakdown);
            }
        }

        let price = self
            .rectangular_price(&product, dims)?
            .ok_or_else(|| PricingError::price_not_found(model, size))?;
        let vars = SizeVars::Rect {
            width: dims.width,
            height: dims.height,
        };
        let breakdown = self.chain(&product, item, price, vars, size)?;

        Ok(match family {
            Some(family) => breakdown.with_surcharge(family.surcharge(dims))?,
            None => breakdown,
        })
    }

    /// Price a round item from a diameter string (`8"`, `8" diameter`).
    pub fn price_for_other_table(&self, model: &str, item: &ItemOptions, diameter: &str) -> Result<i64> {
        self.breakdown_for_other_table(model, item, diameter)
            .map(|b| b.price)
    }

    pub fn breakdown_for_other_table(
        &self,
        model: &str,
        item: &ItemOptions,
        diameter: &str,
    ) -> Result<PriceBreakdown> {
        let size = parse_diameter(diameter)?;
        let product = self.product(model)?;
        let price = self
            .repo
            .price_for_diameter(product.table_id, size)?
            .ok_or_else(|| PricingError::price_not_found(model, diameter))?;
        self.chain(&product, item, price, SizeVars::Diameter(size), diameter)
    }

    /// Price a linear item: the rate for `match_dimension` times `length`
    /// in feet.
    pub fn price_for_price_per_foot(
        &self,
        model: &str,
        item: &ItemOptions,
        match_dimension: f64,
        length: f64,
    ) -> Result<i64> {
        self.breakdown_for_price_per_foot(model, item, match_dimension, length)
            .map(|b| b.price)
    }

    pub fn breakdown_for_price_per_foot(
        &self,
        model: &str,
        item: &ItemOptions,
        match_dimension: f64,
        length: f64,
    ) -> Result<PriceBreakdown> {
        let product = self.product(model)?;
        let label = format_rect(length, match_dimension);
        let rate = self
            .repo
            .price_per_foot(product.table_id, match_dimension.trunc())?
            .ok_or_else(|| PricingError::price_not_found(model, label.as_str()))?;

        let linear = length / 12.0 * rate;
        let vars = SizeVars::Rect {
            width: match_dimension,
            height: length,
        };
        self.chain(&product, item, TablePrice::new(linear, Some(linear)), vars, &label)
    }

    /// Price a product whose rows carry no dimensions.
    ///
    /// Per-foot rows need a length in inches; other rows ignore it.
    pub fn price_for_no_dimensions(
        &self,
        model: &str,
        item: &ItemOptions,
        length: Option<f64>,
    ) -> Result<i64> {
        self.breakdown_for_no_dimensions(model, item, length)
            .map(|b| b.price)
    }

    pub fn breakdown_for_no_dimensions(
        &self,
        model: &str,
        item: &ItemOptions,
        length: Option<f64>,
    ) -> Result<PriceBreakdown> {
        let product = self.product(model)?;
        let price_id = self
            .repo
            .price_id_for_no_dimensions(model)?
            .ok_or_else(|| PricingError::price_not_found(model, "no dimensions"))?;

        if let Some(rate) = self.repo.price_per_foot_by_id(price_id)? {
            let length = length.ok_or_else(|| {
                ventprice_core::Error::InvalidDimension(format!("length required for {model}"))
            })?;
            let linear = length / 12.0 * rate;
            let label = format_inches(length);
            return self.chain(
                &product,
                item,
                TablePrice::new(linear, Some(linear)),
                SizeVars::Length(length),
                &label,
            );
        }

        let price = self
            .repo
            .price_by_id(price_id)?
            .and_then(|row| row.table_price())
            .ok_or_else(|| PricingError::price_not_found(model, "no dimensions"))?;
        self.chain(&product, item, price, SizeVars::None, "no dimensions")
    }

    // === Internals ===

    pub(crate) fn product(&self, model: &str) -> Result<Product> {
        self.repo
            .product(model)?
            .ok_or_else(|| PricingError::ProductNotFound(model.to_string()))
    }

    /// Table prices of a rectangular size, extrapolated past the table's edge.
    fn rectangular_price(&self, product: &Product, dims: Dimensions) -> Result<Option<TablePrice>> {
        let Dimensions { width, height } = dims;
        let table = product.table_id;

        if let Some(multiplier) = self.repo.exceeded_multiplier(table, width, height, false)? {
            let tb = height * width * multiplier;
            let wd = self
                .repo
                .exceeded_multiplier(table, width, height, true)?
                .map(|m| height * width * m)
                .unwrap_or(tb);
            debug!(model = %product.model, width, height, tb, wd, "extrapolated past table");
            return Ok(Some(TablePrice::new(tb, Some(wd))));
        }

        Ok(self.repo.price_for_dimensions(table, height, width)?)
    }

    fn chain(
        &self,
        product: &Product,
        item: &ItemOptions,
        price: TablePrice,
        size: SizeVars,
        label: &str,
    ) -> Result<PriceBreakdown> {
        let base = if item.with_damper { price.wd } else { price.tb };
        if base.is_none() {
            return Err(PricingError::price_not_found(&product.model, label));
        }

        let special_color_multiplier = item
            .special_color_multiplier
            .unwrap_or(self.options.default_special_color_multiplier);
        if !special_color_multiplier.is_finite() || special_color_multiplier <= 0.0 {
            return Err(PricingError::InvalidMultiplier(special_color_multiplier));
        }

        let input = ChainInput {
            product,
            finish: item.finish.as_ref(),
            with_damper: item.with_damper,
            special_color_multiplier,
        };
        let resolver = CatalogResolver::new(&self.repo, size);
        run_chain(&input, price.tb, price.wd, size, Some(&resolver))
    }
}
