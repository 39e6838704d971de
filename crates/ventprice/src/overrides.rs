//! Per-family pricing overrides
//!
//! Some product families price differently from the plain modifier chain.
//! Each family is a [`PricingOverride`] registered for an exact set of model
//! names; the registry is built once with the engine.

use crate::calculator::{whole_price, PriceBreakdown};
use crate::error::Result;
use crate::options::{ConfigError, EngineOptions, HandGearFamily};
use ahash::AHashMap;
use std::fmt;
use tracing::debug;
use ventprice_core::units::QUOTE_MM_PER_INCH;
use ventprice_core::{Dimensions, Product, TablePrice};
use ventprice_store::PriceRepository;

/// A pricing strategy for a product family
pub trait PricingOverride: fmt::Debug {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Exact model names the override applies to.
    fn models(&self) -> &[String];

    fn applies_to(&self, model: &str) -> bool {
        self.models().iter().any(|m| m == model)
    }

    /// Price an item the table cannot price directly.
    ///
    /// `None` sends the item down the standard path.
    fn price_oversized(
        &self,
        repo: &dyn PriceRepository,
        product: &Product,
        dims: Dimensions,
        with_damper: bool,
    ) -> Result<Option<PriceBreakdown>>;

    /// Amount added to a standard-path price.
    fn surcharge(&self, dims: Dimensions) -> f64;
}

/// Overrides indexed by model name
#[derive(Debug, Default)]
pub struct OverrideRegistry {
    overrides: Vec<Box<dyn PricingOverride>>,
    by_model: AHashMap<String, usize>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry for the configured families.
    pub fn from_options(options: &EngineOptions) -> std::result::Result<Self, ConfigError> {
        let mut registry = Self::new();
        for family in &options.hand_gear_families {
            family.validate()?;
            registry.register(Box::new(HandGear::new(family.clone())))?;
        }
        Ok(registry)
    }

    /// Add an override, failing if one of its models is already taken.
    pub fn register(
        &mut self,
        pricing_override: Box<dyn PricingOverride>,
    ) -> std::result::Result<(), ConfigError> {
        let index = self.overrides.len();
        for model in pricing_override.models() {
            if self.by_model.contains_key(model) {
                return Err(ConfigError::DuplicateOverride(model.clone()));
            }
        }
        for model in pricing_override.models() {
            self.by_model.insert(model.clone(), index);
        }
        self.overrides.push(pricing_override);
        Ok(())
    }

    pub fn for_model(&self, model: &str) -> Option<&dyn PricingOverride> {
        self.by_model
            .get(model)
            .and_then(|&index| self.overrides.get(index))
            .map(|o| o.as_ref())
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Dampers operated by hand gear
///
/// One gear cell per `cell_mm` square; items taller or wider than a panel
/// are built from several equal panels.
#[derive(Debug, Clone)]
pub struct HandGear {
    family: HandGearFamily,
}

impl HandGear {
    pub fn new(family: HandGearFamily) -> Self {
        Self { family }
    }

    /// `(rows, columns)` of panels needed for a size.
    pub fn panels(&self, dims: Dimensions) -> (f64, f64) {
        (
            (dims.height / self.family.max_height).ceil().max(1.0),
            (dims.width / self.family.max_width).ceil().max(1.0),
        )
    }

    fn is_oversized(&self, dims: Dimensions) -> bool {
        dims.height > self.family.max_height || dims.width > self.family.max_width
    }
}

impl PricingOverride for HandGear {
    fn name(&self) -> &str {
        "hand gear"
    }

    fn models(&self) -> &[String] {
        &self.family.models
    }

    fn price_oversized(
        &self,
        repo: &dyn PriceRepository,
        product: &Product,
        dims: Dimensions,
        with_damper: bool,
    ) -> Result<Option<PriceBreakdown>> {
        if !self.is_oversized(dims) {
            return Ok(None);
        }

        let (rows, columns) = self.panels(dims);
        let panel_height = (dims.height / rows).trunc().min(self.family.max_height);
        let panel_width = (dims.width / columns).trunc().min(self.family.max_width);

        let table = product.table_id;
        let panel_price = match repo.price_for_dimensions(table, panel_height, panel_width)? {
            Some(price) => Some(price),
            None => repo
                .closest_price_at_or_below(table, panel_height, panel_width)?
                .map(|closest| closest.price),
        };
        let Some(panel_price) = panel_price else {
            debug!(
                model = %product.model,
                panel_height,
                panel_width,
                "no panel price for oversized item"
            );
            return Ok(None);
        };

        let Some(base) = select_base(panel_price, with_damper) else {
            return Ok(None);
        };

        let panels = rows * columns;
        let total = panel_price.scaled(panels);
        let surcharge = self.surcharge(dims);
        debug!(
            model = %product.model,
            rows,
            columns,
            panel_height,
            panel_width,
            base,
            surcharge,
            "priced oversized item from panels"
        );

        Ok(Some(PriceBreakdown {
            tb: total.tb.unwrap_or(0.0),
            wd: total.wd.unwrap_or(0.0),
            bp: total.tb.unwrap_or(0.0),
            mwd: total.wd.unwrap_or(0.0),
            surcharge,
            price: whole_price(base * panels + surcharge)?,
        }))
    }

    fn surcharge(&self, dims: Dimensions) -> f64 {
        let cells = |inches: f64| (inches * QUOTE_MM_PER_INCH / self.family.cell_mm).ceil();
        cells(dims.height) * cells(dims.width) * self.family.unit_price
    }
}

/// WD with damper, TB without, falling back to whichever exists.
fn select_base(price: TablePrice, with_damper: bool) -> Option<f64> {
    if with_damper {
        price.wd.or(price.tb)
    } else {
        price.tb.or(price.wd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_gear() -> HandGear {
        HandGear::new(HandGearFamily::default())
    }

    #[test]
    fn test_surcharge_cells() {
        let gear = hand_gear();
        // 24" x 12" is one cell either way
        assert_eq!(gear.surcharge(Dimensions::new(24.0, 12.0)), 600.0);
        // 80" wide is 2000mm: two cells
        assert_eq!(gear.surcharge(Dimensions::new(80.0, 40.0)), 1200.0);
        assert_eq!(gear.surcharge(Dimensions::new(120.0, 80.0)), 2400.0);
    }

    #[test]
    fn test_panels() {
        let gear = hand_gear();
        assert_eq!(gear.panels(Dimensions::new(80.0, 40.0)), (1.0, 1.0));
        assert_eq!(gear.panels(Dimensions::new(100.0, 50.0)), (2.0, 2.0));
        assert_eq!(gear.panels(Dimensions::new(60.0, 90.0)), (3.0, 1.0));
        assert!(!gear.is_oversized(Dimensions::new(80.0, 40.0)));
        assert!(gear.is_oversized(Dimensions::new(81.0, 40.0)));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = OverrideRegistry::from_options(&EngineOptions::default()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.for_model("VD").map(|o| o.name()), Some("hand gear"));
        assert!(registry.for_model("VD-2").is_none());
        assert!(registry.for_model("vd").is_none());
    }

    #[test]
    fn test_registry_rejects_shared_models() {
        let options = EngineOptions {
            hand_gear_families: vec![
                HandGearFamily::default(),
                HandGearFamily {
                    models: vec!["VD-X".into(), "VD".into()],
                    ..HandGearFamily::default()
                },
            ],
            ..EngineOptions::default()
        };
        assert!(matches!(
            OverrideRegistry::from_options(&options),
            Err(ConfigError::DuplicateOverride(model)) if model == "VD"
        ));
    }

    #[test]
    fn test_registry_rejects_degenerate_families() {
        for family in [
            HandGearFamily {
                cell_mm: 0.0,
                ..HandGearFamily::default()
            },
            HandGearFamily {
                max_width: -80.0,
                ..HandGearFamily::default()
            },
            HandGearFamily {
                unit_price: f64::NAN,
                ..HandGearFamily::default()
            },
        ] {
            let options = EngineOptions {
                hand_gear_families: vec![family],
                ..EngineOptions::default()
            };
            assert!(matches!(
                OverrideRegistry::from_options(&options),
                Err(ConfigError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn test_select_base() {
        let both = TablePrice::new(100.0, Some(150.0));
        assert_eq!(select_base(both, true), Some(150.0));
        assert_eq!(select_base(both, false), Some(100.0));
        assert_eq!(select_base(TablePrice::new(100.0, None), true), Some(100.0));
        assert_eq!(
            select_base(TablePrice::from_columns(None, Some(90.0)).unwrap(), false),
            Some(90.0)
        );
    }
}
