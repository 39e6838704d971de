//! The modifier chain
//!
//! Every priced item goes through the same stages:
//!
//! 1. `TB`, `WD` come from the table (or are synthesized by the caller)
//! 2. `BP` is `TB` after the product's TB modifier
//! 3. `MWD` is `WD` after the product's WD modifier
//! 4. the finish multiplier is applied to `MWD` (with damper) or `BP`
//!
//! A modifier is either a plain number, which multiplies the stage's base,
//! or a formula evaluated against the stage's variables. Modifier failures
//! never fail the price: they are logged and the stage keeps its base.

use crate::error::{PricingError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ventprice_core::{Finish, Product};
use ventprice_formula::{evaluate_str, is_equation, parse_number, ModelResolver, Variables};
use ventprice_store::PriceRepository;

/// The intermediate values of one priced item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub tb: f64,
    pub wd: f64,
    pub bp: f64,
    pub mwd: f64,
    /// Amount added after the chain (hand gear)
    pub surcharge: f64,
    /// Final price, rounded half-up
    pub price: i64,
}

impl PriceBreakdown {
    /// Add a surcharge to the final price.
    pub fn with_surcharge(mut self, surcharge: f64) -> Result<Self> {
        self.surcharge += surcharge;
        self.price = whole_price(self.price as f64 + surcharge)?;
        Ok(self)
    }
}

/// The size an item is priced at, as seen by formulas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeVars {
    /// `WIDTH` and `HEIGHT`; per-foot items bind the match dimension and length
    Rect { width: f64, height: f64 },
    /// `SIZE`
    Diameter(f64),
    /// `HEIGHT` only, for dimensionless per-foot items
    Length(f64),
    None,
}

impl SizeVars {
    fn bind(&self, vars: &mut Variables) {
        match *self {
            SizeVars::Rect { width, height } => {
                vars.set("WIDTH", width);
                vars.set("HEIGHT", height);
            }
            SizeVars::Diameter(size) => {
                vars.set("SIZE", size);
            }
            SizeVars::Length(length) => {
                vars.set("HEIGHT", length);
            }
            SizeVars::None => {}
        }
    }
}

/// What a finish contributes to the last stage
#[derive(Debug, Clone, Copy, PartialEq)]
enum FinishModifier<'a> {
    Factor(f64),
    Stored(&'a str),
}

/// Everything about an item that does not depend on the table lookup
#[derive(Debug, Clone, Copy)]
pub struct ChainInput<'a> {
    pub product: &'a Product,
    pub finish: Option<&'a Finish>,
    pub with_damper: bool,
    pub special_color_multiplier: f64,
}

/// `floor(x + 0.5)`
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round a final amount, rejecting anything that is not a price.
pub fn whole_price(value: f64) -> Result<i64> {
    if !value.is_finite() || value < 0.0 || value >= i64::MAX as f64 {
        return Err(PricingError::InvalidPrice(value));
    }
    Ok(round_half_up(value))
}

/// Apply a stored modifier value to a base.
///
/// Numbers multiply, formulas are evaluated. A failed evaluation or a value
/// that is neither keeps the base.
pub fn apply_modifier(
    modifier: &str,
    base: f64,
    vars: &Variables,
    resolver: Option<&dyn ModelResolver>,
) -> f64 {
    if let Some(factor) = parse_number(modifier) {
        return base * factor;
    }

    if !is_equation(modifier) {
        warn!(modifier, "modifier is neither a number nor a formula, ignoring");
        return base;
    }

    match evaluate_str(modifier, vars, resolver) {
        Ok(value) => value,
        Err(err) => {
            warn!(modifier, error = %err, "modifier evaluation failed, keeping base price");
            base
        }
    }
}

/// Run the full chain over table prices.
///
/// Missing columns bind as `0`; callers check beforehand that the column
/// the item is priced from exists.
pub fn run_chain(
    input: &ChainInput<'_>,
    tb: Option<f64>,
    wd: Option<f64>,
    size: SizeVars,
    resolver: Option<&dyn ModelResolver>,
) -> Result<PriceBreakdown> {
    let product = input.product;
    let tb = tb.unwrap_or(0.0);
    let wd = wd.unwrap_or(0.0);

    let mut vars = Variables::new();
    size.bind(&mut vars);
    vars.set("TB", tb);
    vars.set("WD", wd);

    let bp = match product.tb_modifier() {
        Some(modifier) => apply_modifier(modifier, tb, &vars, resolver),
        None => tb,
    };
    vars.set("BP", bp);

    let mwd = match product.wd_modifier() {
        Some(modifier) => apply_modifier(modifier, wd, &vars, resolver),
        None => wd,
    };
    vars.set("MWD", mwd);

    let mut base = if input.with_damper { mwd } else { bp };
    if input.with_damper {
        if let Some(modifier) = product.wd_modifier() {
            base = apply_modifier(modifier, base, &vars, resolver);
        }
    }

    let price = match finish_modifier(input) {
        None => base,
        Some(FinishModifier::Factor(factor)) => base * factor,
        Some(FinishModifier::Stored(modifier)) => {
            let mut finish_vars = vars.clone();
            finish_vars.set("BP", base);
            finish_vars.set("MWD", base);
            apply_modifier(modifier, base, &finish_vars, resolver)
        }
    };

    debug!(
        model = %product.model,
        tb, wd, bp, mwd, price, "priced through modifier chain"
    );

    Ok(PriceBreakdown {
        tb,
        wd,
        bp,
        mwd,
        surcharge: 0.0,
        price: whole_price(price)?,
    })
}

fn finish_modifier<'a>(input: &ChainInput<'a>) -> Option<FinishModifier<'a>> {
    let finish = input.finish?;
    match finish {
        Finish::SpecialColor => Some(FinishModifier::Factor(input.special_color_multiplier)),
        Finish::Other(name) => {
            warn!(finish = %name, model = %input.product.model, "unknown finish, pricing without multiplier");
            None
        }
        known => {
            let stored = input.product.finish_multiplier(known);
            if stored.is_none() {
                warn!(
                    finish = %known,
                    model = %input.product.model,
                    "finish not offered for model, pricing without multiplier"
                );
            }
            stored.map(FinishModifier::Stored)
        }
    }
}

/// Prices `[MODEL]` references at the size of the item being priced
pub struct CatalogResolver<'a> {
    repo: &'a dyn PriceRepository,
    size: SizeVars,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(repo: &'a dyn PriceRepository, size: SizeVars) -> Self {
        Self { repo, size }
    }
}

impl ModelResolver for CatalogResolver<'_> {
    fn resolve_model(&self, model: &str) -> Option<f64> {
        let product = match self.repo.product(model) {
            Ok(Some(product)) => product,
            Ok(None) => return None,
            Err(err) => {
                debug!(model, error = %err, "referenced model lookup failed");
                return None;
            }
        };

        let price = match self.size {
            SizeVars::Rect { width, height } => {
                self.repo
                    .price_for_dimensions(product.table_id, height, width)
            }
            SizeVars::Diameter(size) => self.repo.price_for_diameter(product.table_id, size),
            SizeVars::Length(_) | SizeVars::None => return None,
        };

        match price {
            Ok(price) => price.and_then(|p| p.tb),
            Err(err) => {
                debug!(model, error = %err, "referenced model price lookup failed");
                None
            }
        }
    }
}
