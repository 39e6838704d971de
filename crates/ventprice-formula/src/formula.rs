//! Checked, parsed formulas

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::{self, EvaluationContext, ModelResolver, Variables};
use crate::parser::parse_formula;
use crate::safety::check_formula;
use std::collections::BTreeSet;
use std::fmt;

/// A formula that passed the safety gate and parsed
///
/// Parse once, evaluate as often as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: FormulaExpr,
}

impl Formula {
    /// Screen and parse formula text.
    pub fn parse(text: &str) -> FormulaResult<Self> {
        check_formula(text)?;
        let expr = parse_formula(text)?;
        Ok(Self {
            source: text.trim().to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &FormulaExpr {
        &self.expr
    }

    /// Variables referenced by the formula, sorted and deduplicated.
    pub fn variables(&self) -> Vec<&str> {
        let mut names = BTreeSet::new();
        self.expr.walk(&mut |node| {
            if let FormulaExpr::Variable(name) = node {
                names.insert(name.as_str());
            }
        });
        names.into_iter().collect()
    }

    /// Models referenced with `[MODEL]`, sorted and deduplicated.
    pub fn model_refs(&self) -> Vec<&str> {
        let mut models = BTreeSet::new();
        self.expr.walk(&mut |node| {
            if let FormulaExpr::ModelRef(model) = node {
                models.insert(model.as_str());
            }
        });
        models.into_iter().collect()
    }

    /// Evaluate against bound variables and an optional model resolver.
    pub fn evaluate(
        &self,
        variables: &Variables,
        resolver: Option<&dyn ModelResolver>,
    ) -> FormulaResult<f64> {
        let ctx = EvaluationContext {
            variables,
            resolver,
        };
        evaluator::evaluate(&self.expr, &ctx)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Formula {
    type Err = crate::error::FormulaError;

    fn from_str(s: &str) -> FormulaResult<Self> {
        Formula::parse(s)
    }
}

/// Screen, parse and evaluate formula text in one step.
///
/// # Example
/// ```rust
/// use ventprice_formula::{evaluate_str, Variables};
///
/// let vars = Variables::new().with("TB", 100.0).with("WD", 225.0);
/// assert_eq!(evaluate_str("sqrt(TB*WD)+2", &vars, None).unwrap(), 152.0);
/// ```
pub fn evaluate_str(
    text: &str,
    variables: &Variables,
    resolver: Option<&dyn ModelResolver>,
) -> FormulaResult<f64> {
    Formula::parse(text)?.evaluate(variables, resolver)
}
