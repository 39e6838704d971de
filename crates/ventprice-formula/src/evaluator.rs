//! Formula evaluator
//!
//! Walks a formula AST against a symbol table of bound variables.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::functions;
use ahash::AHashMap;

/// Symbol table of variables bound for one evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    values: AHashMap<String, f64>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Builder-style [`Variables::set`]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut vars = Variables::new();
        for (name, value) in iter {
            vars.set(name, value);
        }
        vars
    }
}

/// Resolves `[MODEL]` references to a price
///
/// Implementations price the referenced model in the same size context as
/// the formula being evaluated.
pub trait ModelResolver {
    /// Table price of `model`, or `None` when it cannot be priced
    fn resolve_model(&self, model: &str) -> Option<f64>;
}

/// Everything an evaluation may read
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub variables: &'a Variables,
    pub resolver: Option<&'a dyn ModelResolver>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(variables: &'a Variables) -> Self {
        Self {
            variables,
            resolver: None,
        }
    }

    pub fn with_resolver(mut self, resolver: &'a dyn ModelResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }
}

/// Evaluate a parsed formula to a finite number
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext<'_>) -> FormulaResult<f64> {
    let value = evaluate_expr(expr, ctx)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NonFinite)
    }
}

fn evaluate_expr(expr: &FormulaExpr, ctx: &EvaluationContext<'_>) -> FormulaResult<f64> {
    match expr {
        FormulaExpr::Number(n) => Ok(*n),

        FormulaExpr::Variable(name) => ctx
            .variables
            .get(name)
            .ok_or_else(|| FormulaError::UnknownVariable(name.clone())),

        FormulaExpr::ModelRef(model) => ctx
            .resolver
            .and_then(|resolver| resolver.resolve_model(model))
            .ok_or_else(|| FormulaError::UnresolvedModel(model.clone())),

        FormulaExpr::UnaryOp { op, operand } => {
            let value = evaluate_expr(operand, ctx)?;
            Ok(match op {
                UnaryOperator::Negate => -value,
                UnaryOperator::Plus => value,
            })
        }

        FormulaExpr::BinaryOp { op, left, right } => {
            let left = evaluate_expr(left, ctx)?;
            let right = evaluate_expr(right, ctx)?;
            apply_binary(*op, left, right)
        }

        FormulaExpr::Call { name, args } => {
            let def = functions::registry()
                .get(name)
                .ok_or_else(|| FormulaError::UnknownFunction(name.clone()))?;
            def.check_arity(args.len())?;

            let values = args
                .iter()
                .map(|arg| evaluate_expr(arg, ctx))
                .collect::<FormulaResult<Vec<_>>>()?;
            (def.implementation)(&values)
        }
    }
}

fn apply_binary(op: BinaryOperator, left: f64, right: f64) -> FormulaResult<f64> {
    match op {
        BinaryOperator::Add => Ok(left + right),
        BinaryOperator::Subtract => Ok(left - right),
        BinaryOperator::Multiply => Ok(left * right),
        BinaryOperator::Divide => {
            if right == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            Ok(left / right)
        }
        BinaryOperator::FloorDivide => {
            if right == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            Ok((left / right).floor())
        }
        BinaryOperator::Modulo => {
            if right == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            // Sign follows the divisor
            Ok(left - right * (left / right).floor())
        }
        BinaryOperator::Power => {
            if left == 0.0 && right < 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            let value = left.powf(right);
            if value.is_nan() {
                return Err(FormulaError::Domain(op.symbol().to_string()));
            }
            Ok(value)
        }
    }
}
