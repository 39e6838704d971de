//! # ventprice-formula
//!
//! Pricing formula parser and evaluator for ventprice.
//!
//! This crate provides:
//! - A safety gate that rejects code-like formula text
//! - Formula parsing (text → AST)
//! - Formula evaluation (AST + symbol table → number)
//! - The whitelisted math functions and constants
//! - Classification of stored modifier values (number or formula)
//!
//! ## Example
//!
//! ```rust
//! use ventprice_formula::{Formula, Variables};
//!
//! let formula = Formula::parse("TB*0.9+10").unwrap();
//! let vars = Variables::new().with("TB", 500.0);
//! assert_eq!(formula.evaluate(&vars, None).unwrap(), 460.0);
//! ```

pub mod ast;
pub mod classify;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod functions;
pub mod parser;
pub mod safety;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use classify::{is_equation, is_number, parse_number};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, EvaluationContext, ModelResolver, Variables};
pub use formula::{evaluate_str, Formula};
pub use parser::parse_formula;
