//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while checking, parsing or evaluating a formula
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula contains a forbidden construct
    #[error("Unsafe formula: {0}")]
    Unsafe(String),

    /// Parentheses do not pair up
    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Variable not bound in the symbol table
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// `[MODEL]` reference with no price
    #[error("Unresolved model reference: [{0}]")]
    UnresolvedModel(String),

    /// Division or modulo by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Math domain error (sqrt of a negative, log of zero, ...)
    #[error("Math domain error in {0}")]
    Domain(String),

    /// Result is infinite or NaN
    #[error("Result is not a finite number")]
    NonFinite,
}
