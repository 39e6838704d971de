//! Classification of stored modifier values
//!
//! A modifier slot holds free text. These helpers decide whether the text
//! is a plain multiplier or something that has to go through the formula
//! evaluator.

/// Tokens whose presence marks a value as a formula
const FORMULA_INDICATORS: &[&str] = &[
    "TB", "WD", "BP", "MWD", "WIDTH", "HEIGHT", "SIZE", "[", "]", "(", ")", "+", "-", "*", "/",
    "%", "sqrt", "pow", "ceil", "floor", "abs", "round", "min", "max", "sin", "cos", "tan",
    "log", "exp",
];

/// Parse a value as a bare finite number.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Whether a value is a bare finite number.
///
/// ```rust
/// use ventprice_formula::classify::is_number;
///
/// assert!(is_number(" 1.2 "));
/// assert!(!is_number("TB*1.2"));
/// assert!(!is_number("inf"));
/// ```
pub fn is_number(value: &str) -> bool {
    parse_number(value).is_some()
}

/// Whether a value contains any variable, operator, bracket or function token.
pub fn is_equation(value: &str) -> bool {
    FORMULA_INDICATORS
        .iter()
        .any(|indicator| value.contains(indicator))
}
