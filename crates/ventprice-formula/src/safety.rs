//! Safety gate for untrusted formula text
//!
//! Formulas come from imported spreadsheets, so the text is screened before
//! it ever reaches the parser. The gate rejects anything that looks like
//! code rather than arithmetic, then checks that parentheses pair up.
//! Whether the text is a single arithmetic expression is decided by the
//! parser itself.

use crate::error::{FormulaError, FormulaResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Forbidden constructs, each with a short description for the error.
static DENYLIST: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"import\s+", "import statement"),
        (r"from\s+", "import statement"),
        (r"__import__", "__import__"),
        (r"exec\s*\(", "call to exec"),
        (r"eval\s*\(", "call to eval"),
        (r"open\s*\(", "call to open"),
        (r"file\s*\(", "call to file"),
        (r"input\s*\(", "call to input"),
        (r"raw_input\s*\(", "call to raw_input"),
        (r"compile\s*\(", "call to compile"),
        (r"globals\s*\(", "call to globals"),
        (r"locals\s*\(", "call to locals"),
        (r"vars\s*\(", "call to vars"),
        (r"dir\s*\(", "call to dir"),
        (r"getattr\s*\(", "call to getattr"),
        (r"setattr\s*\(", "call to setattr"),
        (r"hasattr\s*\(", "call to hasattr"),
        (r"delattr\s*\(", "call to delattr"),
        (r"__.*__", "dunder name"),
        (r"\.__.*__", "dunder attribute"),
        (r"[;\n\r]", "statement separator"),
        (r"#.*", "comment"),
        (r#"""".*""""#, "triple-quoted block"),
        (r"'''.*'''", "triple-quoted block"),
    ]
    .into_iter()
    .map(|(pattern, what)| {
        let re = Regex::new(&format!("(?is){}", pattern)).expect("valid denylist pattern");
        (re, what)
    })
    .collect()
});

/// Check formula text before parsing.
///
/// # Example
/// ```rust
/// use ventprice_formula::safety::check_formula;
///
/// assert!(check_formula("TB * 1.2").is_ok());
/// assert!(check_formula("__import__('os')").is_err());
/// ```
pub fn check_formula(text: &str) -> FormulaResult<()> {
    if let Some((_, what)) = DENYLIST.iter().find(|(re, _)| re.is_match(text)) {
        tracing::debug!(formula = text, reason = what, "rejected formula");
        return Err(FormulaError::Unsafe((*what).to_string()));
    }

    check_balanced_parentheses(text)
}

fn check_balanced_parentheses(text: &str) -> FormulaResult<()> {
    let mut depth: usize = 0;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(FormulaError::UnbalancedParentheses)?;
            }
            _ => {}
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(FormulaError::UnbalancedParentheses)
    }
}
