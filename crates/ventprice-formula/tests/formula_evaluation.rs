//! Tests for screening and evaluating pricing formulas

use proptest::prelude::*;
use ventprice_formula::{
    evaluate_str, is_equation, is_number, Formula, FormulaError, ModelResolver, Variables,
};

fn prices() -> Variables {
    Variables::new()
        .with("TB", 100.0)
        .with("WD", 225.0)
        .with("WIDTH", 12.0)
        .with("HEIGHT", 8.0)
}

/// Test the documented square-root example
#[test]
fn test_sqrt_of_product() {
    assert_eq!(evaluate_str("sqrt(TB*WD)+2", &prices(), None).unwrap(), 152.0);
}

/// Test that every denylisted construct is rejected before parsing
#[test]
fn test_rejects_denylisted_constructs() {
    for text in [
        "__import__('os')",
        "open('x')",
        "a;b",
        "from os import system",
        "TB.__class__.__bases__",
        "compile('1', 'x', 'eval')",
        "globals()",
        "locals()",
        "vars()",
        "dir()",
        "setattr(TB, 'x', 1)",
        "hasattr(TB, 'x')",
        "delattr(TB, 'x')",
        "input()",
        "raw_input()",
        "file('x')",
        "TB # 1.2",
        "TB\r",
    ] {
        let result = evaluate_str(text, &prices(), None);
        assert!(
            matches!(result, Err(FormulaError::Unsafe(_))),
            "{text:?} gave {result:?}"
        );
    }
}

/// Test that things which pass the gate but are not arithmetic still fail
#[test]
fn test_rejects_non_arithmetic() {
    assert!(matches!(
        evaluate_str("TB if WD else 1", &prices(), None),
        Err(FormulaError::Parse(_))
    ));
    assert!(matches!(
        evaluate_str("'TB'", &prices(), None),
        Err(FormulaError::Parse(_))
    ));
    assert!(matches!(
        evaluate_str("lambda: 1", &prices(), None),
        Err(FormulaError::Parse(_))
    ));
    assert_eq!(
        evaluate_str("system(1)", &prices(), None),
        Err(FormulaError::UnknownFunction("system".into()))
    );
    assert_eq!(
        evaluate_str("os", &prices(), None),
        Err(FormulaError::UnknownVariable("os".into()))
    );
}

/// Test typical stored modifiers
#[test]
fn test_typical_modifiers() {
    let vars = prices().with("BP", 110.0).with("MWD", 250.0);

    assert_eq!(evaluate_str("TB*0.9+10", &vars, None).unwrap(), 100.0);
    assert_eq!(evaluate_str("max(BP, 120)", &vars, None).unwrap(), 120.0);
    assert_eq!(evaluate_str("MWD + 25", &vars, None).unwrap(), 275.0);
    assert_eq!(
        evaluate_str("ceil(WIDTH*HEIGHT/144*10)", &vars, None).unwrap(),
        7.0
    );
    assert_eq!(evaluate_str("round(TB/3, 2)", &vars, None).unwrap(), 33.33);
}

struct FixedCatalog;

impl ModelResolver for FixedCatalog {
    fn resolve_model(&self, model: &str) -> Option<f64> {
        match model {
            "SR-100" => Some(80.0),
            _ => None,
        }
    }
}

/// Test cross-model references
#[test]
fn test_model_references() {
    let formula = Formula::parse("[SR-100] + TB * 0.5").unwrap();
    assert_eq!(formula.model_refs(), vec!["SR-100"]);
    assert_eq!(
        formula.evaluate(&prices(), Some(&FixedCatalog)).unwrap(),
        130.0
    );

    let missing = Formula::parse("[SR-999] + TB").unwrap();
    assert_eq!(
        missing.evaluate(&prices(), Some(&FixedCatalog)),
        Err(FormulaError::UnresolvedModel("SR-999".into()))
    );
}

/// Test that deeply nested or oversized formulas fail instead of overflowing
#[test]
fn test_rejects_deep_nesting() {
    let vars = prices();
    let nested = |depth: usize| format!("TB*{}1{}", "(".repeat(depth), ")".repeat(depth));

    for depth in [100, 1_000, 10_000] {
        assert!(matches!(
            evaluate_str(&nested(depth), &vars, None),
            Err(FormulaError::Parse(_))
        ));
    }
    assert!(matches!(
        evaluate_str(&format!("{}1", "-".repeat(10_000)), &vars, None),
        Err(FormulaError::Parse(_))
    ));
    assert!(matches!(
        evaluate_str(&format!("{}1", "-".repeat(100)), &vars, None),
        Err(FormulaError::Parse(_))
    ));

    // Shallow nesting still evaluates
    assert_eq!(evaluate_str(&nested(20), &vars, None).unwrap(), 100.0);
}

/// Test modifier classification
#[test]
fn test_classification() {
    assert!(is_number("1.2"));
    assert!(!is_equation("1.2"));
    assert!(is_equation("TB*1.2"));
    assert!(!is_number("TB*1.2"));
    assert!(!is_number("see price list"));
    assert!(!is_equation("see price list"));
}

proptest! {
    /// Evaluation is deterministic
    #[test]
    fn prop_evaluation_is_deterministic(tb in 0.0f64..10_000.0, wd in 0.0f64..10_000.0) {
        let vars = Variables::new().with("TB", tb).with("WD", wd);
        let formula = Formula::parse("sqrt(TB*WD) + max(TB, WD) * 1.15 - min(TB, WD) // 3").unwrap();
        let first = formula.evaluate(&vars, None).unwrap();
        let second = formula.evaluate(&vars, None).unwrap();
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }

    /// A plain multiplier formula matches direct multiplication
    #[test]
    fn prop_multiplier_formula(tb in 0.0f64..10_000.0, m in 0.5f64..3.0) {
        let vars = Variables::new().with("TB", tb);
        let text = format!("TB*{}", m);
        prop_assert_eq!(evaluate_str(&text, &vars, None).unwrap(), tb * m);
    }
}
