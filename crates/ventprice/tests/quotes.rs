//! Tests for quote line building

mod common;

use common::engine;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use ventprice::{
    Finish, ItemOptions, Length, PricingError, QuoteDimensions, QuoteError, QuoteRequest,
    QuoteWarning,
};

fn inches(width: f64, height: f64) -> QuoteDimensions {
    QuoteDimensions::Rectangular {
        width: Length::inches(width),
        height: Length::inches(height),
    }
}

/// Test the insect screen floor price
#[test]
fn test_accessory_minimum() {
    let engine = engine();
    let request = QuoteRequest::from_product_code("ABC(INS)", inches(12.0, 8.0))
        .with_finish(Finish::Anodized);

    let item = engine.build_quote_item(&request).unwrap();
    assert_eq!(item.product_code, "ABC(INS)");
    assert_eq!(item.table_price, Decimal::from(500));
    assert_eq!(item.price_after_finish, Decimal::from(600));
    assert_eq!(item.accessory_price, Decimal::from(50));
    assert_eq!(item.unit_price, Decimal::from(650));
    assert_eq!(item.total, Decimal::from(650));
    assert!(item.warnings.is_empty());
}

/// Test the two millimetre conventions
#[test]
fn test_millimetre_conversions() {
    let engine = engine();

    // quoting divides by 25: 300mm x 200mm is exactly 12" x 8"
    assert_eq!(Length::millimeters(300.0).to_inches(), 12.0);
    let request = QuoteRequest::new(
        "ABC",
        QuoteDimensions::Rectangular {
            width: Length::millimeters(300.0),
            height: Length::millimeters(200.0),
        },
    );
    let item = engine.build_quote_item(&request).unwrap();
    assert_eq!(item.size, "300mm x 200mm");
    assert_eq!(item.rounded_size.as_deref(), Some("12\" x 8\""));
    assert_eq!(item.unit_price, Decimal::from(500));

    // size strings divide by 25.4
    assert!((Length::millimeters(300.0).to_physical_inches() - 11.811).abs() < 1e-3);
    assert_eq!(
        engine
            .price_for_default_table("ABC", &ItemOptions::new(), "305mm x 204mm")
            .unwrap(),
        500
    );
}

/// Test that a height larger than the width is swapped with a warning
#[test]
fn test_swapped_dimensions() {
    let engine = engine();
    let item = engine
        .build_quote_item(&QuoteRequest::new("ABC", inches(8.0, 12.0)))
        .unwrap();

    assert_eq!(
        item.warnings,
        vec![QuoteWarning::DimensionsSwapped {
            width: 12.0,
            height: 8.0
        }]
    );
    assert_eq!(item.size, "12\" x 8\"");
    assert_eq!(item.unit_price, Decimal::from(500));
}

/// Test rounding to the next tabulated size and extrapolating past the table
#[test]
fn test_rounded_and_exceeded_sizes() {
    let engine = engine();

    let item = engine
        .build_quote_item(&QuoteRequest::new("ABC", inches(9.0, 9.0)))
        .unwrap();
    assert_eq!(item.rounded_size.as_deref(), Some("12\" x 12\""));
    assert_eq!(item.unit_price, Decimal::from(610));

    let item = engine
        .build_quote_item(&QuoteRequest::new("ABC", inches(30.0, 8.0)))
        .unwrap();
    assert_eq!(item.rounded_size.as_deref(), Some("30\" x 8\""));
    assert_eq!(item.unit_price, Decimal::from(960));
}

/// Test filter pricing and the damper flag from a product code
#[test]
fn test_filter_and_damper() {
    let engine = engine();

    let item = engine
        .build_quote_item(&QuoteRequest::from_product_code(
            "ABC+F.Nylon",
            inches(12.0, 8.0),
        ))
        .unwrap();
    assert_eq!(item.filter_price, Decimal::from(40));
    assert_eq!(item.unit_price, Decimal::from(540));
    assert_eq!(item.product_code, "ABC+F.Nylon");

    let item = engine
        .build_quote_item(&QuoteRequest::from_product_code("ABC(WD)", inches(12.0, 8.0)))
        .unwrap();
    assert_eq!(item.unit_price, Decimal::from(715));
}

/// Test discount and quantity arithmetic
#[test]
fn test_discount_and_quantity() {
    let engine = engine();
    let request = QuoteRequest::new("ABC", inches(12.0, 8.0))
        .with_finish(Finish::Anodized)
        .with_quantity(3)
        .with_discount(Decimal::from(10));

    let item = engine.build_quote_item(&request).unwrap();
    assert_eq!(item.finish.as_deref(), Some("Anodized Aluminum"));
    assert_eq!(item.unit_price, Decimal::from(600));
    assert_eq!(item.discounted_unit_price, Decimal::from(540));
    assert_eq!(item.total, Decimal::from(1620));
}

/// Test per-foot quote lines
#[test]
fn test_price_per_foot_line() {
    let engine = engine();
    let item = engine
        .build_quote_item(&QuoteRequest::from_product_code(
            "LB-1(INS)",
            inches(24.0, 5.0),
        ))
        .unwrap();

    assert_eq!(item.rounded_size.as_deref(), Some("24\" x 6\""));
    assert_eq!(item.price_after_finish, Decimal::from(84));
    assert_eq!(item.accessory_price, Decimal::from(50));
    assert_eq!(item.unit_price, Decimal::from(134));
}

/// Test diameter quote lines
#[test]
fn test_diameter_line() {
    let engine = engine();
    let item = engine
        .build_quote_item(&QuoteRequest::new(
            "RD",
            QuoteDimensions::Diameter(Length::inches(7.0)),
        ))
        .unwrap();

    assert_eq!(item.size, "7\"");
    assert_eq!(item.rounded_size.as_deref(), Some("8\" diameter"));
    assert_eq!(item.unit_price, Decimal::from(110));
}

/// Test slot products without dimensions
#[test]
fn test_dimensionless_lines() {
    let engine = engine();

    let item = engine
        .build_quote_item(&QuoteRequest::new(
            "3 SLOT",
            QuoteDimensions::Height(Length::millimeters(900.0)),
        ))
        .unwrap();
    assert_eq!(item.size, "3Slot x 900mm");
    assert_eq!(item.rounded_size, None);
    assert_eq!(item.unit_price, Decimal::from(72));

    let item = engine
        .build_quote_item(&QuoteRequest::new(
            "3 SLOT",
            QuoteDimensions::Height(Length::inches(36.0)),
        ))
        .unwrap();
    assert_eq!(item.size, "3Slot x 36\"");

    let item = engine
        .build_quote_item(&QuoteRequest::new("PLATE", QuoteDimensions::None))
        .unwrap();
    assert_eq!(item.unit_price, Decimal::from(150));
}

/// Test that a dimensionless row carrying a diameter shows it in the size
#[test]
fn test_dimensionless_row_with_diameter() {
    let engine = engine();

    let item = engine
        .build_quote_item(&QuoteRequest::new("2 SLOT-R", QuoteDimensions::None))
        .unwrap();
    assert_eq!(item.size, "2Slot x 6\"");
    assert_eq!(item.unit_price, Decimal::from(140));

    let item = engine
        .build_quote_item(&QuoteRequest::new("1 SLOT-R", QuoteDimensions::None))
        .unwrap();
    assert_eq!(item.size, "1Slot");
    assert_eq!(item.unit_price, Decimal::from(120));
}

/// Test hand-gear items rounded up to a tabulated size
#[test]
fn test_hand_gear_line() {
    let engine = engine();
    let item = engine
        .build_quote_item(&QuoteRequest::new("VD", inches(50.0, 30.0)))
        .unwrap();
    assert_eq!(item.rounded_size.as_deref(), Some("80\" x 40\""));
    assert_eq!(item.unit_price, Decimal::from(2000 + 1200));
}

/// Test the errors a quote line can fail with
#[test]
fn test_quote_errors() {
    let engine = engine();

    let err = engine
        .build_quote_item(&QuoteRequest::new(
            "ABC",
            QuoteDimensions::Diameter(Length::inches(8.0)),
        ))
        .unwrap_err();
    assert!(matches!(err, QuoteError::MissingDimension { .. }));

    let err = engine
        .build_quote_item(&QuoteRequest::new("NOPE", inches(12.0, 8.0)))
        .unwrap_err();
    assert!(matches!(
        err,
        QuoteError::Pricing(PricingError::ProductNotFound(_))
    ));

    let err = engine
        .build_quote_item(&QuoteRequest::from_product_code(
            "ABC+F.Paper",
            inches(12.0, 8.0),
        ))
        .unwrap_err();
    assert!(matches!(err, QuoteError::FilterNotFound(ref name) if name == "Paper"));
    assert_eq!(err.to_string(), "Filter \"Paper\" not found in database");

    let err = engine
        .build_quote_item(&QuoteRequest::new("3 SLOT", QuoteDimensions::None))
        .unwrap_err();
    assert!(matches!(err, QuoteError::MissingDimension { .. }));
}

/// Test that quote items serialize for export
#[test]
fn test_quote_item_serializes() {
    let engine = engine();
    let item = engine
        .build_quote_item(&QuoteRequest::new("ABC", inches(12.0, 8.0)))
        .unwrap();
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["product_code"], "ABC");
    assert_eq!(json["quantity"], 1);
}

proptest! {
    /// A discount scales the total linearly
    #[test]
    fn prop_discount_is_linear(cents in 0i64..=10_000, quantity in 1u32..50) {
        let engine = engine();
        let discount = Decimal::new(cents, 2);
        let request = QuoteRequest::new("ABC", inches(12.0, 8.0))
            .with_finish(Finish::Anodized)
            .with_quantity(quantity);

        let full = engine.build_quote_item(&request).unwrap();
        let discounted = engine
            .build_quote_item(&request.clone().with_discount(discount))
            .unwrap();

        let factor = Decimal::ONE - discount / Decimal::ONE_HUNDRED;
        prop_assert_eq!(discounted.total, full.total * factor);
    }
}
