//! Tests for the SQLite price repository

use pretty_assertions::assert_eq;
use rusqlite::Connection;
use tempfile::TempDir;
use ventprice_core::{ClosestPrice, Shape, TablePrice};
use ventprice_store::schema::SCHEMA;
use ventprice_store::{PriceRepository, SqlitePriceStore, StoreError};

const FIXTURE: &str = "
INSERT INTO products (product_id, table_id, model, tb_modifier, wd_modifier,
                      anodized_multiplier, powder_coated_multiplier, no_finish_multiplier)
VALUES
    (1, 1, 'ABC', NULL, 'WD*1.1', '1.2', NULL, NULL),
    (2, 2, 'RD', NULL, NULL, '1.15', '1.25', NULL),
    (3, 3, 'LB-1', NULL, NULL, NULL, NULL, NULL),
    (4, 4, '2 SLOT', NULL, NULL, NULL, NULL, NULL),
    (5, 4, '3 SLOT', NULL, NULL, NULL, NULL, NULL),
    (6, 4, '4 SLOT', NULL, NULL, NULL, NULL, NULL);

INSERT INTO prices (price_id, table_id, height, width, normal_price, price_with_damper, price_per_foot)
VALUES
    (1, 1, 8, 12, 500, 650, NULL),
    (2, 1, 8, 16, 560, 720, NULL),
    (3, 1, 12, 12, 610, 800, NULL),
    (4, 1, 12, 16, 700, NULL, NULL),
    (10, 2, 6, NULL, 90, 140, NULL),
    (11, 2, 8, NULL, 110, 170, NULL),
    (20, 3, 4, NULL, NULL, NULL, 30),
    (21, 3, 6, NULL, NULL, NULL, 42),
    (30, 4, NULL, NULL, NULL, NULL, 18),
    (31, 4, NULL, NULL, NULL, NULL, 24),
    (32, 4, NULL, NULL, NULL, NULL, 31);
";

/// Write a fixture database to disk and open it through the read-only path
fn on_disk_store() -> (TempDir, SqlitePriceStore) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prices.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(FIXTURE).unwrap();
    }
    let store = SqlitePriceStore::open(&path).unwrap();
    (dir, store)
}

/// Test catalog queries
#[test]
fn test_models_and_products() {
    let (_dir, store) = on_disk_store();

    assert_eq!(
        store.available_models().unwrap(),
        vec!["2 SLOT", "3 SLOT", "4 SLOT", "ABC", "LB-1", "RD"]
    );

    let product = store.product("ABC").unwrap().unwrap();
    assert_eq!(product.table_id, 1);
    assert_eq!(product.wd_modifier.as_deref(), Some("WD*1.1"));
    assert_eq!(product.anodized_multiplier.as_deref(), Some("1.2"));
    assert_eq!(product.powder_coated_multiplier, None);

    assert!(store.product("NOPE").unwrap().is_none());
    assert_eq!(store.table_id("RD").unwrap(), Some(2));
}

/// Test exact and nearest lookups
#[test]
fn test_price_lookups() {
    let (_dir, store) = on_disk_store();

    assert_eq!(
        store.price_for_dimensions(1, 8.0, 12.0).unwrap(),
        Some(TablePrice::new(500.0, Some(650.0)))
    );
    assert_eq!(store.price_for_dimensions(1, 9.0, 12.0).unwrap(), None);
    assert_eq!(
        store.price_for_diameter(2, 8.0).unwrap(),
        Some(TablePrice::new(110.0, Some(170.0)))
    );
    assert_eq!(
        store.closest_price_at_or_below(1, 11.0, 15.0).unwrap(),
        Some(ClosestPrice {
            height: 8.0,
            width: 12.0,
            price: TablePrice::new(500.0, Some(650.0)),
        })
    );
    assert_eq!(store.closest_price_at_or_below(1, 4.0, 4.0).unwrap(), None);
}

/// Test per-foot rates and positional rows
#[test]
fn test_price_per_foot_and_dimensionless() {
    let (_dir, store) = on_disk_store();

    assert_eq!(store.price_per_foot(3, 6.0).unwrap(), Some(42.0));
    assert_eq!(store.price_per_foot(3, 5.0).unwrap(), None);
    assert_eq!(store.price_per_foot_sizes(3).unwrap(), vec![4.0, 6.0]);

    assert_eq!(store.price_id_for_no_dimensions("2 SLOT").unwrap(), Some(30));
    assert_eq!(store.price_id_for_no_dimensions("3 SLOT").unwrap(), Some(31));
    assert_eq!(store.price_id_for_no_dimensions("4 SLOT").unwrap(), Some(32));
    assert_eq!(store.price_per_foot_by_id(31).unwrap(), Some(24.0));

    let row = store.price_by_id(32).unwrap().unwrap();
    assert_eq!(row.height, None);
    assert_eq!(row.price_per_foot, Some(31.0));
    assert_eq!(row.table_price(), None);
}

/// Test shape inference from populated columns
#[test]
fn test_shapes() {
    let (_dir, store) = on_disk_store();

    assert_eq!(store.shape("ABC").unwrap(), Shape::Rectangular);
    assert_eq!(store.shape("RD").unwrap(), Shape::Diameter);
    assert_eq!(store.shape("LB-1").unwrap(), Shape::PricePerFoot);
    assert_eq!(
        store.shape("3 SLOT").unwrap(),
        Shape::Dimensionless { per_foot: true }
    );
    assert!(!store.is_other_table("").unwrap());
}

/// Test size listings used by the resolver
#[test]
fn test_size_listings() {
    let (_dir, store) = on_disk_store();

    let mut sizes = store.rectangular_sizes(1).unwrap();
    sizes.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(
        sizes,
        vec![(12.0, 8.0), (12.0, 12.0), (16.0, 8.0), (16.0, 12.0)]
    );
    assert_eq!(store.diameters(2).unwrap(), vec![6.0, 8.0]);
}

/// Test that the store never writes
#[test]
fn test_store_is_read_only() {
    let (_dir, store) = on_disk_store();
    let conn = store.into_connection();
    assert!(conn
        .execute("DELETE FROM prices WHERE price_id = 1", [])
        .is_err());
}

/// Test opening a missing database
#[test]
fn test_open_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = SqlitePriceStore::open(dir.path().join("missing.db"));
    assert!(matches!(result, Err(StoreError::Open { .. })));
}
