//! Shared catalog fixture for engine tests

#![allow(dead_code)]

use rusqlite::Connection;
use ventprice::{EngineOptions, PricingEngine, SqlitePriceStore};
use ventprice_store::schema::SCHEMA;

pub const CATALOG: &str = "
INSERT INTO products (product_id, table_id, model, tb_modifier, wd_modifier,
                      anodized_multiplier, powder_coated_multiplier, no_finish_multiplier)
VALUES
    (1, 1, 'ABC', NULL, 'WD*1.1', '1.2', 'BP*1.3', NULL),
    (2, 1, 'TBM', 'TB*0.9+10', NULL, NULL, NULL, NULL),
    (3, 1, 'BAD', '__import__(''os'')', NULL, NULL, NULL, NULL),
    (4, 1, 'REF', 'TB + [FLT-NYLON]', NULL, NULL, NULL, NULL),
    (10, 2, 'RD', NULL, NULL, '1.2', NULL, NULL),
    (20, 3, 'LB-1', NULL, NULL, '1.5', NULL, NULL),
    (30, 4, '2 SLOT', NULL, NULL, NULL, NULL, NULL),
    (31, 4, '3 SLOT', NULL, NULL, NULL, NULL, NULL),
    (32, 4, '4 SLOT', NULL, NULL, NULL, NULL, NULL),
    (40, 5, 'VD', NULL, NULL, NULL, NULL, NULL),
    (50, 6, 'FLT-NYLON', NULL, NULL, NULL, NULL, NULL),
    (60, 7, 'PLATE', NULL, NULL, NULL, NULL, '1'),
    (70, 8, 'XL', NULL, NULL, NULL, NULL, NULL),
    (80, 9, '1 SLOT-R', NULL, NULL, NULL, NULL, NULL),
    (81, 9, '2 SLOT-R', NULL, NULL, NULL, NULL, NULL);

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
    (32, 4, NULL, NULL, NULL, NULL, 31),
    (40, 5, 8, 12, 300, 400, NULL),
    (41, 5, 20, 40, 900, 1100, NULL),
    (42, 5, 40, 80, 2000, 2600, NULL),
    (50, 6, 8, 12, 40, NULL, NULL),
    (51, 6, 12, 16, 60, NULL, NULL),
    (60, 7, NULL, NULL, 150, 180, NULL),
    (70, 8, 8, 12, 500, NULL, NULL),
    (80, 9, NULL, NULL, 120, NULL, NULL),
    (81, 9, 6, NULL, 140, NULL, NULL);

INSERT INTO row_multipliers (table_id, width, height_exceeded_multiplier, height_exceeded_multiplier_wd)
VALUES
    (1, 12, 5.0, 6.0),
    (1, 16, 5.5, NULL),
    (8, 12, 5.0, NULL);

INSERT INTO column_multipliers (table_id, height, width_exceeded_multiplier, width_exceeded_multiplier_wd)
VALUES
    (1, 8, 4.0, NULL),
    (1, 12, 4.5, 5.0),
    (8, 8, 4.0, NULL);
";

/// In-memory store loaded with [`CATALOG`]
pub fn store() -> SqlitePriceStore {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(CATALOG).unwrap();
    SqlitePriceStore::from_connection(conn)
}

pub fn engine() -> PricingEngine {
    engine_with(EngineOptions::default())
}

pub fn engine_with(options: EngineOptions) -> PricingEngine {
    PricingEngine::new(store(), options).unwrap()
}
