//! Persisted schema
//!
//! The price database is produced by the spreadsheet importer. The store
//! never creates or migrates tables; this DDL documents what it reads and
//! is used to build fixtures.

/// DDL of every table the store queries
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS products (
    product_id INTEGER PRIMARY KEY,
    table_id INTEGER NOT NULL,
    model TEXT NOT NULL,
    sheet_name TEXT,
    tb_modifier TEXT,
    wd_modifier TEXT,
    anodized_multiplier TEXT,
    powder_coated_multiplier TEXT,
    no_finish_multiplier TEXT
);

CREATE TABLE IF NOT EXISTS prices (
    price_id INTEGER PRIMARY KEY,
    table_id INTEGER NOT NULL,
    height REAL,
    width REAL,
    normal_price REAL,
    price_with_damper REAL,
    price_per_foot REAL
);

CREATE INDEX IF NOT EXISTS idx_price_lookup ON prices (table_id, height, width);

CREATE TABLE IF NOT EXISTS row_multipliers (
    table_id INTEGER NOT NULL,
    width REAL NOT NULL,
    height_exceeded_multiplier REAL,
    height_exceeded_multiplier_wd REAL
);

CREATE TABLE IF NOT EXISTS column_multipliers (
    table_id INTEGER NOT NULL,
    height REAL NOT NULL,
    width_exceeded_multiplier REAL,
    width_exceeded_multiplier_wd REAL
);
";
