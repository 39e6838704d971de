use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::debug;
use ventprice_core::{ClosestPrice, PriceRow, Product, TablePrice};

use crate::error::{StoreError, StoreResult};
use crate::repository::PriceRepository;

/// PriceRepository backed by a read-only rusqlite connection.
///
/// The handle is opened once and closed when dropped. It may move between
/// threads but must not be shared; give each thread its own store.
pub struct SqlitePriceStore {
    conn: Connection,
}

impl SqlitePriceStore {
    /// Open an existing price database read-only.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "opened price database");
        Ok(Self { conn })
    }

    /// Wrap an existing connection (useful for tests).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Give the connection back.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Count price rows of a model that satisfy a fixed condition.
    fn product_condition(&self, model: &str, condition: &str) -> StoreResult<bool> {
        if model.trim().is_empty() {
            return Ok(false);
        }

        let sql = format!(
            "SELECT COUNT(*) FROM products p \
             JOIN prices pr ON p.table_id = pr.table_id \
             WHERE p.model = ?1 AND {}",
            condition
        );
        let count: i64 = self.conn.query_row(&sql, params![model], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// `(regular, with damper)` of the row multiplier with the largest width.
    fn highest_row_multiplier(&self, table_id: i64) -> StoreResult<Option<MultiplierPair>> {
        self.multiplier_pair(
            "SELECT height_exceeded_multiplier, height_exceeded_multiplier_wd \
             FROM row_multipliers WHERE table_id = ?1 \
             ORDER BY width DESC LIMIT 1",
            params![table_id],
        )
    }

    /// `(regular, with damper)` of the column multiplier with the largest height.
    fn highest_column_multiplier(&self, table_id: i64) -> StoreResult<Option<MultiplierPair>> {
        self.multiplier_pair(
            "SELECT width_exceeded_multiplier, width_exceeded_multiplier_wd \
             FROM column_multipliers WHERE table_id = ?1 \
             ORDER BY height DESC LIMIT 1",
            params![table_id],
        )
    }

    fn multiplier_pair(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StoreResult<Option<MultiplierPair>> {
        let pair = self
            .conn
            .query_row(sql, params, |row| {
                Ok(MultiplierPair {
                    regular: row.get(0)?,
                    with_damper: row.get(1)?,
                })
            })
            .optional()?;
        Ok(pair)
    }

    fn column_f64(&self, sql: &str, table_id: i64) -> StoreResult<Vec<f64>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![table_id], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<f64>, _>>()?)
    }
}

/// Regular and with-damper variants of one extrapolation multiplier
#[derive(Debug, Clone, Copy)]
struct MultiplierPair {
    regular: Option<f64>,
    with_damper: Option<f64>,
}

impl MultiplierPair {
    fn pick(self, with_damper: bool) -> Option<f64> {
        if with_damper {
            self.with_damper
        } else {
            self.regular
        }
    }
}

impl PriceRepository for SqlitePriceStore {
    fn available_models(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT model FROM products ORDER BY model")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }

    fn product(&self, model: &str) -> StoreResult<Option<Product>> {
        let product = self
            .conn
            .query_row(
                "SELECT product_id, table_id, model, tb_modifier, wd_modifier, \
                        anodized_multiplier, powder_coated_multiplier, no_finish_multiplier \
                 FROM products WHERE model = ?1 LIMIT 1",
                params![model],
                |row| {
                    Ok(Product {
                        product_id: row.get(0)?,
                        table_id: row.get(1)?,
                        model: row.get(2)?,
                        tb_modifier: row.get(3)?,
                        wd_modifier: row.get(4)?,
                        anodized_multiplier: row.get(5)?,
                        powder_coated_multiplier: row.get(6)?,
                        no_finish_multiplier: row.get(7)?,
                    })
                },
            )
            .optional()?;

        debug!(model, found = product.is_some(), "product lookup");
        Ok(product)
    }

    fn table_id(&self, model: &str) -> StoreResult<Option<i64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT table_id FROM products WHERE model = ?1 LIMIT 1",
                params![model],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn price_for_dimensions(
        &self,
        table_id: i64,
        height: f64,
        width: f64,
    ) -> StoreResult<Option<TablePrice>> {
        let columns = self
            .conn
            .query_row(
                "SELECT normal_price, price_with_damper FROM prices \
                 WHERE table_id = ?1 AND height = ?2 AND width = ?3",
                params![table_id, height, width],
                |row| {
                    Ok((
                        row.get::<_, Option<f64>>(0)?,
                        row.get::<_, Option<f64>>(1)?,
                    ))
                },
            )
            .optional()?;

        debug!(table_id, height, width, found = columns.is_some(), "dimension lookup");
        Ok(columns.and_then(|(tb, wd)| TablePrice::from_columns(tb, wd)))
    }

    fn price_for_diameter(&self, table_id: i64, diameter: f64) -> StoreResult<Option<TablePrice>> {
        let columns = self
            .conn
            .query_row(
                "SELECT normal_price, price_with_damper FROM prices \
                 WHERE table_id = ?1 AND height = ?2 AND width IS NULL",
                params![table_id, diameter],
                |row| {
                    Ok((
                        row.get::<_, Option<f64>>(0)?,
                        row.get::<_, Option<f64>>(1)?,
                    ))
                },
            )
            .optional()?;

        debug!(table_id, diameter, found = columns.is_some(), "diameter lookup");
        Ok(columns.and_then(|(tb, wd)| TablePrice::from_columns(tb, wd)))
    }

    fn price_per_foot(&self, table_id: i64, size: f64) -> StoreResult<Option<f64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT price_per_foot FROM prices \
                 WHERE table_id = ?1 AND height = ?2 AND price_per_foot IS NOT NULL \
                 ORDER BY height LIMIT 1",
                params![table_id, size],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn price_per_foot_by_id(&self, price_id: i64) -> StoreResult<Option<f64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT price_per_foot FROM prices \
                 WHERE price_id = ?1 AND price_per_foot IS NOT NULL",
                params![price_id],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn price_by_id(&self, price_id: i64) -> StoreResult<Option<PriceRow>> {
        Ok(self
            .conn
            .query_row(
                "SELECT price_id, table_id, height, width, normal_price, \
                        price_with_damper, price_per_foot \
                 FROM prices WHERE price_id = ?1",
                params![price_id],
                |row| {
                    Ok(PriceRow {
                        price_id: row.get(0)?,
                        table_id: row.get(1)?,
                        height: row.get(2)?,
                        width: row.get(3)?,
                        normal_price: row.get(4)?,
                        price_with_damper: row.get(5)?,
                        price_per_foot: row.get(6)?,
                    })
                },
            )
            .optional()?)
    }

    fn max_dimensions(&self, table_id: i64) -> StoreResult<Option<(f64, f64)>> {
        let (max_height, max_width): (Option<f64>, Option<f64>) = self.conn.query_row(
            "SELECT MAX(height), MAX(width) FROM prices WHERE table_id = ?1",
            params![table_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(max_height.zip(max_width))
    }

    fn exceeded_multiplier(
        &self,
        table_id: i64,
        width: f64,
        height: f64,
        with_damper: bool,
    ) -> StoreResult<Option<f64>> {
        let Some((max_height, max_width)) = self.max_dimensions(table_id)? else {
            return Ok(None);
        };

        let width_exceeds = width > max_width;
        let height_exceeds = height > max_height;

        let multiplier = match (width_exceeds, height_exceeds) {
            (true, true) => {
                let row = self
                    .highest_row_multiplier(table_id)?
                    .and_then(|pair| pair.pick(with_damper));
                let column = self
                    .highest_column_multiplier(table_id)?
                    .and_then(|pair| pair.pick(with_damper));

                [row, column]
                    .into_iter()
                    .flatten()
                    .filter(|m| *m > 0.0)
                    .reduce(f64::max)
            }
            (true, false) => self
                .multiplier_pair(
                    "SELECT width_exceeded_multiplier, width_exceeded_multiplier_wd \
                     FROM column_multipliers WHERE table_id = ?1 AND height <= ?2 \
                     ORDER BY height DESC LIMIT 1",
                    params![table_id, height],
                )?
                .and_then(|pair| pair.pick(with_damper)),
            (false, true) => self
                .multiplier_pair(
                    "SELECT height_exceeded_multiplier, height_exceeded_multiplier_wd \
                     FROM row_multipliers WHERE table_id = ?1 AND width <= ?2 \
                     ORDER BY width DESC LIMIT 1",
                    params![table_id, width],
                )?
                .and_then(|pair| pair.pick(with_damper)),
            (false, false) => None,
        };

        debug!(
            table_id,
            width,
            height,
            with_damper,
            ?multiplier,
            "exceeded-dimension multiplier"
        );
        Ok(multiplier)
    }

    fn closest_price_at_or_below(
        &self,
        table_id: i64,
        height: f64,
        width: f64,
    ) -> StoreResult<Option<ClosestPrice>> {
        let row = self
            .conn
            .query_row(
                "SELECT height, width, normal_price, price_with_damper FROM prices \
                 WHERE table_id = ?1 AND height <= ?2 AND width <= ?3 \
                 ORDER BY height DESC, width DESC LIMIT 1",
                params![table_id, height, width],
                |row| {
                    Ok((
                        row.get::<_, f64>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, Option<f64>>(2)?,
                        row.get::<_, Option<f64>>(3)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.and_then(|(height, width, tb, wd)| {
            TablePrice::from_columns(tb, wd).map(|price| ClosestPrice {
                height,
                width,
                price,
            })
        }))
    }

    fn is_other_table(&self, model: &str) -> StoreResult<bool> {
        self.product_condition(model, "pr.width IS NULL")
    }

    fn has_price_per_foot(&self, model: &str) -> StoreResult<bool> {
        self.product_condition(model, "pr.price_per_foot IS NOT NULL")
    }

    fn has_no_dimensions(&self, model: &str) -> StoreResult<bool> {
        self.product_condition(model, "pr.height IS NULL AND pr.width IS NULL")
    }

    fn rectangular_sizes(&self, table_id: i64) -> StoreResult<Vec<(f64, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT width, height FROM prices \
             WHERE table_id = ?1 AND width IS NOT NULL AND height IS NOT NULL",
        )?;
        let rows = stmt.query_map(params![table_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<Result<Vec<(f64, f64)>, _>>()?)
    }

    fn diameters(&self, table_id: i64) -> StoreResult<Vec<f64>> {
        self.column_f64(
            "SELECT height FROM prices \
             WHERE table_id = ?1 AND width IS NULL AND height IS NOT NULL \
             ORDER BY height",
            table_id,
        )
    }

    fn price_per_foot_sizes(&self, table_id: i64) -> StoreResult<Vec<f64>> {
        self.column_f64(
            "SELECT height FROM prices \
             WHERE table_id = ?1 AND price_per_foot IS NOT NULL AND height IS NOT NULL \
             ORDER BY height",
            table_id,
        )
    }

    fn price_id_for_no_dimensions(&self, model: &str) -> StoreResult<Option<i64>> {
        let Some(product) = self.product(model)? else {
            return Ok(None);
        };

        let min_product_id: Option<i64> = self.conn.query_row(
            "SELECT MIN(product_id) FROM products WHERE table_id = ?1",
            params![product.table_id],
            |row| row.get(0),
        )?;
        let first_price_id: Option<i64> = self.conn.query_row(
            "SELECT MIN(price_id) FROM prices \
             WHERE table_id = ?1 AND height IS NULL AND width IS NULL",
            params![product.table_id],
            |row| row.get(0),
        )?;

        Ok(min_product_id
            .zip(first_price_id)
            .map(|(min_product_id, first_price_id)| {
                first_price_id + (product.product_id - min_product_id)
            }))
    }
}
