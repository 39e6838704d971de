//! Tabulated prices

/// Normal and with-damper prices of one tabulated size
///
/// Either column may be missing in the table; a row with neither is not a
/// price at all.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TablePrice {
    pub tb: Option<f64>,
    pub wd: Option<f64>,
}

impl TablePrice {
    pub fn new(tb: f64, wd: Option<f64>) -> Self {
        Self { tb: Some(tb), wd }
    }

    /// Build from nullable columns, `None` when both are null.
    pub fn from_columns(tb: Option<f64>, wd: Option<f64>) -> Option<Self> {
        (tb.is_some() || wd.is_some()).then_some(Self { tb, wd })
    }

    /// Scale both prices by the same factor.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            tb: self.tb.map(|v| v * factor),
            wd: self.wd.map(|v| v * factor),
        }
    }
}

/// A full row of the prices table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceRow {
    pub price_id: i64,
    pub table_id: i64,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub normal_price: Option<f64>,
    pub price_with_damper: Option<f64>,
    pub price_per_foot: Option<f64>,
}

impl PriceRow {
    pub fn table_price(&self) -> Option<TablePrice> {
        TablePrice::from_columns(self.normal_price, self.price_with_damper)
    }
}

/// Nearest tabulated size at or below a requested size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPrice {
    pub height: f64,
    pub width: f64,
    pub price: TablePrice,
}
