use serde::{Deserialize, Serialize};
use crate::grade::Grade;
use crate::margin::{FreshMarginTable, IndustrialMarginTable, MarginTables};
use crate::product::{IndustrialProduct, Product, ProductError, ProductRecord};
use crate::renegotiation;

/// Outcome of a sell price calculation.
/// `margin_percent` and `needs_renegotiation` are only set by the grade D industrial branch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceResult {
    pub sell_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_renegotiation: Option<bool>,
}

impl PriceResult {
    pub fn plain(sell_price: f64) -> Self {
        Self {
            sell_price,
            margin_percent: None,
            needs_renegotiation: None,
        }
    }

    pub fn needs_renegotiation(&self) -> bool {
        self.needs_renegotiation.unwrap_or(false)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Grade D pricing needs a market min or mid price: {0}")]
    MissingMarketPrice(String),

    #[error(transparent)]
    Product(#[from] ProductError),
}

/// Cost plus flat margin. No rounding is applied.
pub fn price_fresh(buy_price: f64, margin_baht: f64, adj: f64) -> f64 {
    buy_price + margin_baht + adj
}

/// Cost times multiplier, rounded half away from zero to a whole unit.
/// The adjustment is added after rounding.
pub fn price_industrial_standard(pur: f64, pur_multiplier: f64, adj: f64) -> f64 {
    (pur * pur_multiplier).round() + adj
}

/// Negotiated grade D price: the higher of the market floor and median, plus the adjustment,
/// checked against the renegotiation threshold.
pub fn price_industrial_grade_d(
    min: f64,
    mid: f64,
    pur: f64,
    min_margin_check_percent: f64,
    adj: f64,
) -> PriceResult {
    let base_price = min.max(mid);
    let sell_price = base_price + adj;
    let check = renegotiation::check(sell_price, pur, min_margin_check_percent);

    PriceResult {
        sell_price,
        margin_percent: Some(check.margin_percent),
        needs_renegotiation: Some(check.needs_renegotiation),
    }
}

/// Dispatch on product category and grade.
///
/// A grade missing from the relevant table degrades to raw cost plus adjustment
/// (`pur` for industrial, `buy_price` for fresh) so catalog browsing never fails on a
/// missing margin row.
pub fn calculate_sell_price(
    product: &Product,
    grade: Grade,
    fresh_table: &FreshMarginTable,
    industrial_table: &IndustrialMarginTable,
    buy_price: f64,
    adj: f64,
) -> Result<PriceResult, PricingError> {
    let result = match product {
        Product::Fresh(fresh) => match fresh_table.margin_for(grade) {
            Some(margin_baht) => PriceResult::plain(price_fresh(buy_price, margin_baht, adj)),
            None => {
                tracing::warn!(
                    "No fresh margin for grade {}, pricing {} at cost",
                    grade, fresh.code
                );
                PriceResult::plain(buy_price + adj)
            }
        },
        Product::Industrial(industrial) => {
            price_industrial(industrial, grade, industrial_table, adj)?
        }
    };

    tracing::debug!(
        product = product.code(),
        grade = grade.as_str(),
        sell_price = result.sell_price,
        "Calculated sell price"
    );

    Ok(result)
}

fn price_industrial(
    product: &IndustrialProduct,
    grade: Grade,
    table: &IndustrialMarginTable,
    adj: f64,
) -> Result<PriceResult, PricingError> {
    let Some(margin) = table.entry_for(grade) else {
        tracing::warn!(
            "No industrial margin for grade {}, pricing {} at cost",
            grade, product.code
        );
        return Ok(PriceResult::plain(product.pur + adj));
    };

    if !grade.is_negotiated() {
        return Ok(PriceResult::plain(price_industrial_standard(
            product.pur,
            margin.pur_multiplier,
            adj,
        )));
    }

    let (min, mid) = match (product.min, product.mid) {
        (Some(min), Some(mid)) => (min, mid),
        (Some(only), None) | (None, Some(only)) => (only, only),
        (None, None) => return Err(PricingError::MissingMarketPrice(product.code.clone())),
    };

    Ok(price_industrial_grade_d(
        min,
        mid,
        product.pur,
        margin.min_margin_check_percent,
        adj,
    ))
}

/// Pricing engine bound to one set of margin tables
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    tables: MarginTables,
}

impl PricingEngine {
    pub fn new(tables: MarginTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &MarginTables {
        &self.tables
    }

    pub fn calculate(
        &self,
        product: &Product,
        grade: Grade,
        buy_price: f64,
        adj: f64,
    ) -> Result<PriceResult, PricingError> {
        calculate_sell_price(
            product,
            grade,
            &self.tables.fresh,
            &self.tables.industrial,
            buy_price,
            adj,
        )
    }

    /// Price an untyped storage row; an unknown category is a caller error
    pub fn calculate_record(
        &self,
        record: ProductRecord,
        grade: Grade,
        buy_price: f64,
        adj: f64,
    ) -> Result<PriceResult, PricingError> {
        let product = Product::try_from(record)?;
        self.calculate(&product, grade, buy_price, adj)
    }
}
