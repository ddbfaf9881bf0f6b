use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::adjustment::AdjustmentSource;
use crate::grade::Grade;
use crate::pricing::{PriceResult, PricingEngine};
use crate::product::{PriceType, Product};

/// One priced product on a customer's sheet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceSheetLine {
    pub product_code: String,
    pub price_type: PriceType,
    pub adjustment: f64,
    pub result: PriceResult,
}

/// A product that could not be priced for this customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceSheetFailure {
    pub product_code: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSheet {
    pub customer_code: String,
    pub grade: Grade,
    pub lines: Vec<PriceSheetLine>,
    pub failures: Vec<PriceSheetFailure>,
}

impl PriceSheet {
    /// Lines an operator should review before quoting
    pub fn flagged(&self) -> impl Iterator<Item = &PriceSheetLine> {
        self.lines.iter().filter(|line| line.result.needs_renegotiation())
    }
}

/// A customer and the grade it is served at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GradedCustomer {
    pub customer_code: String,
    pub grade: Grade,
}

/// Price every product for one customer. Lines keep the order of `products`.
///
/// Fresh items need a buy price in `buy_prices` (keyed by product code); without one the
/// item is reported as a failure rather than priced off a zero cost.
pub fn price_sheet<A>(
    engine: &PricingEngine,
    customer: &GradedCustomer,
    products: &[Product],
    buy_prices: &HashMap<String, f64>,
    adjustments: &A,
) -> PriceSheet
where
    A: AdjustmentSource + ?Sized,
{
    let outcomes: Vec<Result<PriceSheetLine, PriceSheetFailure>> = products
        .par_iter()
        .map(|product| price_line(engine, customer, product, buy_prices, adjustments))
        .collect();

    let mut lines = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(line) => lines.push(line),
            Err(failure) => failures.push(failure),
        }
    }

    if !failures.is_empty() {
        tracing::warn!(
            "{} of {} products could not be priced for {}",
            failures.len(),
            products.len(),
            customer.customer_code
        );
    }

    PriceSheet {
        customer_code: customer.customer_code.clone(),
        grade: customer.grade,
        lines,
        failures,
    }
}

/// Price the full customer × product grid. Each sheet is computed independently.
pub fn price_matrix<A>(
    engine: &PricingEngine,
    customers: &[GradedCustomer],
    products: &[Product],
    buy_prices: &HashMap<String, f64>,
    adjustments: &A,
) -> Vec<PriceSheet>
where
    A: AdjustmentSource + ?Sized,
{
    customers
        .par_iter()
        .map(|customer| price_sheet(engine, customer, products, buy_prices, adjustments))
        .collect()
}

fn price_line<A>(
    engine: &PricingEngine,
    customer: &GradedCustomer,
    product: &Product,
    buy_prices: &HashMap<String, f64>,
    adjustments: &A,
) -> Result<PriceSheetLine, PriceSheetFailure>
where
    A: AdjustmentSource + ?Sized,
{
    let code = product.code();
    let buy_price = match product {
        Product::Fresh(_) => *buy_prices.get(code).ok_or_else(|| PriceSheetFailure {
            product_code: code.to_string(),
            reason: "no buy price for fresh product".to_string(),
        })?,
        Product::Industrial(_) => 0.0,
    };
    let adjustment = adjustments.resolve(&customer.customer_code, code);

    let result = engine
        .calculate(product, customer.grade, buy_price, adjustment)
        .map_err(|e| PriceSheetFailure {
            product_code: code.to_string(),
            reason: e.to_string(),
        })?;

    Ok(PriceSheetLine {
        product_code: code.to_string(),
        price_type: product.price_type(),
        adjustment,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjustment::{AdjustmentBook, AdjustmentKey};
    use crate::margin::{IndustrialMargin, MarginTables};

    fn engine() -> PricingEngine {
        let fresh = Grade::ALL
            .into_iter()
            .zip([3.0, 5.0, 7.0, 10.0, 12.0, 15.0])
            .collect();
        let industrial = [
            (Grade::A, IndustrialMargin::new(1.05, 1.0)),
            (Grade::D, IndustrialMargin::new(1.0, 1.0)),
        ]
        .into_iter()
        .collect();
        PricingEngine::new(MarginTables::new(fresh, industrial))
    }

    fn products() -> Vec<Product> {
        vec![
            Product::fresh("VEG-1"),
            Product::industrial("CAN-1", 55.0, Some(50.0), Some(60.0)),
            Product::industrial("CAN-2", 65.0, Some(50.0), Some(60.0)),
            Product::fresh("VEG-2"),
        ]
    }

    fn customer(code: &str, grade: Grade) -> GradedCustomer {
        GradedCustomer {
            customer_code: code.to_string(),
            grade,
        }
    }

    #[test]
    fn test_price_sheet_keeps_order_and_reports_failures() {
        let buy_prices = HashMap::from([("VEG-1".to_string(), 30.0)]);
        let book: AdjustmentBook = [(AdjustmentKey::new("CUST-1", "CAN-1"), -3.0)]
            .into_iter()
            .collect();

        let cust = customer("CUST-1", Grade::A);
        let sheet = price_sheet(&engine(), &cust, &products(), &buy_prices, &book);

        let codes: Vec<&str> = sheet.lines.iter().map(|l| l.product_code.as_str()).collect();
        assert_eq!(codes, vec!["VEG-1", "CAN-1", "CAN-2"]);
        assert_eq!(sheet.lines[0].result.sell_price, 35.0);
        assert_eq!(sheet.lines[1].result.sell_price, 55.0);
        assert_eq!(sheet.lines[1].adjustment, -3.0);
        assert_eq!(sheet.failures.len(), 1);
        assert_eq!(sheet.failures[0].product_code, "VEG-2");
    }

    #[test]
    fn test_price_matrix_flags_grade_d() {
        let buy_prices = HashMap::from([
            ("VEG-1".to_string(), 30.0),
            ("VEG-2".to_string(), 12.5),
        ]);
        let customers = vec![customer("CUST-1", Grade::A), customer("CUST-2", Grade::D)];

        let book = AdjustmentBook::new();
        let sheets = price_matrix(&engine(), &customers, &products(), &buy_prices, &book);
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].customer_code, "CUST-1");
        assert_eq!(sheets[0].flagged().count(), 0);

        let flagged: Vec<&str> = sheets[1].flagged().map(|l| l.product_code.as_str()).collect();
        assert_eq!(flagged, vec!["CAN-2"]);
        assert_eq!(sheets[1].lines[3].result.sell_price, 24.5);
    }
}
