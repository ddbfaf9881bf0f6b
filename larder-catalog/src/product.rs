use serde::{Deserialize, Serialize};

/// Pricing category of a catalog item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    Fresh,
    Industrial,
}

/// Perishable item priced as cost plus a flat margin.
/// The buy price is supplied per calculation from recent purchase costs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreshProduct {
    pub code: String,
}

/// Packaged item priced off its purchase cost and observed market figures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndustrialProduct {
    pub code: String,
    /// Purchase cost
    pub pur: f64,
    /// Observed market floor
    pub min: Option<f64>,
    /// Observed market median
    pub mid: Option<f64>,
}

/// A catalog item as seen by the pricing engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "price_type", rename_all = "snake_case")]
pub enum Product {
    Fresh(FreshProduct),
    Industrial(IndustrialProduct),
}

impl Product {
    pub fn fresh(code: impl Into<String>) -> Self {
        Product::Fresh(FreshProduct { code: code.into() })
    }

    pub fn industrial(
        code: impl Into<String>,
        pur: f64,
        min: Option<f64>,
        mid: Option<f64>,
    ) -> Self {
        Product::Industrial(IndustrialProduct {
            code: code.into(),
            pur,
            min,
            mid,
        })
    }

    pub fn code(&self) -> &str {
        match self {
            Product::Fresh(p) => &p.code,
            Product::Industrial(p) => &p.code,
        }
    }

    pub fn price_type(&self) -> PriceType {
        match self {
            Product::Fresh(_) => PriceType::Fresh,
            Product::Industrial(_) => PriceType::Industrial,
        }
    }
}

/// Untyped product row as handed over by catalog storage
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductRecord {
    pub code: String,
    pub price_type: String,
    #[serde(default)]
    pub pur: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub mid: Option<f64>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = ProductError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        match record.price_type.as_str() {
            "fresh" => Ok(Product::fresh(record.code)),
            "industrial" => {
                let pur = record
                    .pur
                    .ok_or_else(|| ProductError::MissingCost(record.code.clone()))?;
                if pur < 0.0 {
                    return Err(ProductError::NegativeCost {
                        code: record.code,
                        pur,
                    });
                }
                Ok(Product::industrial(record.code, pur, record.min, record.mid))
            }
            other => Err(ProductError::InvalidProductCategory(other.to_string())),
        }
    }
}

/// Product-related errors
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Invalid product category: {0}")]
    InvalidProductCategory(String),

    #[error("Industrial product has no purchase cost: {0}")]
    MissingCost(String),

    #[error("Negative purchase cost for {code}: {pur}")]
    NegativeCost { code: String, pur: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price_type: &str, pur: Option<f64>) -> ProductRecord {
        ProductRecord {
            code: "P-001".to_string(),
            price_type: price_type.to_string(),
            pur,
            min: Some(50.0),
            mid: Some(60.0),
        }
    }

    #[test]
    fn test_record_conversion() {
        let fresh = Product::try_from(record("fresh", None)).unwrap();
        assert_eq!(fresh, Product::fresh("P-001"));

        let industrial = Product::try_from(record("industrial", Some(55.0))).unwrap();
        assert_eq!(industrial.price_type(), PriceType::Industrial);
        assert_eq!(industrial.code(), "P-001");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = Product::try_from(record("frozen", Some(10.0))).unwrap_err();
        assert!(matches!(err, ProductError::InvalidProductCategory(ref c) if c == "frozen"));
    }

    #[test]
    fn test_industrial_cost_invariant() {
        assert!(matches!(
            Product::try_from(record("industrial", None)),
            Err(ProductError::MissingCost(_))
        ));
        assert!(matches!(
            Product::try_from(record("industrial", Some(-1.0))),
            Err(ProductError::NegativeCost { .. })
        ));
        assert!(Product::try_from(record("industrial", Some(0.0))).is_ok());
    }

    #[test]
    fn test_product_serde_tag() {
        let product = Product::industrial("IND-7", 55.0, Some(50.0), None);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price_type"], "industrial");
        assert_eq!(json["pur"], 55.0);

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, product);

        let unknown = serde_json::json!({ "price_type": "frozen", "code": "X" });
        assert!(serde_json::from_value::<Product>(unknown).is_err());
    }
}
