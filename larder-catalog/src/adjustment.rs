use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key of a per-customer price override
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AdjustmentKey {
    pub customer_code: String,
    pub product_code: String,
}

impl AdjustmentKey {
    pub fn new(customer_code: impl Into<String>, product_code: impl Into<String>) -> Self {
        Self {
            customer_code: customer_code.into(),
            product_code: product_code.into(),
        }
    }
}

/// Resolves the signed amount added after the base price is computed
pub trait AdjustmentSource: Send + Sync {
    /// Returns 0 when the pair carries no override
    fn resolve(&self, customer_code: &str, product_code: &str) -> f64;
}

/// In-memory adjustment book, maintained by administrative action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjustmentBook {
    entries: HashMap<String, HashMap<String, f64>>,
}

impl AdjustmentBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace an override. Discounts are negative, surcharges positive.
    pub fn set(&mut self, key: AdjustmentKey, amount: f64) {
        self.entries
            .entry(key.customer_code)
            .or_default()
            .insert(key.product_code, amount);
    }

    pub fn remove(&mut self, key: &AdjustmentKey) -> Option<f64> {
        let products = self.entries.get_mut(&key.customer_code)?;
        let removed = products.remove(&key.product_code);
        if products.is_empty() {
            self.entries.remove(&key.customer_code);
        }
        removed
    }

    pub fn get(&self, customer_code: &str, product_code: &str) -> Option<f64> {
        self.entries
            .get(customer_code)
            .and_then(|products| products.get(product_code))
            .copied()
    }

    /// Copy of the overrides held for one customer
    pub fn for_customer(&self, customer_code: &str) -> AdjustmentBook {
        let mut entries = HashMap::new();
        if let Some(products) = self.entries.get(customer_code) {
            entries.insert(customer_code.to_string(), products.clone());
        }
        AdjustmentBook { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AdjustmentSource for AdjustmentBook {
    fn resolve(&self, customer_code: &str, product_code: &str) -> f64 {
        self.get(customer_code, product_code).unwrap_or(0.0)
    }
}

impl FromIterator<(AdjustmentKey, f64)> for AdjustmentBook {
    fn from_iter<I: IntoIterator<Item = (AdjustmentKey, f64)>>(iter: I) -> Self {
        let mut book = AdjustmentBook::new();
        for (key, amount) in iter {
            book.set(key, amount);
        }
        book
    }
}
