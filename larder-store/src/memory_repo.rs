use async_trait::async_trait;
use larder_catalog::{AdjustmentBook, AdjustmentKey, Grade, MarginTables, Product};
use larder_core::repository::{
    AdjustmentRepository, CustomerRepository, MarginRepository, ProductRepository, RepoError,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory catalog, customer grades, margin tables and adjustments.
/// Stands in for the data-access layer. Each lookup takes its own read lock, so a caller
/// combining several lookups may observe admin writes landing in between them.
#[derive(Default)]
pub struct MemoryCatalog {
    products: RwLock<HashMap<String, Product>>,
    grades: RwLock<HashMap<String, Grade>>,
    tables: RwLock<MarginTables>,
    adjustments: RwLock<AdjustmentBook>,
}

impl MemoryCatalog {
    pub fn new(tables: MarginTables) -> Self {
        Self {
            tables: RwLock::new(tables),
            ..Default::default()
        }
    }

    pub async fn upsert_product(&self, product: Product) {
        let code = product.code().to_string();
        self.products.write().await.insert(code.clone(), product);
        info!("Product stored: {}", code);
    }

    pub async fn remove_product(&self, code: &str) -> Option<Product> {
        self.products.write().await.remove(code)
    }

    pub async fn set_grade(&self, customer_code: &str, grade: Grade) {
        self.grades.write().await.insert(customer_code.to_string(), grade);
        info!("Customer {} graded {}", customer_code, grade);
    }

    pub async fn set_adjustment(&self, customer_code: &str, product_code: &str, amount: f64) {
        self.adjustments
            .write()
            .await
            .set(AdjustmentKey::new(customer_code, product_code), amount);
        info!("Adjustment set: {}/{} -> {}", customer_code, product_code, amount);
    }

    pub async fn remove_adjustment(&self, customer_code: &str, product_code: &str) -> Option<f64> {
        self.adjustments
            .write()
            .await
            .remove(&AdjustmentKey::new(customer_code, product_code))
    }

    pub async fn replace_tables(&self, tables: MarginTables) {
        *self.tables.write().await = tables;
        info!("Margin tables replaced");
    }
}

#[async_trait]
impl ProductRepository for MemoryCatalog {
    async fn get_product(&self, code: &str) -> Result<Option<Product>, RepoError> {
        Ok(self.products.read().await.get(code).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepoError> {
        let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
        products.sort_by(|a, b| a.code().cmp(b.code()));
        Ok(products)
    }
}

#[async_trait]
impl CustomerRepository for MemoryCatalog {
    async fn get_grade(&self, customer_code: &str) -> Result<Option<Grade>, RepoError> {
        Ok(self.grades.read().await.get(customer_code).copied())
    }
}

#[async_trait]
impl MarginRepository for MemoryCatalog {
    async fn load_tables(&self) -> Result<MarginTables, RepoError> {
        Ok(self.tables.read().await.clone())
    }
}

#[async_trait]
impl AdjustmentRepository for MemoryCatalog {
    async fn adjustments_for(&self, customer_code: &str) -> Result<AdjustmentBook, RepoError> {
        Ok(self.adjustments.read().await.for_customer(customer_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_catalog::AdjustmentSource;

    #[tokio::test]
    async fn test_catalog_lookups() {
        let catalog = MemoryCatalog::new(MarginTables::default());
        catalog.upsert_product(Product::industrial("CAN-1", 55.0, Some(50.0), Some(60.0))).await;
        catalog.upsert_product(Product::fresh("VEG-1")).await;
        catalog.set_grade("CUST-1", Grade::D).await;

        assert!(catalog.get_product("CAN-1").await.unwrap().is_some());
        assert!(catalog.get_product("NOPE").await.unwrap().is_none());

        let codes: Vec<String> = catalog
            .list_products()
            .await
            .unwrap()
            .iter()
            .map(|p| p.code().to_string())
            .collect();
        assert_eq!(codes, vec!["CAN-1", "VEG-1"]);

        assert_eq!(catalog.get_grade("CUST-1").await.unwrap(), Some(Grade::D));
        assert_eq!(catalog.get_grade("CUST-2").await.unwrap(), None);

        assert!(catalog.remove_product("VEG-1").await.is_some());
        assert_eq!(catalog.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_tables() {
        let catalog = MemoryCatalog::default();
        assert!(catalog.load_tables().await.unwrap().fresh.margin_for(Grade::A).is_none());

        let mut tables = MarginTables::default();
        tables.fresh.set(Grade::A, 5.0);
        catalog.replace_tables(tables).await;
        assert_eq!(catalog.load_tables().await.unwrap().fresh.margin_for(Grade::A), Some(5.0));
    }

    #[tokio::test]
    async fn test_adjustment_lifecycle() {
        let catalog = MemoryCatalog::default();
        catalog.set_adjustment("CUST-1", "CAN-1", -3.0).await;
        catalog.set_adjustment("CUST-2", "CAN-1", 4.0).await;

        let book = catalog.adjustments_for("CUST-1").await.unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.resolve("CUST-1", "CAN-1"), -3.0);
        assert_eq!(book.resolve("CUST-1", "VEG-1"), 0.0);
        assert_eq!(book.resolve("CUST-2", "CAN-1"), 0.0);

        assert_eq!(catalog.remove_adjustment("CUST-1", "CAN-1").await, Some(-3.0));
        assert!(catalog.adjustments_for("CUST-1").await.unwrap().is_empty());
        let other = catalog.adjustments_for("CUST-2").await.unwrap();
        assert_eq!(other.resolve("CUST-2", "CAN-1"), 4.0);
    }
}
