use async_trait::async_trait;
use larder_catalog::{Grade, MarginTables, Product};

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Catalog lookup supplying typed products
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_product(
        &self,
        code: &str,
    ) -> Result<Option<Product>, RepoError>;

    async fn list_products(&self) -> Result<Vec<Product>, RepoError>;
}

/// Customer lookup supplying the service grade
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn get_grade(
        &self,
        customer_code: &str,
    ) -> Result<Option<Grade>, RepoError>;
}

/// Configuration lookup supplying the current margin tables
#[async_trait]
pub trait MarginRepository: Send + Sync {
    async fn load_tables(&self) -> Result<MarginTables, RepoError>;
}

/// Per (customer, product) override lookup
#[async_trait]
pub trait AdjustmentRepository: Send + Sync {
    /// Snapshot of every override for one customer, keyed by product code.
    /// Pairs without an override are left out and resolve to zero.
    async fn adjustments_for(
        &self,
        customer_code: &str,
    ) -> Result<larder_catalog::AdjustmentBook, RepoError>;
}
