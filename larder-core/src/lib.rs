pub mod repository;

pub use repository::{
    AdjustmentRepository, CustomerRepository, MarginRepository, ProductRepository, RepoError,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Pricing failed: {0}")]
    Pricing(#[from] larder_catalog::PricingError),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl From<RepoError> for CoreError {
    fn from(err: RepoError) -> Self {
        tracing::error!("Repository error: {}", err);
        CoreError::InternalError(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
