pub mod models;
pub mod service;

pub use models::Quote;
pub use service::QuoteService;
