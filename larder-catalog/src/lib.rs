pub mod grade;
pub mod product;
pub mod margin;
pub mod pricing;
pub mod renegotiation;
pub mod adjustment;
pub mod batch;

pub use grade::Grade;
pub use product::{PriceType, Product, ProductError, ProductRecord};
pub use margin::{
    FreshMarginTable, IndustrialMargin, IndustrialMarginTable, MarginTables,
    DEFAULT_MIN_MARGIN_CHECK_PERCENT,
};
pub use pricing::{calculate_sell_price, PriceResult, PricingEngine, PricingError};
pub use renegotiation::RenegotiationCheck;
pub use adjustment::{AdjustmentBook, AdjustmentKey, AdjustmentSource};
pub use batch::{GradedCustomer, PriceSheet};
