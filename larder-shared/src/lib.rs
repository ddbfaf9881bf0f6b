pub mod models;

pub use models::events::{PriceCalculatedEvent, RenegotiationFlaggedEvent};
