use chrono::{DateTime, Utc};
use larder_catalog::{Grade, PriceResult, PriceType};
use larder_shared::{PriceCalculatedEvent, RenegotiationFlaggedEvent};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sell price quoted to one customer for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub customer_code: String,
    pub product_code: String,
    pub grade: Grade,
    pub price_type: PriceType,
    pub buy_price: f64,
    pub adjustment: f64,
    pub result: PriceResult,
    /// Threshold the grade D margin was checked against, when it was
    pub min_margin_check_percent: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    pub fn needs_renegotiation(&self) -> bool {
        self.result.needs_renegotiation()
    }

    pub fn calculated_event(&self) -> PriceCalculatedEvent {
        PriceCalculatedEvent::new(
            self.customer_code.clone(),
            self.product_code.clone(),
            self.grade.to_string(),
            self.adjustment,
            self.result.sell_price,
        )
    }

    /// `None` unless the quote was flagged for review
    pub fn renegotiation_event(&self) -> Option<RenegotiationFlaggedEvent> {
        if !self.needs_renegotiation() {
            return None;
        }
        Some(RenegotiationFlaggedEvent::new(
            self.customer_code.clone(),
            self.product_code.clone(),
            self.grade.to_string(),
            self.result.sell_price,
            self.result.margin_percent?,
            self.min_margin_check_percent?,
        ))
    }
}
