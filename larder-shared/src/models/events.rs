use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct PriceCalculatedEvent {
    pub event_id: Uuid,
    pub customer_code: String,
    pub product_code: String,
    pub grade: String,
    pub adjustment: f64,
    pub sell_price: f64,
    pub timestamp: i64,
}

/// Raised when a grade D price falls under its margin floor.
/// Advisory: consumers surface it to an operator, orders are never blocked on it.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct RenegotiationFlaggedEvent {
    pub event_id: Uuid,
    pub customer_code: String,
    pub product_code: String,
    pub grade: String,
    pub sell_price: f64,
    pub margin_percent: f64,
    pub min_margin_check_percent: f64,
    pub timestamp: i64,
}

impl RenegotiationFlaggedEvent {
    pub fn new(
        customer_code: String,
        product_code: String,
        grade: String,
        sell_price: f64,
        margin_percent: f64,
        min_margin_check_percent: f64,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            customer_code,
            product_code,
            grade,
            sell_price,
            margin_percent,
            min_margin_check_percent,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// How far under the floor the margin sits, in percentage points
    pub fn shortfall(&self) -> f64 {
        (self.min_margin_check_percent - self.margin_percent).max(0.0)
    }
}

impl PriceCalculatedEvent {
    pub fn new(
        customer_code: String,
        product_code: String,
        grade: String,
        adjustment: f64,
        sell_price: f64,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            customer_code,
            product_code,
            grade,
            adjustment,
            sell_price,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall() {
        let event = RenegotiationFlaggedEvent::new(
            "CUST-1".to_string(),
            "CAN-1".to_string(),
            "D".to_string(),
            60.0,
            -7.7,
            5.0,
        );
        assert!((event.shortfall() - 12.7).abs() < 1e-9);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["grade"], "D");
        assert_eq!(json["margin_percent"], -7.7);
    }
}
