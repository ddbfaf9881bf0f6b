use serde::{Deserialize, Serialize};

/// Advisory outcome of the grade D margin floor check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RenegotiationCheck {
    pub margin_percent: f64,
    pub needs_renegotiation: bool,
}

/// Margin of `sell_price` over `pur` in percent, rounded to one decimal.
/// A non-positive cost yields 0 instead of dividing by it.
pub fn margin_percent(sell_price: f64, pur: f64) -> f64 {
    if pur > 0.0 {
        round_to_one_decimal((sell_price - pur) / pur * 100.0)
    } else {
        0.0
    }
}

/// Flag the price for review when its margin falls strictly below `min_margin_check_percent`
pub fn check(sell_price: f64, pur: f64, min_margin_check_percent: f64) -> RenegotiationCheck {
    let margin_percent = margin_percent(sell_price, pur);
    RenegotiationCheck {
        margin_percent,
        needs_renegotiation: margin_percent < min_margin_check_percent,
    }
}

#[inline]
fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
