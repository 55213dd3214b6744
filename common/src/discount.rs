//! Discount assessment for the cash-deal path

use serde::{Deserialize, Serialize};

/// Listings priced below this share of their estimate are cash deals
pub const DEEP_DISCOUNT_THRESHOLD_PERCENT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountOptions {
    /// Percent of estimate, compared with strict `<`
    pub deep_discount_threshold: f64,
}

impl Default for DiscountOptions {
    fn default() -> Self {
        Self {
            deep_discount_threshold: DEEP_DISCOUNT_THRESHOLD_PERCENT,
        }
    }
}

/// Price vs. estimated value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountAssessment {
    pub list_price: f64,
    pub estimated_value: f64,
    pub percent_of_estimate: f64,
    pub is_deep_discount: bool,
}

impl DiscountAssessment {
    /// Percent below the estimate (negative when listed above it)
    pub fn discount_percent(&self) -> f64 {
        100.0 - self.percent_of_estimate
    }
}

/// Compare `list_price` with `estimated_value`.
///
/// Returns `None` unless both are finite and positive.
pub fn assess(
    list_price: Option<f64>,
    estimated_value: Option<f64>,
    options: &DiscountOptions,
) -> Option<DiscountAssessment> {
    let list_price = list_price.filter(|v| is_usable(*v))?;
    let estimated_value = estimated_value.filter(|v| is_usable(*v))?;

    let percent_of_estimate = list_price * 100.0 / estimated_value;
    Some(DiscountAssessment {
        list_price,
        estimated_value,
        percent_of_estimate,
        is_deep_discount: percent_of_estimate < options.deep_discount_threshold,
    })
}

fn is_usable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
