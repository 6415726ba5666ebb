//! Prediction output and comparable listings

use serde::{Deserialize, Serialize};

/// Lower and upper bound of the suggested nightly price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

/// One explanatory factor behind a prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFactor {
    pub name: String,
    pub impact_label: String,
    pub description: String,
    pub is_positive: bool,
}

/// A nightly price estimate. Built once per result load, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted_price: u64,
    /// Percentage in 0..=100
    pub confidence: u8,
    pub price_range: PriceRange,
    pub factors: Vec<PriceFactor>,
}

impl PredictionResult {
    /// Lower band of the pricing guide (90%, floored).
    pub fn discount_price(&self) -> u64 {
        self.predicted_price * 9 / 10
    }

    /// Upper band of the pricing guide (110%, floored).
    pub fn premium_price(&self) -> u64 {
        self.predicted_price * 11 / 10
    }

    /// Signed percentage of a listing's price relative to this prediction.
    pub fn delta_for(&self, listing: &ComparableListing) -> i64 {
        price_delta_percent(listing.price, self.predicted_price)
    }
}

/// A reference property shown next to the prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableListing {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub rating: f32,
    pub distance_km: f32,
    pub bedroom_count: u32,
    pub bathroom_count: u32,
    pub max_guests: u32,
    pub image_ref: String,
}

/// `round((price - predicted) / predicted * 100)`, ties rounded toward +inf.
///
/// A zero prediction yields zero rather than an infinite delta.
pub fn price_delta_percent(price: u64, predicted: u64) -> i64 {
    if predicted == 0 {
        return 0;
    }
    // floor((2n + d) / 2d) in integers keeps .5 ties exact
    let n = (price as i128 - predicted as i128) * 100;
    let d = predicted as i128;
    let rounded = (2 * n + d).div_euclid(2 * d);
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}
