//! Pricing strategy seam and its randomized stand-in

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use std::sync::{Mutex, PoisonError};
use stay_core::{ComparableListing, PredictionResult, PriceFactor, PriceRange, PropertyDraft};

/// Produces a prediction and its comparables for a submitted draft.
pub trait Predictor: Send + Sync {
    fn predict(&self, draft: &PropertyDraft) -> PredictionResult;

    fn comparables(&self, draft: &PropertyDraft) -> Vec<ComparableListing>;
}

/// Bounds of the drawn nightly price (won)
pub const PRICE_DRAW: Range<u64> = 80_000..130_000;
/// Bounds of the drawn confidence (percent)
pub const CONFIDENCE_DRAW: Range<u8> = 80..100;
/// Range shown regardless of the draft
pub const FIXED_RANGE: PriceRange = PriceRange {
    min: 70_000,
    max: 120_000,
};

const LISTING_IMAGE: &str = "/placeholder.svg?height=200&width=300";

/// (id, name, price, rating, distance km)
const COMPARABLES: [(&str, &str, u64, f32, f32); 3] = [
    ("1", "강남역 도보 5분 모던 아파트", 95_000, 4.8, 0.3),
    ("2", "테헤란로 신축 오피스텔", 88_000, 4.6, 0.5),
    ("3", "역삼동 깔끔한 원룸", 75_000, 4.4, 0.8),
];

/// Random numbers in fixed bounds wrapped in a fixed narrative.
/// Not a pricing model.
pub struct MockPredictor {
    rng: Mutex<StdRng>,
}

impl Default for MockPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPredictor {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible draws.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Predictor for MockPredictor {
    fn predict(&self, draft: &PropertyDraft) -> PredictionResult {
        let (predicted_price, confidence) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            (rng.gen_range(PRICE_DRAW), rng.gen_range(CONFIDENCE_DRAW))
        };
        let bedrooms = draft.bedroom_count.unwrap_or_default();

        let factor = |name: &str, impact: &str, description: String, is_positive: bool| PriceFactor {
            name: name.to_string(),
            impact_label: impact.to_string(),
            description,
            is_positive,
        };

        PredictionResult {
            predicted_price,
            confidence,
            price_range: FIXED_RANGE,
            factors: vec![
                factor("위치", "+15%", "강남구 역세권 위치로 프리미엄".into(), true),
                factor("편의시설", "+8%", "Wi-Fi, 주방 등 필수 시설 완비".into(), true),
                factor("숙소 크기", "+5%", format!("{bedrooms}개 침실로 적정 규모"), true),
                factor("신규 호스트", "-10%", "호스트 평점 부재로 할인 필요".into(), false),
            ],
        }
    }

    fn comparables(&self, draft: &PropertyDraft) -> Vec<ComparableListing> {
        COMPARABLES
            .iter()
            .map(|&(id, name, price, rating, distance_km)| ComparableListing {
                id: id.to_string(),
                name: name.to_string(),
                price,
                rating,
                distance_km,
                bedroom_count: draft.bedroom_count.unwrap_or_default(),
                bathroom_count: draft.bathroom_count.unwrap_or_default(),
                max_guests: draft.max_guests.unwrap_or_default(),
                image_ref: LISTING_IMAGE.to_string(),
            })
            .collect()
    }
}
