//! Live summary of the draft shown beside the form

use serde::Serialize;
use stay_core::PropertyDraft;

use crate::WizardStep;

/// Amenity labels listed before collapsing into "+N개"
pub const PREVIEW_AMENITY_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftPreview {
    pub property_type: String,
    pub address: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub guests: String,
    pub amenities: Vec<&'static str>,
    pub amenity_overflow: Option<String>,
    pub hint: &'static str,
}

impl DraftPreview {
    pub fn build(draft: &PropertyDraft, step: WizardStep) -> Self {
        let count = |value: Option<u32>, unit: &str| match value {
            Some(n) if n > 0 => format!("{n}{unit}"),
            _ => "-".to_string(),
        };

        let selected = draft.selected_amenities.len();
        let amenities = draft
            .selected_amenities
            .iter()
            .take(PREVIEW_AMENITY_LIMIT)
            .map(|a| a.label())
            .collect();
        let amenity_overflow = (selected > PREVIEW_AMENITY_LIMIT)
            .then(|| format!("+{}개", selected - PREVIEW_AMENITY_LIMIT));

        Self {
            property_type: draft
                .property_type
                .map(|t| t.label().to_string())
                .unwrap_or_else(|| "미선택".to_string()),
            address: if draft.address.is_empty() {
                "미입력".to_string()
            } else {
                draft.address.clone()
            },
            bedrooms: count(draft.bedroom_count, "개"),
            bathrooms: count(draft.bathroom_count, "개"),
            guests: count(draft.max_guests, "명"),
            amenities,
            amenity_overflow,
            hint: step.hint(),
        }
    }
}
