//! # Stay Core
//!
//! Shared data model for the stay price estimator.
//!
//! ```text
//! PropertyDraft ──(handoff)──▶ PredictionResult + ComparableListing[]
//!   wizard edits                 result viewer derives (mocked)
//! ```
//!
//! Nothing here performs I/O. The runtime crates move these values between
//! the intake wizard, the handoff slot and the result viewer.

pub mod catalog;
pub mod draft;
pub mod format;
pub mod prediction;

pub use catalog::{
    AmenityOption, PropertyTypeOption, ADDRESS_SUGGESTIONS, AMENITIES, BATHROOM_CHOICES,
    BEDROOM_CHOICES, GUEST_CHOICES, PROPERTY_TYPES,
};
pub use draft::{Amenity, LatLng, PropertyDraft, PropertyType, FALLBACK_LOCATION};
pub use format::{format_delta, format_won, html_escape};
pub use prediction::{
    price_delta_percent, ComparableListing, PredictionResult, PriceFactor, PriceRange,
};

/// Result type for stay-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stay-core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("{0}")]
    NotImplemented(String),
}
