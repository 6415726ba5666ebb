//! Property draft - the in-progress description a host edits in the wizard

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A coordinate pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Shift by the given deltas, in degrees.
    pub fn offset(self, dlat: f64, dlng: f64) -> Self {
        Self::new(self.lat + dlat, self.lng + dlng)
    }
}

/// Placeholder location used until a geocoder exists (Seoul City Hall).
pub const FALLBACK_LOCATION: LatLng = LatLng::new(37.5665, 126.978);

/// Kind of property being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Studio,
    Villa,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::Condo,
        PropertyType::Studio,
        PropertyType::Villa,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Condo => "condo",
            PropertyType::Studio => "studio",
            PropertyType::Villa => "villa",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PropertyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| Error::InvalidValue {
                field: "propertyType",
                value: s.to_string(),
            })
    }
}

/// Amenity identifiers. Ordering follows the catalog so sets iterate stably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Amenity {
    Wifi,
    Parking,
    Kitchen,
    Pool,
    Gym,
    Balcony,
    Aircon,
    Heating,
}

impl Amenity {
    pub const ALL: [Amenity; 8] = [
        Amenity::Wifi,
        Amenity::Parking,
        Amenity::Kitchen,
        Amenity::Pool,
        Amenity::Gym,
        Amenity::Balcony,
        Amenity::Aircon,
        Amenity::Heating,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Amenity::Wifi => "wifi",
            Amenity::Parking => "parking",
            Amenity::Kitchen => "kitchen",
            Amenity::Pool => "pool",
            Amenity::Gym => "gym",
            Amenity::Balcony => "balcony",
            Amenity::Aircon => "aircon",
            Amenity::Heating => "heating",
        }
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Amenity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amenity::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| Error::InvalidValue {
                field: "amenity",
                value: s.to_string(),
            })
    }
}

/// Everything the host has entered so far.
///
/// Capacity fields treat `None` and `Some(0)` alike as "not set".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    pub property_type: Option<PropertyType>,
    pub address: String,
    pub bedroom_count: Option<u32>,
    pub bathroom_count: Option<u32>,
    pub max_guests: Option<u32>,
    #[serde(default)]
    pub selected_amenities: BTreeSet<Amenity>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for PropertyDraft {
    fn default() -> Self {
        Self {
            property_type: None,
            address: String::new(),
            bedroom_count: None,
            bathroom_count: None,
            max_guests: None,
            selected_amenities: BTreeSet::new(),
            latitude: FALLBACK_LOCATION.lat,
            longitude: FALLBACK_LOCATION.lng,
        }
    }
}

impl PropertyDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty draft anchored at a configured fallback location.
    pub fn at(location: LatLng) -> Self {
        Self {
            latitude: location.lat,
            longitude: location.lng,
            ..Self::default()
        }
    }

    pub fn location(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Type chosen and address non-empty.
    pub fn has_basic_info(&self) -> bool {
        self.property_type.is_some() && !self.address.is_empty()
    }

    /// All three capacity counts set to a positive value.
    pub fn has_capacity(&self) -> bool {
        [self.bedroom_count, self.bathroom_count, self.max_guests]
            .iter()
            .all(|c| matches!(c, Some(n) if *n > 0))
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
