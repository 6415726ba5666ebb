//! Fixed option lists shown by the intake screens

use crate::draft::{Amenity, PropertyType};

/// Display data for a property type
#[derive(Debug, Clone, Copy)]
pub struct PropertyTypeOption {
    pub kind: PropertyType,
    pub label: &'static str,
    pub description: &'static str,
}

/// Display data for an amenity
#[derive(Debug, Clone, Copy)]
pub struct AmenityOption {
    pub amenity: Amenity,
    pub label: &'static str,
}

pub const PROPERTY_TYPES: [PropertyTypeOption; 5] = [
    PropertyTypeOption { kind: PropertyType::Apartment, label: "아파트", description: "일반적인 아파트 형태" },
    PropertyTypeOption { kind: PropertyType::House, label: "단독주택", description: "독립된 주택" },
    PropertyTypeOption { kind: PropertyType::Condo, label: "콘도", description: "콘도미니엄" },
    PropertyTypeOption { kind: PropertyType::Studio, label: "원룸", description: "스튜디오 타입" },
    PropertyTypeOption { kind: PropertyType::Villa, label: "빌라", description: "빌라/연립주택" },
];

pub const AMENITIES: [AmenityOption; 8] = [
    AmenityOption { amenity: Amenity::Wifi, label: "Wi-Fi" },
    AmenityOption { amenity: Amenity::Parking, label: "주차장" },
    AmenityOption { amenity: Amenity::Kitchen, label: "주방" },
    AmenityOption { amenity: Amenity::Pool, label: "수영장" },
    AmenityOption { amenity: Amenity::Gym, label: "헬스장" },
    AmenityOption { amenity: Amenity::Balcony, label: "발코니" },
    AmenityOption { amenity: Amenity::Aircon, label: "에어컨" },
    AmenityOption { amenity: Amenity::Heating, label: "난방" },
];

/// Candidate addresses offered while typing, in display order.
pub const ADDRESS_SUGGESTIONS: [&str; 5] = [
    "서울특별시 강남구 테헤란로",
    "서울특별시 마포구 홍대입구역",
    "서울특별시 종로구 명동",
    "서울특별시 용산구 이태원로",
    "서울특별시 서초구 강남역",
];

pub const BEDROOM_CHOICES: [u32; 5] = [1, 2, 3, 4, 5];
pub const BATHROOM_CHOICES: [u32; 4] = [1, 2, 3, 4];
pub const GUEST_CHOICES: [u32; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

impl PropertyType {
    pub fn label(&self) -> &'static str {
        PROPERTY_TYPES
            .iter()
            .find(|o| o.kind == *self)
            .map(|o| o.label)
            .unwrap_or_default()
    }
}

impl Amenity {
    pub fn label(&self) -> &'static str {
        AMENITIES
            .iter()
            .find(|o| o.amenity == *self)
            .map(|o| o.label)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_a_label() {
        for kind in PropertyType::ALL {
            assert!(!kind.label().is_empty(), "{kind} has no label");
        }
        for amenity in Amenity::ALL {
            assert!(!amenity.label().is_empty(), "{amenity} has no label");
        }
    }

    #[test]
    fn test_catalog_order_matches_enum_order() {
        let kinds: Vec<_> = PROPERTY_TYPES.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, PropertyType::ALL.to_vec());
        let amenities: Vec<_> = AMENITIES.iter().map(|o| o.amenity).collect();
        assert_eq!(amenities, Amenity::ALL.to_vec());
    }
}
