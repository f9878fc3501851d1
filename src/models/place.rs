use serde::{Deserialize, Deserializer, Serialize};
use crate::models::geo::GeoPoint;

/// Coarse price category reported by the places service.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, Default)]
pub enum PriceLevel {
    #[default]
    #[serde(rename = "PRICE_LEVEL_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "PRICE_LEVEL_FREE")]
    Free,
    #[serde(rename = "PRICE_LEVEL_INEXPENSIVE")]
    Inexpensive,
    #[serde(rename = "PRICE_LEVEL_MODERATE")]
    Moderate,
    #[serde(rename = "PRICE_LEVEL_EXPENSIVE")]
    Expensive,
    #[serde(rename = "PRICE_LEVEL_VERY_EXPENSIVE")]
    VeryExpensive,
    #[serde(rename = "PRICE_LEVEL_UNRECOGNIZED")]
    Unrecognized,
}

impl<'de> Deserialize<'de> for PriceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "PRICE_LEVEL_UNSPECIFIED" => PriceLevel::Unspecified,
            "PRICE_LEVEL_FREE" => PriceLevel::Free,
            "PRICE_LEVEL_INEXPENSIVE" => PriceLevel::Inexpensive,
            "PRICE_LEVEL_MODERATE" => PriceLevel::Moderate,
            "PRICE_LEVEL_EXPENSIVE" => PriceLevel::Expensive,
            "PRICE_LEVEL_VERY_EXPENSIVE" => PriceLevel::VeryExpensive,
            _ => PriceLevel::Unrecognized,
        })
    }
}

/// Opaque photo resource name, e.g. `places/{place_id}/photos/{photo_id}`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PhotoRef(pub String);

#[derive(Clone, Debug, PartialEq)]
pub struct PlaceCandidate {
    pub id: String,
    pub display_name: String,
    pub location: GeoPoint,
    pub price_level: PriceLevel,
    pub photo_ref: Option<PhotoRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Photo {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    Restaurant,
    Cafe,
}

impl PlaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceType::Restaurant => "restaurant",
            PlaceType::Cafe => "cafe",
        }
    }
}

/// Place fields a search request asks the service to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceProperty {
    PlaceId,
    DisplayName,
    Coordinate,
    Photos,
    PriceLevel,
}

impl PlaceProperty {
    pub const SEARCH_DEFAULTS: [PlaceProperty; 5] = [
        PlaceProperty::PlaceId,
        PlaceProperty::DisplayName,
        PlaceProperty::Coordinate,
        PlaceProperty::Photos,
        PlaceProperty::PriceLevel,
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            PlaceProperty::PlaceId => "id",
            PlaceProperty::DisplayName => "displayName",
            PlaceProperty::Coordinate => "location",
            PlaceProperty::Photos => "photos",
            PlaceProperty::PriceLevel => "priceLevel",
        }
    }
}
