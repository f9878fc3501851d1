use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::models::geo::GeoPoint;
use crate::models::place::Photo;

/// Radius choices offered to clients. The search service accepts any positive radius.
pub const RADIUS_OPTIONS_KM: [f64; 5] = [1.0, 2.0, 3.0, 5.0, 10.0];

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SearchInput {
    pub text: String,
    pub radius_km: f64,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self {
            text: String::new(),
            radius_km: RADIUS_OPTIONS_KM[0],
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct NearbyResult {
    pub id: String,
    pub display_name: String,
    pub location: GeoPoint,
    pub distance_km: f64,
    pub price_label: Option<String>,
    #[serde(rename = "has_photo", serialize_with = "serialize_has_photo")]
    pub photo: Option<Photo>,
}

fn serialize_has_photo<S>(photo: &Option<Photo>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_bool(photo.is_some())
}

#[derive(Clone, Serialize, Debug, PartialEq, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchError {
    #[error("Location permission not granted or no location fix available")]
    LocationUnavailable,
    #[error("Places request failed: {message}")]
    Gateway { message: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum SearchInputError {
    #[error("Radius must be a positive number of kilometres, got {0}")]
    InvalidRadius(f64),
}

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum SearchState {
    Loading,
    Loaded(Vec<NearbyResult>),
    Error(SearchError),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    pub fn results(&self) -> Option<&[NearbyResult]> {
        match self {
            SearchState::Loaded(results) => Some(results),
            _ => None,
        }
    }
}
