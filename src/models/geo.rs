use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Circular area used to scope a places request.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Region {
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl Region {
    pub fn new(center: GeoPoint, radius_km: f64) -> Self {
        Self { center, radius_km }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_km * 1_000.0
    }
}
