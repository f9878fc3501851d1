use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum StallPriceLevel {
    #[serde(rename = "$")]
    Inexpensive,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
    #[serde(rename = "$$$$")]
    VeryExpensive,
}

/// Root of the bundled catalog. Ids are not stored in the file and are minted on decode.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Area {
    #[serde(skip_deserializing, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub image_name: Option<String>,
    #[serde(default)]
    pub sub_areas: Vec<SubArea>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SubArea {
    #[serde(skip_deserializing, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub stalls: Vec<Stall>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Stall {
    #[serde(skip_deserializing, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub price_level_string: StallPriceLevel,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_name: Option<String>,
    #[serde(default)]
    pub items: Vec<StallItem>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct StallItem {
    #[serde(skip_deserializing, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub price_in_k: f64,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_name: Option<String>,
}

/// A stall flattened out of the tree together with the sub-area it sits in.
#[derive(Clone, Serialize, Debug)]
pub struct StallWithSubArea {
    pub sub_area_name: String,
    pub stall: Stall,
}

#[derive(Clone, Serialize, Debug, PartialEq, Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum CatalogLoadError {
    #[error("Data file not found")]
    FileNotFound,
    #[error("Failed to decode the catalog: {0}")]
    Decoding(String),
    #[error("No available stalls")]
    NoStallsAvailable,
}

#[derive(Clone, Serialize, Debug)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ExploreState {
    Loading,
    Loaded(Area),
    Error(CatalogLoadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_snake_case_catalog_and_mints_ids() {
        let raw = r#"{
            "name": "GOP",
            "latitude": -6.30,
            "longitude": 106.65,
            "sub_areas": [{
                "name": "Kantin GOP 9",
                "latitude": -6.301,
                "longitude": 106.652,
                "stalls": [{
                    "price_level_string": "$$",
                    "name": "Ayam Geprek",
                    "description": "Smashed fried chicken",
                    "items": [{ "price_in_k": 18, "name": "Geprek Keju", "description": "With cheese" }]
                }]
            }]
        }"#;

        let area: Area = serde_json::from_str(raw).unwrap();
        let stall = &area.sub_areas[0].stalls[0];

        assert_eq!(stall.price_level_string, StallPriceLevel::Moderate);
        assert_eq!(stall.items[0].price_in_k, 18.0);
        assert!(stall.image_name.is_none());
        assert_ne!(area.id, area.sub_areas[0].id);
    }

    #[test]
    fn rejects_unknown_price_string() {
        let raw = r#"{ "price_level_string": "$$$$$", "name": "x", "description": "y" }"#;
        assert!(serde_json::from_str::<Stall>(raw).is_err());
    }
}
