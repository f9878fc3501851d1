use async_trait::async_trait;
use thiserror::Error;
use crate::models::geo::Region;
use crate::models::place::{Photo, PhotoRef, PlaceCandidate, PlaceProperty, PlaceType};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Could not reach the places service: {0}")]
    Transport(String),
    #[error("Places service responded with {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Unexpected response from the places service: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        // Request urls can carry credentials, keep them out of error text.
        let e = e.without_url();
        if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NearbySearchRequest {
    pub region: Region,
    pub included_types: Vec<PlaceType>,
    pub properties: Vec<PlaceProperty>,
    pub max_result_count: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextSearchRequest {
    pub text_query: String,
    pub region: Region,
    pub included_type: PlaceType,
    pub properties: Vec<PlaceProperty>,
    pub max_result_count: u32,
    pub open_now: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhotoRequest {
    pub photo: PhotoRef,
    pub max_width_px: u32,
    pub max_height_px: u32,
}

/// Remote places service: search and photo retrieval. Calls may fail independently.
#[async_trait]
pub trait PlacesGateway: Send + Sync {
    async fn search_nearby(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<Vec<PlaceCandidate>, GatewayError>;

    async fn search_by_text(
        &self,
        request: &TextSearchRequest,
    ) -> Result<Vec<PlaceCandidate>, GatewayError>;

    async fn fetch_photo(&self, request: &PhotoRequest) -> Result<Photo, GatewayError>;
}
