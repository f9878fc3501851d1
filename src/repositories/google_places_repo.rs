use std::time::Duration;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;
use crate::models::geo::{GeoPoint, Region};
use crate::models::place::{Photo, PhotoRef, PlaceCandidate, PlaceProperty, PriceLevel};
use crate::repositories::places_gateway::{
    GatewayError, NearbySearchRequest, PhotoRequest, PlacesGateway, TextSearchRequest,
};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";
const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

/// Places API (New) client.
pub struct GooglePlacesRepo {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesRepo {
    pub fn new(
        base_url: &str,
        api_key: &str,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build the places HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn post_search<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
        properties: &[PlaceProperty],
    ) -> Result<Vec<PlaceCandidate>, GatewayError> {
        let response = self.client
            .post(format!("{}/{}", self.base_url, endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .header(FIELD_MASK_HEADER, field_mask(properties))
            .json(body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let payload: SearchPlacesResponse = response.json().await?;
        debug!("{} returned {} places", endpoint, payload.places.len());

        Ok(payload.places.into_iter().filter_map(into_candidate).collect())
    }
}

#[async_trait]
impl PlacesGateway for GooglePlacesRepo {
    async fn search_nearby(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<Vec<PlaceCandidate>, GatewayError> {
        let body = SearchNearbyBody::from(request);
        self.post_search("places:searchNearby", &body, &request.properties).await
    }

    async fn search_by_text(
        &self,
        request: &TextSearchRequest,
    ) -> Result<Vec<PlaceCandidate>, GatewayError> {
        let body = SearchTextBody::from(request);
        self.post_search("places:searchText", &body, &request.properties).await
    }

    async fn fetch_photo(&self, request: &PhotoRequest) -> Result<Photo, GatewayError> {
        let response = self.client
            .get(format!("{}/{}/media", self.base_url, request.photo.0))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[
                ("maxWidthPx", request.max_width_px.to_string()),
                ("maxHeightPx", request.max_height_px.to_string()),
            ])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response.bytes().await?;

        Ok(Photo {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

fn field_mask(properties: &[PlaceProperty]) -> String {
    properties
        .iter()
        .map(|property| format!("places.{}", property.field_name()))
        .collect::<Vec<_>>()
        .join(",")
}

async fn ensure_success(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ApiErrorEnvelope>().await {
        Ok(envelope) => envelope.error.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    warn!("Places service rejected request with {}: {}", status, message);

    Err(GatewayError::Api {
        status: status.as_u16(),
        message,
    })
}

fn into_candidate(place: WirePlace) -> Option<PlaceCandidate> {
    let Some(location) = place.location else {
        warn!("Skipping place {:?} without coordinates", place.id);
        return None;
    };

    Some(PlaceCandidate {
        id: place.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        display_name: place
            .display_name
            .map(|name| name.text)
            .unwrap_or_else(|| UNKNOWN_DISPLAY_NAME.to_string()),
        location: GeoPoint::new(location.latitude, location.longitude),
        price_level: place.price_level.unwrap_or_default(),
        photo_ref: place.photos.into_iter().next().map(|photo| PhotoRef(photo.name)),
    })
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Debug)]
struct Circle {
    center: LatLng,
    radius: f64,
}

#[derive(Serialize, Debug)]
struct CircleArea {
    circle: Circle,
}

impl From<&Region> for CircleArea {
    fn from(region: &Region) -> Self {
        Self {
            circle: Circle {
                center: LatLng {
                    latitude: region.center.lat,
                    longitude: region.center.lon,
                },
                radius: region.radius_meters(),
            },
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SearchNearbyBody {
    included_types: Vec<&'static str>,
    max_result_count: u32,
    location_restriction: CircleArea,
}

impl From<&NearbySearchRequest> for SearchNearbyBody {
    fn from(request: &NearbySearchRequest) -> Self {
        Self {
            included_types: request.included_types.iter().map(|t| t.as_str()).collect(),
            max_result_count: request.max_result_count,
            location_restriction: CircleArea::from(&request.region),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SearchTextBody {
    text_query: String,
    included_type: &'static str,
    page_size: u32,
    open_now: bool,
    location_bias: CircleArea,
}

impl From<&TextSearchRequest> for SearchTextBody {
    fn from(request: &TextSearchRequest) -> Self {
        Self {
            text_query: request.text_query.clone(),
            included_type: request.included_type.as_str(),
            page_size: request.max_result_count,
            open_now: request.open_now,
            location_bias: CircleArea::from(&request.region),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct SearchPlacesResponse {
    #[serde(default)]
    places: Vec<WirePlace>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WirePlace {
    id: Option<String>,
    display_name: Option<LocalizedText>,
    location: Option<LatLng>,
    price_level: Option<PriceLevel>,
    #[serde(default)]
    photos: Vec<WirePhoto>,
}

#[derive(Deserialize, Debug)]
struct LocalizedText {
    text: String,
}

#[derive(Deserialize, Debug)]
struct WirePhoto {
    name: String,
}

#[derive(Deserialize, Debug)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    message: String,
}
