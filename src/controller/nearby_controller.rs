use std::sync::Arc;
use std::time::Duration;
use axum::{Extension, Json, Router};
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use crate::controller::AppState;
use crate::models::geo::GeoPoint;
use crate::models::nearby::RADIUS_OPTIONS_KM;
use crate::repositories::location_provider::ReportedLocationProvider;
use crate::services::nearby_search::NearbySearchService;

const MAX_LONG_POLL: Duration = Duration::from_secs(30);

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(retrieve_search_state))
        .route("/next", get(await_next_search_state))
        .route("/text", put(update_search_text))
        .route("/radius", put(update_search_radius))
        .route("/radius-options", get(retrieve_radius_options))
        .route("/start", post(start_search))
        .route("/location", put(report_location))
        .route("/photo/:place_id", get(retrieve_place_photo))
        .route_layer(Extension(app_state.nearby_search))
        .route_layer(Extension(app_state.location_provider))
}

pub async fn retrieve_search_state(
    Extension(nearby_search): Extension<Arc<NearbySearchService>>,
) -> impl IntoResponse {
    (StatusCode::OK, json!(nearby_search.state()).to_string()).into_response()
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct NextStateParam {
    pub timeout_ms: Option<u64>,
}

/// Long poll: answers with the next published state, or the current one on timeout.
pub async fn await_next_search_state(
    Extension(nearby_search): Extension<Arc<NearbySearchService>>,
    Query(query): Query<NextStateParam>,
) -> impl IntoResponse {
    let mut state_rx = nearby_search.subscribe();
    let timeout = query
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(MAX_LONG_POLL)
        .min(MAX_LONG_POLL);

    if tokio::time::timeout(timeout, state_rx.changed()).await.is_err() {
        info!("No search state change within {:?}", timeout);
    }
    let state = state_rx.borrow().clone();

    (StatusCode::OK, json!(state).to_string()).into_response()
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchText {
    pub text: String,
}

pub async fn update_search_text(
    Extension(nearby_search): Extension<Arc<NearbySearchService>>,
    Json(body): Json<SearchText>,
) -> impl IntoResponse {
    let scheduled = nearby_search.set_text(body.text);
    (StatusCode::OK, json!({ "scheduled": scheduled }).to_string()).into_response()
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchRadius {
    pub radius_km: f64,
}

pub async fn update_search_radius(
    Extension(nearby_search): Extension<Arc<NearbySearchService>>,
    Json(body): Json<SearchRadius>,
) -> impl IntoResponse {
    return match nearby_search.set_radius(body.radius_km) {
        Ok(started) => {
            (StatusCode::OK, json!({ "scheduled": started }).to_string()).into_response()
        }
        Err(e) => {
            warn!("Rejected radius update due to: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    };
}

pub async fn retrieve_radius_options() -> impl IntoResponse {
    (StatusCode::OK, json!(RADIUS_OPTIONS_KM).to_string()).into_response()
}

pub async fn start_search(
    Extension(nearby_search): Extension<Arc<NearbySearchService>>,
) -> impl IntoResponse {
    let _cycle = nearby_search.on_start().await;
    (StatusCode::ACCEPTED, "Nearby search started").into_response()
}

pub async fn report_location(
    Extension(location_provider): Extension<Arc<ReportedLocationProvider>>,
    Json(body): Json<GeoPoint>,
) -> impl IntoResponse {
    if !body.lat.is_finite() || !body.lon.is_finite() {
        return (StatusCode::BAD_REQUEST, "Coordinates must be finite numbers").into_response();
    }
    location_provider.report(body);
    (StatusCode::OK, "Location updated").into_response()
}

pub async fn retrieve_place_photo(
    Extension(nearby_search): Extension<Arc<NearbySearchService>>,
    Path(place_id): Path<String>,
) -> impl IntoResponse {
    let state = nearby_search.state();
    let photo = state
        .results()
        .and_then(|results| results.iter().find(|result| result.id == place_id))
        .and_then(|result| result.photo.clone());

    return match photo {
        Some(photo) => {
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, photo.content_type)],
                photo.bytes,
            ).into_response()
        }
        None => {
            (StatusCode::NOT_FOUND, "No photo for this place in the current results").into_response()
        }
    };
}
