use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use crate::helpers::directions::walking_directions_url;
use crate::models::geo::GeoPoint;

pub fn router() -> Router {
    Router::new().route("/directions", get(retrieve_directions))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct DirectionsParam {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

pub async fn retrieve_directions(
    Query(query): Query<DirectionsParam>,
) -> impl IntoResponse {
    let destination = GeoPoint::new(query.lat, query.lon);

    return match walking_directions_url(&query.name, &destination) {
        Ok(url) => {
            (
                StatusCode::OK,
                json!({ "name": query.name, "url": url.as_str() }).to_string()
            ).into_response()
        }
        Err(e) => {
            warn!("Something went wrong building directions to {} due to: {}", query.name, e);
            (StatusCode::BAD_REQUEST, "Failed to build directions, please try again").into_response()
        }
    };
}
