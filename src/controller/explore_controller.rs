use std::sync::Arc;
use axum::{Extension, Router};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::json;
use tracing::warn;
use crate::controller::AppState;
use crate::models::catalog::CatalogLoadError;
use crate::services::explore::ExploreService;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(retrieve_catalog))
        .route("/reload", post(reload_catalog))
        .route("/stalls", get(retrieve_all_stalls))
        .route("/pick", get(pick_a_stall))
        .route_layer(Extension(app_state.explore))
}

pub async fn retrieve_catalog(
    Extension(explore): Extension<Arc<ExploreService>>,
) -> impl IntoResponse {
    (StatusCode::OK, json!(explore.state()).to_string()).into_response()
}

pub async fn reload_catalog(
    Extension(explore): Extension<Arc<ExploreService>>,
) -> impl IntoResponse {
    let _load = explore.on_start();
    (StatusCode::ACCEPTED, "Reloading catalog").into_response()
}

pub async fn retrieve_all_stalls(
    Extension(explore): Extension<Arc<ExploreService>>,
) -> impl IntoResponse {
    return match explore.stalls().await {
        Ok(stalls) => {
            (StatusCode::OK, json!(stalls).to_string()).into_response()
        }
        Err(e) => {
            warn!("Something went wrong listing stalls due to: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    };
}

pub async fn pick_a_stall(
    Extension(explore): Extension<Arc<ExploreService>>,
) -> impl IntoResponse {
    return match explore.pick_a_stall().await {
        Ok(picked) => {
            (StatusCode::OK, json!(picked).to_string()).into_response()
        }
        Err(CatalogLoadError::NoStallsAvailable) => {
            (StatusCode::NOT_FOUND, CatalogLoadError::NoStallsAvailable.to_string()).into_response()
        }
        Err(e) => {
            warn!("Something went wrong picking a stall due to: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    };
}
