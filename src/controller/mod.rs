use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::info;
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::location_provider::ReportedLocationProvider;
use crate::services::explore::ExploreService;
use crate::services::nearby_search::NearbySearchService;

pub mod directions_controller;
pub mod explore_controller;
pub mod health_check;
pub mod nearby_controller;

#[derive(Clone)]
pub struct AppState {
    pub nearby_search: Arc<NearbySearchService>,
    pub location_provider: Arc<ReportedLocationProvider>,
    pub explore: Arc<ExploreService>,
}

pub async fn serve(
    app_state: AppState,
    config: &Config,
) -> anyhow::Result<()> {
    let origins = config
        .origin_urls
        .split(',')
        .map(|s| s.trim().parse::<HeaderValue>())
        .collect::<Result<Vec<HeaderValue>, _>>()
        .context("Invalid origin url in ORIGIN_URLS")?;

    let application = router_endpoints(app_state)
        .fallback(page_not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::OPTIONS
                        ])
                        .allow_origin(origins)
                        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                )
                .layer(CompressionLayer::new())
        );

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("API server listening on: {}", address);
    axum::Server::bind(&address)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    health_check::router()
        .merge(directions_controller::router())
        .nest("/nearby", nearby_controller::router(app_state.clone()))
        .nest("/explore", explore_controller::router(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use crate::models::geo::GeoPoint;
    use crate::repositories::catalog_repo::tests::{catalog_file, SAMPLE_CATALOG};
    use crate::repositories::catalog_repo::CatalogRepo;
    use crate::repositories::google_places_repo::GooglePlacesRepo;
    use crate::repositories::location_provider::LocationProvider;
    use crate::services::nearby_search::SearchSettings;

    fn app_state(catalog_path: &std::path::Path) -> AppState {
        let location_provider = Arc::new(ReportedLocationProvider::new(true, None));
        let places_gateway = Arc::new(GooglePlacesRepo::new("http://127.0.0.1:9", "test-key").unwrap());

        AppState {
            nearby_search: NearbySearchService::new(
                places_gateway,
                location_provider.clone(),
                SearchSettings::default(),
            ),
            location_provider,
            explore: ExploreService::new(Arc::new(CatalogRepo::new(catalog_path))),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_is_ok() {
        let file = catalog_file(SAMPLE_CATALOG);
        let response = router_endpoints(app_state(file.path()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_invalid_radius() {
        let file = catalog_file(SAMPLE_CATALOG);
        let response = router_endpoints(app_state(file.path()))
            .oneshot(
                Request::put("/nearby/radius")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{ "radius_km": -1 }"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn lists_radius_options() {
        let file = catalog_file(SAMPLE_CATALOG);
        let response = router_endpoints(app_state(file.path()))
            .oneshot(Request::get("/nearby/radius-options").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(body_json(response).await, serde_json::json!([1.0, 2.0, 3.0, 5.0, 10.0]));
    }

    #[tokio::test]
    async fn reported_location_is_used_by_the_provider() {
        let file = catalog_file(SAMPLE_CATALOG);
        let state = app_state(file.path());
        let response = router_endpoints(state.clone())
            .oneshot(
                Request::put("/nearby/location")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{ "lat": -6.3016, "lon": 106.6527 }"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            state.location_provider.last_known_location().await,
            Some(GeoPoint::new(-6.3016, 106.6527))
        );
    }

    #[tokio::test]
    async fn photo_for_unknown_place_is_not_found() {
        let file = catalog_file(SAMPLE_CATALOG);
        let response = router_endpoints(app_state(file.path()))
            .oneshot(Request::get("/nearby/photo/ChIJ1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn picks_a_stall_over_http() {
        let file = catalog_file(SAMPLE_CATALOG);
        let response = router_endpoints(app_state(file.path()))
            .oneshot(Request::get("/explore/pick").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let picked = body_json(response).await;
        assert!(picked["sub_area_name"].as_str().unwrap().starts_with("GOP"));
    }

    #[tokio::test]
    async fn directions_link_points_at_destination() {
        let file = catalog_file(SAMPLE_CATALOG);
        let response = router_endpoints(app_state(file.path()))
            .oneshot(
                Request::get("/directions?name=Bakso&lat=-6.3&lon=106.65")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["name"], "Bakso");
        assert!(body["url"].as_str().unwrap().contains("travelmode=walking"));
    }
}
