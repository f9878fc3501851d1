use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use crate::config::Config;
use crate::controller::AppState;
use crate::repositories::catalog_repo::CatalogRepo;
use crate::repositories::google_places_repo::GooglePlacesRepo;
use crate::repositories::location_provider::ReportedLocationProvider;
use crate::services::explore::ExploreService;
use crate::services::nearby_search::NearbySearchService;

pub mod config;
pub mod controller;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    info!("Starting nearby stall backend in {} environment", config.environment);

    let places_gateway = Arc::new(
        GooglePlacesRepo::new(&config.places_base_url, &config.places_api_key)
            .context("Failed to set up the places client")?,
    );
    let location_provider = Arc::new(ReportedLocationProvider::new(
        config.location_authorized,
        config.seed_location(),
    ));
    let nearby_search = NearbySearchService::new(
        places_gateway,
        location_provider.clone(),
        config.search_settings(),
    );
    let explore = ExploreService::new(Arc::new(CatalogRepo::new(&config.catalog_path)));

    let _ = explore.on_start();
    let _ = nearby_search.on_start().await;

    let app_state = AppState {
        nearby_search,
        location_provider,
        explore,
    };

    controller::serve(app_state, &config).await
}
