pub mod catalog_repo;
pub mod google_places_repo;
pub mod location_provider;
pub mod places_gateway;
