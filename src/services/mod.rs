pub mod explore;
pub mod nearby_search;
