pub mod catalog;
pub mod geo;
pub mod nearby;
pub mod place;
