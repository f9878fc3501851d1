pub mod debounce;
pub mod directions;
pub mod geo_filter;
pub mod handler_404;
pub mod price_level;
pub mod state_holder;
