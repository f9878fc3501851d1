use std::time::Duration;
use clap::Parser;
use crate::models::geo::GeoPoint;
use crate::services::nearby_search::SearchSettings;

#[derive(Parser, Clone, Debug)]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    #[clap(env, long)]
    pub places_api_key: String,

    #[clap(env, long, default_value = "https://places.googleapis.com/v1")]
    pub places_base_url: String,

    #[clap(env, long, default_value = "data/gop.json")]
    pub catalog_path: String,

    /// Comma separated list of allowed CORS origins
    #[clap(env, long, default_value = "http://localhost:5173")]
    pub origin_urls: String,

    #[clap(env, long, default_value_t = 3000)]
    pub port: u16,

    #[clap(env, long, default_value_t = 500)]
    pub search_debounce_ms: u64,

    #[clap(env, long, default_value_t = 1.0)]
    pub default_radius_km: f64,

    #[clap(env, long, default_value_t = 10)]
    pub result_limit: u32,

    #[clap(env, long, default_value_t = 512)]
    pub photo_max_px: u32,

    #[clap(env, long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    #[clap(env, long, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    #[clap(env, long, default_value_t = true, action = clap::ArgAction::Set)]
    pub location_authorized: bool,
}

impl Config {
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.search_debounce_ms),
            default_radius_km: self.default_radius_km,
            result_limit: self.result_limit,
            photo_max_px: self.photo_max_px,
        }
    }

    /// Initial device fix, only when both coordinates are configured.
    pub fn seed_location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults_and_seed_location() {
        let config = Config::parse_from([
            "ngirit-kuy-backend",
            "--places-api-key",
            "test-key",
            "--latitude",
            "-6.3016",
            "--longitude",
            "106.6527",
        ]);

        assert!(config.location_authorized);
        assert_eq!(config.seed_location(), Some(GeoPoint::new(-6.3016, 106.6527)));

        let settings = config.search_settings();
        assert_eq!(settings.debounce, Duration::from_millis(500));
        assert_eq!(settings.result_limit, 10);
    }

    #[test]
    fn half_a_coordinate_is_no_fix() {
        let config = Config::parse_from([
            "ngirit-kuy-backend",
            "--places-api-key",
            "test-key",
            "--latitude",
            "-6.3016",
        ]);

        assert_eq!(config.seed_location(), None);
    }
}
