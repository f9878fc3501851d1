use reqwest::Url;
use tracing::info;
use crate::models::geo::GeoPoint;

const DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/";

/// Builds a walking-directions link from the user's current location to the
/// destination. The link is handed to the client to open; nothing is tracked after.
pub fn walking_directions_url(name: &str, destination: &GeoPoint) -> anyhow::Result<Url> {
    let url = Url::parse_with_params(
        DIRECTIONS_BASE_URL,
        &[
            ("api", "1".to_string()),
            ("destination", format!("{},{}", destination.lat, destination.lon)),
            ("travelmode", "walking".to_string()),
        ],
    )?;
    info!("Opening walking directions to {} at {}", name, url);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_walking_link_to_coordinate() {
        let url = walking_directions_url("Ayam Geprek", &GeoPoint::new(-6.3016, 106.6527)).unwrap();
        let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

        assert_eq!(url.host_str(), Some("www.google.com"));
        assert!(pairs.contains(&("destination".to_string(), "-6.3016,106.6527".to_string())));
        assert!(pairs.contains(&("travelmode".to_string(), "walking".to_string())));
    }
}
