use crate::models::geo::GeoPoint;
use crate::models::place::PlaceCandidate;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometres (haversine).
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = ((d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn within(candidate: &GeoPoint, center: &GeoPoint, radius_km: f64) -> bool {
    distance_km(candidate, center) <= radius_km
}

/// Drops candidates outside the radius. The upstream region scoping is not
/// exact, so this cut is the authoritative one. Order is preserved.
pub fn retain_within(
    candidates: Vec<PlaceCandidate>,
    center: &GeoPoint,
    radius_km: f64,
) -> Vec<PlaceCandidate> {
    candidates
        .into_iter()
        .filter(|candidate| within(&candidate.location, center, radius_km))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::place::PriceLevel;

    /// Point due east of the origin whose computed distance is `km`, never more.
    pub(crate) fn point_east_of_origin(km: f64) -> GeoPoint {
        let origin = GeoPoint::new(0.0, 0.0);
        let mut point = GeoPoint::new(0.0, (km / EARTH_RADIUS_KM).to_degrees());
        while distance_km(&origin, &point) > km {
            point.lon = f64::from_bits(point.lon.to_bits() - 1);
        }
        point
    }

    pub(crate) fn candidate_at(id: &str, location: GeoPoint) -> PlaceCandidate {
        PlaceCandidate {
            id: id.to_string(),
            display_name: format!("Stall {}", id),
            location,
            price_level: PriceLevel::Unspecified,
            photo_ref: None,
        }
    }

    #[test]
    fn distance_between_identical_points_is_zero() {
        let p = GeoPoint::new(-6.3016, 106.6527);
        assert_eq!(distance_km(&p, &p), 0.0);
    }

    #[test]
    fn one_degree_of_longitude_on_the_equator() {
        let d = distance_km(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 1.0));
        assert!((d - 111.195).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(-6.2, 106.8);
        let b = GeoPoint::new(-6.3, 106.65);
        assert!((distance_km(&a, &b) - distance_km(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn retains_candidates_up_to_and_including_the_radius() {
        let center = GeoPoint::new(0.0, 0.0);
        let candidates = [0.5, 1.9, 2.0, 2.1, 5.0]
            .iter()
            .enumerate()
            .map(|(i, km)| candidate_at(&i.to_string(), point_east_of_origin(*km)))
            .collect::<Vec<_>>();

        let kept = retain_within(candidates, &center, 2.0);
        let ids = kept.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();

        assert_eq!(ids, vec!["0", "1", "2"]);
    }
}
