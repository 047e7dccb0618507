//! Coordinate validation and short-range distance approximation.

use crate::error::CoreError;

/// Metres per degree of latitude used by the flat-earth approximation.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Two crags with the same name closer than this are treated as the same crag.
pub const DUPLICATE_CRAG_RADIUS_METERS: f64 = 200.0;

/// Default search radius for nearby-crag lookups.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;

/// Reject NaN/infinite values and coordinates outside WGS84 bounds.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), CoreError> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(CoreError::Validation("Invalid lat or lng values".into()));
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(CoreError::Validation("Invalid coordinates".into()));
    }
    Ok(())
}

/// Parse a `lat`/`lng` query pair. Both must be present and numeric.
pub fn parse_coordinates(lat: Option<&str>, lng: Option<&str>) -> Result<(f64, f64), CoreError> {
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(CoreError::Validation(
            "lat and lng parameters are required".into(),
        ));
    };

    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation("Invalid lat or lng values".into()))?;
    let longitude: f64 = lng
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation("Invalid lat or lng values".into()))?;

    validate_coordinates(latitude, longitude)?;
    Ok((latitude, longitude))
}

/// Equirectangular distance in metres from `(from_lat, from_lng)` to a target.
///
/// Longitude is scaled by the cosine of `from_lat`; accurate to well under a
/// percent at crag scale (a few kilometres).
pub fn approx_distance_meters(from_lat: f64, from_lng: f64, to_lat: f64, to_lng: f64) -> f64 {
    let dy = (to_lat - from_lat) * METERS_PER_DEGREE;
    let dx = (to_lng - from_lng) * METERS_PER_DEGREE * from_lat.to_radians().cos();
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        assert_eq!(approx_distance_meters(49.4, -2.6, 49.4, -2.6), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = approx_distance_meters(0.0, 0.0, 1.0, 0.0);
        assert!((d - METERS_PER_DEGREE).abs() < 1e-6);
    }

    #[test]
    fn longitude_shrinks_with_latitude() {
        let equator = approx_distance_meters(0.0, 0.0, 0.0, 0.001);
        let north = approx_distance_meters(60.0, 0.0, 60.0, 0.001);
        assert!((north - equator / 2.0).abs() < 0.01);
    }

    #[test]
    fn nearby_points_fall_inside_duplicate_radius() {
        // ~111 m north.
        let d = approx_distance_meters(49.4500, -2.5800, 49.4510, -2.5800);
        assert!(d < DUPLICATE_CRAG_RADIUS_METERS);
        let far = approx_distance_meters(49.4500, -2.5800, 49.4600, -2.5800);
        assert!(far > DUPLICATE_CRAG_RADIUS_METERS);
    }

    #[test]
    fn parse_requires_both_values() {
        assert!(parse_coordinates(Some("1.0"), None).is_err());
        assert!(parse_coordinates(None, None).is_err());
        assert!(parse_coordinates(Some("abc"), Some("1")).is_err());
        assert_eq!(parse_coordinates(Some(" 49.5"), Some("-2.5")).unwrap(), (49.5, -2.5));
    }

    #[test]
    fn out_of_range_coordinates_are_invalid() {
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
    }
}
