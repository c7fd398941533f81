//! Utility functions for coordinate projections and distance units

/// Web Mercator bounds in meters (EPSG:3857)
pub const EARTH_MERCATOR_MAX: f64 = 20037508.34;

/// Maximum latitude that can be represented in Web Mercator
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Meters in one international mile
pub const METERS_PER_MILE: f64 = 1609.344;

/// Precomputed constant: EARTH_MERCATOR_MAX / 180.0
const LON_TO_X_FACTOR: f64 = EARTH_MERCATOR_MAX / 180.0;

/// Precomputed constant: EARTH_MERCATOR_MAX / PI
const Y_FACTOR: f64 = EARTH_MERCATOR_MAX / std::f64::consts::PI;

/// Precomputed constant: 180.0 / EARTH_MERCATOR_MAX
const X_TO_LON_FACTOR: f64 = 180.0 / EARTH_MERCATOR_MAX;

/// Precomputed constant: PI / EARTH_MERCATOR_MAX
const Y_TO_LAT_FACTOR: f64 = std::f64::consts::PI / EARTH_MERCATOR_MAX;

/// Convert WGS84 (lon, lat) to Web Mercator (x, y) in meters
///
/// Latitude is clamped to the range Web Mercator can represent.
#[inline(always)]
pub fn wgs84_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);

    let x = lon * LON_TO_X_FACTOR;
    let lat_rad = lat.to_radians();
    let y = (lat_rad.tan() + (1.0 / lat_rad.cos())).ln() * Y_FACTOR;

    (x, y)
}

/// Convert Web Mercator (x, y) in meters to WGS84 (lon, lat) in degrees
#[inline(always)]
pub fn mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = x * X_TO_LON_FACTOR;
    let lat =
        (std::f64::consts::PI / 2.0 - 2.0 * ((-y * Y_TO_LAT_FACTOR).exp()).atan()).to_degrees();
    (lon, lat)
}

#[inline]
pub fn meters_to_kilometers(meters: f64) -> f64 {
    meters / 1000.0
}

#[inline]
pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

/// Format a distance as a human-readable string (meters below 1 km)
pub fn format_distance(meters: f64) -> String {
    let km = meters_to_kilometers(meters);
    if km < 1.0 {
        format!("{:.0} m", meters)
    } else if km < 100.0 {
        format!("{:.2} km", km)
    } else {
        format!("{:.0} km", km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_to_mercator_origin() {
        let (x, y) = wgs84_to_mercator(0.0, 0.0);
        assert!(x.abs() < 0.01);
        assert!(y.abs() < 0.01);
    }

    #[test]
    fn test_wgs84_to_mercator_bounds() {
        let (west, _) = wgs84_to_mercator(-180.0, 0.0);
        assert!((west + EARTH_MERCATOR_MAX).abs() < 1.0);

        let (east, _) = wgs84_to_mercator(180.0, 0.0);
        assert!((east - EARTH_MERCATOR_MAX).abs() < 1.0);
    }

    #[test]
    fn test_mercator_to_wgs84_inverse() {
        let (lon, lat) = (-121.961, 37.55);

        let (x, y) = wgs84_to_mercator(lon, lat);
        let (lon2, lat2) = mercator_to_wgs84(x, y);

        assert!((lat - lat2).abs() < 1e-9);
        assert!((lon - lon2).abs() < 1e-9);
    }

    #[test]
    fn test_polar_latitude_is_clamped() {
        let (_, y) = wgs84_to_mercator(0.0, 90.0);
        assert!(y.is_finite());
        assert!((y - EARTH_MERCATOR_MAX).abs() < 1.0);
    }

    #[test]
    fn test_unit_conversions() {
        assert!((meters_to_kilometers(1500.0) - 1.5).abs() < f64::EPSILON);
        assert!((meters_to_miles(METERS_PER_MILE * 2.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(111.2), "111 m");
        assert_eq!(format_distance(12_346.0), "12.35 km");
        assert_eq!(format_distance(250_000.0), "250 km");
    }
}
