//! Distance between two geographic points

use crate::GeoPoint;
use geo::{Distance, Geodesic, Haversine};

/// How the ledger measures the distance between two neighboring nodes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceModel {
    /// Great-circle distance on a sphere (fast, ~0.5% error)
    #[default]
    Haversine,
    /// Karney's geodesic on the WGS84 ellipsoid
    Geodesic,
}

impl DistanceModel {
    /// Distance between `a` and `b` in meters
    #[inline]
    pub fn distance(self, a: GeoPoint, b: GeoPoint) -> f64 {
        let a: geo::Point<f64> = a.into();
        let b: geo::Point<f64> = b.into();
        match self {
            Self::Haversine => Haversine.distance(a, b),
            Self::Geodesic => Geodesic.distance(a, b),
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Haversine, Self::Geodesic]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Haversine => "haversine",
            Self::Geodesic => "geodesic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousandth_of_a_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 0.001);

        let d = DistanceModel::Haversine.distance(a, b);
        assert!((d - 111.2).abs() < 0.1, "got {d}");

        // The ellipsoid is flatter at the equator, so this is a bit shorter
        let d = DistanceModel::Geodesic.distance(a, b);
        assert!((d - 110.6).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let a = GeoPoint::new(-0.1278, 51.5074);
        let b = GeoPoint::new(2.3522, 48.8566);

        for model in DistanceModel::all() {
            assert_eq!(model.distance(a, a), 0.0);
            let ab = model.distance(a, b);
            let ba = model.distance(b, a);
            assert!((ab - ba).abs() < 1e-6);
            // London to Paris is roughly 340 km
            assert!(ab > 330_000.0 && ab < 350_000.0, "{}: {ab}", model.name());
        }
    }
}
