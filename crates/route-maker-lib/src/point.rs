//! Geographic points and path nodes
//!
//! [`GeoPoint`] is the coordinate value handed in by whatever is driving the
//! editor. [`PathNode`] is the element type of a
//! [`PathLedger`](crate::PathLedger): a point plus the distances derived
//! from its position in the path.

use crate::utils;

/// A WGS84 coordinate in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Build a point from Web Mercator meters (EPSG:3857)
    ///
    /// Map layers usually work in projected coordinates; the ledger always
    /// stores degrees.
    #[inline]
    pub fn from_mercator(x: f64, y: f64) -> Self {
        let (lon, lat) = utils::mercator_to_wgs84(x, y);
        Self { lon, lat }
    }

    /// Project to Web Mercator meters as `(x, y)`
    #[inline]
    pub fn to_mercator(self) -> (f64, f64) {
        utils::wgs84_to_mercator(self.lon, self.lat)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.x(), point.y())
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.lon, point.lat)
    }
}

impl From<(f64, f64)> for GeoPoint {
    /// `(lon, lat)`
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::new(lon, lat)
    }
}

/// A point of the path with its derived distances, in meters
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    pub point: GeoPoint,
    /// Distance to the previous node (0 for the head)
    pub distance_from_previous: f64,
    /// Distance walked from the head up to this node (0 for the head)
    pub cumulative_distance: f64,
}

impl PathNode {
    /// A node with no distances yet; the ledger fills them in.
    #[inline]
    pub(crate) fn detached(point: GeoPoint) -> Self {
        Self {
            point,
            distance_from_previous: 0.0,
            cumulative_distance: 0.0,
        }
    }
}
