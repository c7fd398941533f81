//! Read-only view of a ledger handed to whoever displays it

use crate::{GeoPoint, PathNode, utils};

/// Points, per-point distances, total distance and cursor at one instant
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedgerSnapshot {
    pub nodes: Vec<PathNode>,
    /// Total distance in meters
    pub total_distance: f64,
    pub cursor: Option<usize>,
}

impl LedgerSnapshot {
    pub fn points(&self) -> impl ExactSizeIterator<Item = GeoPoint> + '_ {
        self.nodes.iter().map(|node| node.point)
    }

    #[inline]
    pub fn total_distance_kilometers(&self) -> f64 {
        utils::meters_to_kilometers(self.total_distance)
    }

    #[inline]
    pub fn total_distance_miles(&self) -> f64 {
        utils::meters_to_miles(self.total_distance)
    }

    /// The selected node, if any
    pub fn selected(&self) -> Option<&PathNode> {
        self.nodes.get(self.cursor?)
    }
}
