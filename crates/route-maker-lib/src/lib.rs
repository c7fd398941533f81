//! Route Maker Library - Editable GPS paths
//!
//! This library holds the data side of an interactive route editor: an ordered
//! path of points that keeps per-segment and cumulative distances up to date
//! while it is edited, and GPX import/export of that path. Drawing the path,
//! hit-testing clicks and map projections belong to whatever front end drives
//! it.
//!
//! # Architecture
//!
//! - **[`GeoPoint`]** / **[`PathNode`]**: a coordinate, and a coordinate with its distances
//! - **[`DistanceModel`]**: how the distance between two points is measured
//! - **[`PathLedger`]**: the editable path (insert, remove, drag, reverse)
//! - **[`LedgerSnapshot`]**: read-only copy of a ledger for display
//! - **[`TrackCodec`]**: GPX decoding/encoding
//! - **[`EditSession`]**: ledger + name + observers, with all-or-nothing import
//!
//! # Performance Characteristics
//!
//! - **Insert/Remove**: one or two distance measurements, O(N - i) cumulative pass
//! - **Drag**: two distance measurements, O(N - i) cumulative pass
//! - **Reverse/Import**: O(N) measurements

mod codec;
mod distance;
mod ledger;
mod point;
mod session;
mod snapshot;
pub mod utils;

// Public API exports
pub use codec::{CREATOR, DecodedTrack, ExportOptions, SYNTHETIC_ACTIVITY_TYPE, TrackCodec};
pub use distance::DistanceModel;
pub use ledger::PathLedger;
pub use point::{GeoPoint, PathNode};
pub use session::{EditSession, SnapshotObserver};
pub use snapshot::LedgerSnapshot;

/// Settings for a new [`EditSession`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Distance model used for every measurement
    pub distance_model: DistanceModel,
    /// Track name until one is set or imported
    pub default_track_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distance_model: DistanceModel::default(),
            default_track_name: "Route".to_string(),
        }
    }
}

/// Reasons a GPX document can't be imported
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("GPX parsing error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("GPX document has no track")]
    MissingTrack,
}

/// Reasons a ledger can't be exported
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("GPX writing error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("GPX writer produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Timestamp for point {index} is out of range when starting at {start}")]
    TimestampOutOfRange {
        index: usize,
        start: time::OffsetDateTime,
    },
}

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
