//! GPX import and export of a [`PathLedger`]
//!
//! Only the subset of GPX the editor produces is interpreted: the points of
//! the first `trk` (all of its `trkseg`s, in document order) and its name.
//! Everything else in an imported document is ignored.

use crate::{DistanceModel, ExportError, GeoPoint, ImportError, PathLedger};
use gpx::{Gpx, GpxVersion, Metadata, Track, TrackSegment, Waypoint};
use std::io::Read;
use time::{Duration, OffsetDateTime};

/// Written to the `creator` attribute of exported documents
pub const CREATOR: &str = "route-maker";

/// Activity type written alongside synthetic timestamps
pub const SYNTHETIC_ACTIVITY_TYPE: &str = "9";

/// Options for [`TrackCodec::encode`]
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    /// Track display name
    pub name: String,
    /// Fabricate a strictly increasing `time` per point (and the activity
    /// type some importers insist on) at a pace of at most 1 m/s
    ///
    /// This is a compatibility shim for consumers that reject tracks without
    /// timestamps, not a measurement.
    pub include_synthetic_timestamps: bool,
    /// First timestamp; the current time when `None`. Truncated to whole
    /// seconds either way.
    pub start_time: Option<OffsetDateTime>,
}

impl ExportOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            include_synthetic_timestamps: false,
            start_time: None,
        }
    }

    pub fn with_synthetic_timestamps(mut self, start_time: Option<OffsetDateTime>) -> Self {
        self.include_synthetic_timestamps = true;
        self.start_time = start_time;
        self
    }
}

/// A successfully imported track
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedTrack {
    /// Track name, falling back to the document name
    pub name: Option<String>,
    pub ledger: PathLedger,
}

/// Converts ledgers to and from GPX text
#[derive(Clone, Copy, Debug, Default)]
pub struct TrackCodec {
    /// Distance model of decoded ledgers
    model: DistanceModel,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl TrackCodec {
    pub fn new(model: DistanceModel) -> Self {
        Self { model }
    }

    /// Parse a GPX document into a fresh ledger
    ///
    /// The ledger is rebuilt by inserting the points one after the other, so
    /// its distances are the same as if the path had been drawn by hand.
    pub fn decode(&self, text: &str) -> Result<DecodedTrack, ImportError> {
        self.decode_from(text.as_bytes())
    }

    /// Same as [`TrackCodec::decode`], reading from any byte source
    pub fn decode_from<R: Read>(&self, reader: R) -> Result<DecodedTrack, ImportError> {
        let mut ledger = PathLedger::new(self.model);
        let name = self.decode_into(reader, &mut ledger)?;
        Ok(DecodedTrack { name, ledger })
    }

    /// Replace the contents of `ledger` with the first track of a GPX
    /// document, returning the track name
    ///
    /// The whole document is parsed before `ledger` is cleared, so on error
    /// `ledger` is left untouched.
    pub fn decode_into<R: Read>(
        &self,
        reader: R,
        ledger: &mut PathLedger,
    ) -> Result<Option<String>, ImportError> {
        #[cfg(feature = "profiling")]
        profiling::scope!("codec::decode");

        let gpx = gpx::read(reader)?;
        let track = gpx.tracks.first().ok_or(ImportError::MissingTrack)?;

        // The reader rejects non-finite and out-of-range coordinates, so
        // every point here is safe to insert
        let points = track
            .segments
            .iter()
            .flat_map(|segment| &segment.points)
            .map(|waypoint| GeoPoint::from(waypoint.point()));

        ledger.clear();
        for point in points {
            ledger.insert(point);
        }

        let name = track
            .name
            .clone()
            .or_else(|| gpx.metadata.and_then(|metadata| metadata.name));

        tracing::debug!(
            "Decoded track {:?} with {} points ({:.0} m)",
            name,
            ledger.len(),
            ledger.total_distance()
        );

        Ok(name)
    }

    /// Serialize `ledger` as a GPX 1.1 document
    pub fn encode(&self, ledger: &PathLedger, options: &ExportOptions) -> Result<String, ExportError> {
        #[cfg(feature = "profiling")]
        profiling::scope!("codec::encode");

        let mut segment = TrackSegment::new();
        segment.points = ledger
            .points()
            .map(|point| Waypoint::new(point.into()))
            .collect();

        let mut track = Track::new();
        track.name = Some(options.name.clone());

        let mut gpx = Gpx {
            version: GpxVersion::Gpx11,
            creator: Some(CREATOR.to_string()),
            ..Default::default()
        };

        if options.include_synthetic_timestamps {
            let start = whole_seconds(options.start_time.unwrap_or_else(OffsetDateTime::now_utc));
            gpx.metadata = Some(Metadata {
                time: Some(start.into()),
                ..Default::default()
            });
            track.type_ = Some(SYNTHETIC_ACTIVITY_TYPE.to_string());

            let times = synthetic_timestamps(ledger, start)?;
            for (waypoint, time) in segment.points.iter_mut().zip(times) {
                waypoint.time = Some(time.into());
            }
        }

        track.segments.push(segment);
        gpx.tracks.push(track);

        let mut buffer = Vec::new();
        gpx::write(&gpx, &mut buffer)?;
        let text = String::from_utf8(buffer)?;

        tracing::debug!(
            "Encoded {} points into {} bytes of GPX",
            ledger.len(),
            text.len()
        );

        Ok(text)
    }
}

/// One timestamp per node, advancing `ceil(distance_from_previous)` seconds
/// per node and at least one second so coincident points stay ordered
fn synthetic_timestamps(
    ledger: &PathLedger,
    start: OffsetDateTime,
) -> Result<Vec<OffsetDateTime>, ExportError> {
    let mut elapsed = 0i64;
    ledger
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            if index > 0 {
                elapsed =
                    elapsed.saturating_add((node.distance_from_previous.ceil() as i64).max(1));
            }
            start
                .checked_add(Duration::seconds(elapsed))
                .ok_or(ExportError::TimestampOutOfRange { index, start })
        })
        .collect()
}

fn whole_seconds(time: OffsetDateTime) -> OffsetDateTime {
    time.replace_nanosecond(0).unwrap_or(time)
}
