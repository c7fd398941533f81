//! Editing session: a ledger, its name, and whoever is watching it
//!
//! The session is what a map front end talks to. It forwards gestures to the
//! [`PathLedger`], pushes a fresh [`LedgerSnapshot`] to every registered
//! [`SnapshotObserver`] after each change, and makes GPX import
//! all-or-nothing.

use crate::{
    Config, ExportError, ExportOptions, GeoPoint, ImportError, LedgerSnapshot, PathLedger,
    TrackCodec,
};

/// Receives the ledger state after every change
pub trait SnapshotObserver {
    fn on_update(&mut self, snapshot: &LedgerSnapshot);
}

impl<F> SnapshotObserver for F
where
    F: FnMut(&LedgerSnapshot),
{
    fn on_update(&mut self, snapshot: &LedgerSnapshot) {
        (self)(snapshot)
    }
}

/// State restored when an import fails
struct Checkpoint {
    ledger: PathLedger,
    name: String,
}

pub struct EditSession {
    ledger: PathLedger,
    name: String,
    codec: TrackCodec,
    observers: Vec<Box<dyn SnapshotObserver>>,
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("ledger", &self.ledger)
            .field("name", &self.name)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl EditSession {
    pub fn new(config: Config) -> Self {
        Self {
            ledger: PathLedger::new(config.distance_model),
            name: config.default_track_name,
            codec: TrackCodec::new(config.distance_model),
            observers: Vec::new(),
        }
    }

    #[inline]
    pub fn ledger(&self) -> &PathLedger {
        &self.ledger
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    #[inline]
    pub fn total_distance_kilometers(&self) -> f64 {
        self.ledger.total_distance_kilometers()
    }

    #[inline]
    pub fn total_distance_miles(&self) -> f64 {
        self.ledger.total_distance_miles()
    }

    /// Register an observer; it is not called until the next change
    pub fn subscribe(&mut self, observer: impl SnapshotObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn insert(&mut self, point: GeoPoint) -> usize {
        let index = self.ledger.insert(point);
        self.notify();
        index
    }

    pub fn remove_at_cursor(&mut self) {
        if self.ledger.remove_at_cursor().is_some() {
            self.notify();
        }
    }

    pub fn begin_drag(&mut self, index: usize) -> bool {
        let started = self.ledger.begin_drag(index);
        if started {
            self.notify();
        }
        started
    }

    pub fn move_to(&mut self, point: GeoPoint) {
        self.ledger.move_to(point);
        self.notify();
    }

    pub fn end_drag(&mut self) {
        self.ledger.end_drag();
    }

    pub fn reverse(&mut self) {
        self.ledger.reverse();
        self.notify();
    }

    pub fn select_nearest(&mut self, index: usize) -> bool {
        let selected = self.ledger.select_nearest(index);
        if selected {
            self.notify();
        }
        selected
    }

    /// Drop every point, keeping the name
    pub fn clear(&mut self) {
        self.ledger.clear();
        self.notify();
    }

    /// Replace the path (and its name, when the document has one) with the
    /// contents of a GPX document
    ///
    /// On failure the session is left exactly as it was before the call.
    pub fn import(&mut self, text: &str) -> Result<(), ImportError> {
        let checkpoint = self.checkpoint();

        match self.codec.decode_into(text.as_bytes(), &mut self.ledger) {
            Ok(name) => {
                if let Some(name) = name {
                    self.name = name;
                }
                tracing::info!(
                    "Imported {:?}: {} points, {:.2} km",
                    self.name,
                    self.ledger.len(),
                    self.ledger.total_distance_kilometers()
                );
                self.notify();
                Ok(())
            }
            Err(e) => {
                self.restore(checkpoint);
                tracing::warn!("Import failed, previous path kept: {}", e);
                Err(e)
            }
        }
    }

    /// Export under the session name
    pub fn export(&self, synthetic_timestamps: bool) -> Result<String, ExportError> {
        let mut options = ExportOptions::new(self.name.clone());
        if synthetic_timestamps {
            options = options.with_synthetic_timestamps(None);
        }
        self.export_with(&options)
    }

    pub fn export_with(&self, options: &ExportOptions) -> Result<String, ExportError> {
        self.codec.encode(&self.ledger, options)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            ledger: self.ledger.clone(),
            name: self.name.clone(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.ledger = checkpoint.ledger;
        self.name = checkpoint.name;
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.ledger.snapshot();
        for observer in &mut self.observers {
            observer.on_update(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DistanceModel;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session_with_points() -> EditSession {
        let mut session = EditSession::default();
        session.insert(GeoPoint::new(0.0, 0.0));
        session.insert(GeoPoint::new(0.0, 0.001));
        session.insert(GeoPoint::new(0.001, 0.001));
        session.set_name("Before");
        session
    }

    fn recorder(session: &mut EditSession) -> Rc<RefCell<Vec<LedgerSnapshot>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(move |snapshot: &LedgerSnapshot| sink.borrow_mut().push(snapshot.clone()));
        seen
    }

    #[test]
    fn test_new_session_uses_config() {
        let session = EditSession::new(Config {
            distance_model: DistanceModel::Geodesic,
            default_track_name: "Patch".to_string(),
        });

        assert_eq!(session.name(), "Patch");
        assert_eq!(session.ledger().distance_model(), DistanceModel::Geodesic);
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_observers_see_every_change() {
        let mut session = EditSession::default();
        let seen = recorder(&mut session);

        session.insert(GeoPoint::new(0.0, 0.0));
        session.insert(GeoPoint::new(0.0, 0.001));
        session.begin_drag(1);
        session.move_to(GeoPoint::new(0.0, 0.002));
        session.end_drag();
        session.reverse();
        session.remove_at_cursor();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[1].nodes.len(), 2);
        assert!((seen[3].total_distance - 222.4).abs() < 0.1);
        assert_eq!(seen.last(), Some(&session.snapshot()));
    }

    #[test]
    fn test_noops_do_not_notify() {
        let mut session = EditSession::default();
        let seen = recorder(&mut session);

        session.remove_at_cursor();
        assert!(!session.select_nearest(0));

        assert!(seen.borrow().is_empty());
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_ignored_drag_does_not_notify() {
        let mut session = session_with_points();
        let seen = recorder(&mut session);

        assert!(!session.begin_drag(3));

        assert!(!session.ledger().is_dragging());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_failed_import_rolls_back() {
        let mut session = session_with_points();
        session.select_nearest(1);
        let before = session.snapshot();
        let seen = recorder(&mut session);

        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><name>After</name><trkseg>
    <trkpt lat="10" lon="10"/>
    <trkpt lat="10.5" lon="not-a-number"/>
  </trkseg></trk>
</gpx>"#;
        let result = session.import(text);

        assert!(matches!(result, Err(ImportError::Gpx(_))));
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.name(), "Before");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_import_with_unusable_coordinate_rolls_back() {
        let mut session = session_with_points();
        let before = session.snapshot();

        // The gpx reader rejects the NaN latitude
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><trkseg>
    <trkpt lat="10" lon="10"/>
    <trkpt lat="NaN" lon="10"/>
  </trkseg></trk>
</gpx>"#;

        assert!(matches!(session.import(text), Err(ImportError::Gpx(_))));
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.name(), "Before");
    }

    #[test]
    fn test_import_without_track_rolls_back() {
        let mut session = session_with_points();
        let before = session.snapshot();

        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"><metadata><name>After</name></metadata></gpx>"#;

        assert!(matches!(session.import(text), Err(ImportError::MissingTrack)));
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.name(), "Before");
    }

    #[test]
    fn test_import_replaces_path_and_name() {
        let mut source = session_with_points();
        source.set_name("Shared");
        let text = source.export(false).unwrap();

        let mut session = EditSession::default();
        session.insert(GeoPoint::new(50.0, 50.0));
        let seen = recorder(&mut session);

        session.import(&text).unwrap();

        assert_eq!(session.name(), "Shared");
        assert_eq!(session.ledger().len(), 3);
        assert!((session.ledger().total_distance() - source.ledger().total_distance()).abs() < 1e-6);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_import_keeps_name_when_document_has_none() {
        let mut session = session_with_points();
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"><trk><trkseg><trkpt lat="1" lon="1"/></trkseg></trk></gpx>"#;

        session.import(text).unwrap();

        assert_eq!(session.name(), "Before");
        assert_eq!(session.ledger().len(), 1);
    }

    #[test]
    fn test_export_uses_session_name() {
        let session = session_with_points();

        let text = session.export(true).unwrap();
        let gpx = gpx::read(text.as_bytes()).unwrap();

        assert_eq!(gpx.tracks[0].name.as_deref(), Some("Before"));
        assert!(gpx.tracks[0].segments[0].points.iter().all(|p| p.time.is_some()));
    }

    #[test]
    fn test_clear_keeps_name() {
        let mut session = session_with_points();
        session.clear();
        assert!(session.snapshot().nodes.is_empty());
        assert_eq!(session.name(), "Before");
        assert_eq!(session.total_distance_miles(), 0.0);
    }
}
