//! In-memory port fakes for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use domain::{Bounds, Coordinate};
use parking_lot::Mutex;

use crate::ports::{
    LocationError, LocationPort, MapPort, MarkerId, PositionEvent, PositionSink, WatchId,
};

/// Location service whose watches are driven by the test
#[derive(Debug)]
pub struct FakeLocation {
    fix: Mutex<Result<Coordinate, LocationError>>,
    sinks: Mutex<HashMap<WatchId, PositionSink>>,
    next_id: AtomicU64,
    started: AtomicUsize,
}

impl FakeLocation {
    pub fn with_fix(fix: Coordinate) -> Self {
        Self::new(Ok(fix))
    }

    pub fn failing(err: LocationError) -> Self {
        Self::new(Err(err))
    }

    fn new(fix: Result<Coordinate, LocationError>) -> Self {
        Self {
            fix: Mutex::new(fix),
            sinks: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            started: AtomicUsize::new(0),
        }
    }

    pub fn set_fix(&self, fix: Result<Coordinate, LocationError>) {
        *self.fix.lock() = fix;
    }

    /// Push an event into every active watch, returns how many accepted it
    pub fn emit(&self, event: &PositionEvent) -> usize {
        self.sinks
            .lock()
            .values()
            .filter(|sink| sink.send(event.clone()).is_ok())
            .count()
    }

    /// End every watch stream the way a platform does when it stops reporting
    pub fn end_streams(&self) {
        self.sinks.lock().clear();
    }

    pub fn active_watches(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn watches_started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationPort for FakeLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        self.fix.lock().clone()
    }

    fn watch_position(&self, sink: PositionSink) -> Result<WatchId, LocationError> {
        let id = WatchId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.sinks.lock().insert(id, sink);
        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    fn clear_watch(&self, id: WatchId) {
        self.sinks.lock().remove(&id);
    }
}

/// Map that keeps the overlay state it was told to draw
#[derive(Debug, Default)]
pub struct RecordingMap {
    pub markers: Mutex<HashMap<MarkerId, (Coordinate, String)>>,
    pub route: Mutex<Option<Vec<Coordinate>>>,
    pub view: Mutex<Option<(Coordinate, u8)>>,
    pub fitted: Mutex<Vec<Bounds>>,
}

impl RecordingMap {
    pub fn marker(&self, id: &MarkerId) -> Option<(Coordinate, String)> {
        self.markers.lock().get(id).cloned()
    }

    pub fn place_marker_count(&self) -> usize {
        self.markers
            .lock()
            .keys()
            .filter(|id| matches!(id, MarkerId::Place(_)))
            .count()
    }
}

impl MapPort for RecordingMap {
    fn set_view(&self, center: Coordinate, zoom: u8) {
        *self.view.lock() = Some((center, zoom));
    }

    fn upsert_marker(&self, id: &MarkerId, at: Coordinate, label: &str) {
        self.markers.lock().insert(id.clone(), (at, label.to_string()));
    }

    fn remove_marker(&self, id: &MarkerId) {
        self.markers.lock().remove(id);
    }

    fn draw_route(&self, path: &[Coordinate]) {
        *self.route.lock() = Some(path.to_vec());
    }

    fn clear_route(&self) {
        *self.route.lock() = None;
    }

    fn fit_bounds(&self, bounds: Bounds) {
        self.fitted.lock().push(bounds);
    }
}
