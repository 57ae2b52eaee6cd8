//! Simulated location source
//!
//! Implements [`LocationPort`] by replaying a fixed track of coordinates.
//! Every watch runs its own tokio task that emits the next track point on
//! each tick of an interval and ends the stream after the last point.
//! Clearing a watch aborts its task.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use application::ports::{LocationError, LocationPort, PositionSink, WatchId};
use async_trait::async_trait;
use domain::Coordinate;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Location provider replaying a track at a fixed pace
pub struct SimulatedLocationProvider {
    track: Arc<RwLock<Vec<Coordinate>>>,
    last: Arc<Mutex<Option<Coordinate>>>,
    interval: Duration,
    watches: Mutex<HashMap<WatchId, JoinHandle<()>>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for SimulatedLocationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedLocationProvider")
            .field("points", &self.track.read().len())
            .field("interval", &self.interval)
            .field("watches", &self.watches.lock().len())
            .finish_non_exhaustive()
    }
}

impl SimulatedLocationProvider {
    /// Create a provider replaying `track`, one point per `interval`
    #[must_use]
    pub fn new(track: Vec<Coordinate>, interval: Duration) -> Self {
        Self {
            track: Arc::new(RwLock::new(track)),
            last: Arc::new(Mutex::new(None)),
            interval,
            watches: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a provider standing still at one coordinate
    #[must_use]
    pub fn fixed(at: Coordinate, interval: Duration) -> Self {
        Self::new(vec![at], interval)
    }

    /// Replace the track
    ///
    /// Running watches continue from their current index on the new track.
    pub fn set_track(&self, track: Vec<Coordinate>) {
        debug!(points = track.len(), "Simulated track replaced");
        *self.track.write() = track;
    }

    /// Number of running watches
    #[must_use]
    pub fn active_watches(&self) -> usize {
        self.watches
            .lock()
            .values()
            .filter(|task| !task.is_finished())
            .count()
    }
}

#[async_trait]
impl LocationPort for SimulatedLocationProvider {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        if let Some(last) = *self.last.lock() {
            return Ok(last);
        }
        self.track
            .read()
            .first()
            .copied()
            .ok_or_else(|| LocationError::Unavailable("simulated track is empty".to_string()))
    }

    fn watch_position(&self, sink: PositionSink) -> Result<WatchId, LocationError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        let id = WatchId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let track = Arc::clone(&self.track);
        let last = Arc::clone(&self.last);
        let period = self.interval;

        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            let mut index = 0_usize;
            loop {
                ticker.tick().await;
                let Some(point) = track.read().get(index).copied() else {
                    debug!(watch_id = id.0, "Simulated track finished");
                    break;
                };
                *last.lock() = Some(point);
                if sink.send(Ok(point)).is_err() {
                    break;
                }
                index += 1;
            }
        });

        self.watches.lock().insert(id, task);
        info!(watch_id = id.0, interval_ms = period.as_millis(), "Simulated watch started");
        Ok(id)
    }

    fn clear_watch(&self, id: WatchId) {
        if let Some(task) = self.watches.lock().remove(&id) {
            task.abort();
            info!(watch_id = id.0, "Simulated watch cleared");
        }
    }
}

impl Drop for SimulatedLocationProvider {
    fn drop(&mut self) {
        for (_, task) in self.watches.lock().drain() {
            task.abort();
        }
    }
}
