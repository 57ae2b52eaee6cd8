//! Cancellable subscription to continuous position updates
//!
//! Wraps a platform watch started through [`LocationPort::watch_position`]
//! and the channel it delivers into. Stopping is idempotent and synchronous:
//! once [`PositionWatch::stop`] returns, the platform watch is cleared, the
//! channel is closed and every buffered event has been discarded, so no
//! further event can be observed. Dropping the handle stops it.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::ports::{LocationError, LocationPort, PositionEvent, WatchId};

/// Handle for one active platform position watch
pub struct PositionWatch {
    id: WatchId,
    location: Arc<dyn LocationPort>,
    receiver: mpsc::UnboundedReceiver<PositionEvent>,
    active: bool,
}

impl fmt::Debug for PositionWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionWatch")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl PositionWatch {
    /// Start a platform watch
    ///
    /// # Errors
    ///
    /// Returns the platform error if the watch cannot be started.
    pub fn start(location: Arc<dyn LocationPort>) -> Result<Self, LocationError> {
        let (sink, receiver) = mpsc::unbounded_channel();
        let id = location.watch_position(sink)?;
        info!(watch_id = id.0, "Position watch started");

        Ok(Self {
            id,
            location,
            receiver,
            active: true,
        })
    }

    /// Platform id of this watch
    #[must_use]
    pub const fn id(&self) -> WatchId {
        self.id
    }

    /// Whether the watch has neither been stopped nor ended by the platform
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Wait for the next event; `None` once stopped or when the platform ends the stream
    ///
    /// An ended stream stops the watch.
    pub async fn recv(&mut self) -> Option<PositionEvent> {
        if !self.active {
            return None;
        }
        let event = self.receiver.recv().await;
        if event.is_none() {
            debug!(watch_id = self.id.0, "Platform ended the position stream");
            self.stop();
        }
        event
    }

    /// Take an already delivered event without waiting
    pub fn try_recv(&mut self) -> Option<PositionEvent> {
        if !self.active {
            return None;
        }
        self.receiver.try_recv().ok()
    }

    /// Stop the watch; calling it again is a no-op
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.location.clear_watch(self.id);
        self.receiver.close();

        let mut discarded = 0_usize;
        while self.receiver.try_recv().is_ok() {
            discarded += 1;
        }
        debug!(discarded, "Discarded queued position events");
        info!(watch_id = self.id.0, "Position watch stopped");
    }
}

impl Drop for PositionWatch {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLocation;
    use domain::Coordinate;

    #[tokio::test]
    async fn delivers_events_in_order() {
        let location = Arc::new(FakeLocation::with_fix(Coordinate::new(1.0, 1.0)));
        let mut watch = PositionWatch::start(location.clone()).unwrap();

        location.emit(&Ok(Coordinate::new(1.0, 1.0)));
        location.emit(&Err(LocationError::Timeout));
        location.emit(&Ok(Coordinate::new(2.0, 2.0)));

        assert_eq!(watch.recv().await, Some(Ok(Coordinate::new(1.0, 1.0))));
        assert_eq!(watch.recv().await, Some(Err(LocationError::Timeout)));
        assert_eq!(watch.recv().await, Some(Ok(Coordinate::new(2.0, 2.0))));
    }

    #[tokio::test]
    async fn stop_clears_platform_watch_and_queued_events() {
        let location = Arc::new(FakeLocation::with_fix(Coordinate::new(1.0, 1.0)));
        let mut watch = PositionWatch::start(location.clone()).unwrap();
        assert_eq!(location.active_watches(), 1);

        location.emit(&Ok(Coordinate::new(3.0, 3.0)));
        watch.stop();

        assert_eq!(location.active_watches(), 0);
        assert!(!watch.is_active());
        assert!(watch.try_recv().is_none());
        assert!(watch.recv().await.is_none());
        assert_eq!(location.emit(&Ok(Coordinate::new(4.0, 4.0))), 0);
    }

    #[tokio::test]
    async fn ended_stream_deactivates_watch() {
        let location = Arc::new(FakeLocation::with_fix(Coordinate::new(1.0, 1.0)));
        let mut watch = PositionWatch::start(location.clone()).unwrap();

        location.emit(&Ok(Coordinate::new(5.0, 5.0)));
        location.end_streams();

        assert!(watch.is_active());
        assert_eq!(watch.recv().await, Some(Ok(Coordinate::new(5.0, 5.0))));
        assert!(watch.recv().await.is_none());
        assert!(!watch.is_active());
        assert!(watch.recv().await.is_none());
    }

    #[test]
    fn stop_is_idempotent() {
        let location = Arc::new(FakeLocation::with_fix(Coordinate::new(1.0, 1.0)));
        let mut watch = PositionWatch::start(location.clone()).unwrap();
        watch.stop();
        watch.stop();
        assert_eq!(location.active_watches(), 0);
    }

    #[test]
    fn drop_stops_watch() {
        let location = Arc::new(FakeLocation::with_fix(Coordinate::new(1.0, 1.0)));
        {
            let _watch = PositionWatch::start(location.clone()).unwrap();
            assert_eq!(location.active_watches(), 1);
        }
        assert_eq!(location.active_watches(), 0);
    }
}
