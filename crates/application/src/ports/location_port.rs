//! Platform location service port
//!
//! Mirrors the platform's one-shot "get current position" and continuous
//! "watch position" calls. A watch delivers events into a channel sink and
//! is cancelled with [`LocationPort::clear_watch`] using the id returned at
//! start.

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors reported by the platform location service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user or platform denied location access
    #[error("permission denied")]
    PermissionDenied,

    /// Position temporarily unavailable
    #[error("position unavailable: {0}")]
    Unavailable(String),

    /// Platform timed out acquiring a fix
    #[error("timed out acquiring position")]
    Timeout,
}

/// One delivery from a position watch
pub type PositionEvent = Result<Coordinate, LocationError>;

/// Channel end a watch writes its events into
pub type PositionSink = mpsc::UnboundedSender<PositionEvent>;

/// Handle identifying an active platform watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// Port for platform positioning
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Acquire the current position once
    async fn current_position(&self) -> Result<Coordinate, LocationError>;

    /// Start a continuous watch delivering into `sink`
    fn watch_position(&self, sink: PositionSink) -> Result<WatchId, LocationError>;

    /// Stop a watch; unknown ids are ignored
    fn clear_watch(&self, id: WatchId);
}
