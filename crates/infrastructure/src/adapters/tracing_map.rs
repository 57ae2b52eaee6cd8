//! Headless map renderer
//!
//! Implements [`MapPort`] without a display: every draw command is logged
//! and the resulting overlay is kept so callers can inspect or print it.

use std::collections::HashMap;

use application::ports::{MapPort, MarkerId};
use domain::{Bounds, Coordinate};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Overlay state a renderer currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapOverlay {
    /// View center and zoom
    pub view: Option<(Coordinate, u8)>,
    /// Markers by identity, with position and label
    pub markers: HashMap<MarkerId, (Coordinate, String)>,
    /// Route polyline
    pub route: Vec<Coordinate>,
    /// Last viewport fit
    pub bounds: Option<Bounds>,
}

/// Map renderer that logs draw commands
#[derive(Debug, Default)]
pub struct TracingMapRenderer {
    overlay: Mutex<MapOverlay>,
}

impl TracingMapRenderer {
    /// Create a renderer with an empty overlay
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current overlay
    #[must_use]
    pub fn snapshot(&self) -> MapOverlay {
        self.overlay.lock().clone()
    }
}

impl MapPort for TracingMapRenderer {
    fn set_view(&self, center: Coordinate, zoom: u8) {
        info!(%center, zoom, "Map view set");
        self.overlay.lock().view = Some((center, zoom));
    }

    fn upsert_marker(&self, id: &MarkerId, at: Coordinate, label: &str) {
        debug!(marker = %id, %at, label, "Marker placed");
        self.overlay
            .lock()
            .markers
            .insert(id.clone(), (at, label.to_string()));
    }

    fn remove_marker(&self, id: &MarkerId) {
        if self.overlay.lock().markers.remove(id).is_some() {
            debug!(marker = %id, "Marker removed");
        }
    }

    fn draw_route(&self, path: &[Coordinate]) {
        info!(points = path.len(), "Route drawn");
        self.overlay.lock().route = path.to_vec();
    }

    fn clear_route(&self) {
        let mut overlay = self.overlay.lock();
        if !overlay.route.is_empty() {
            debug!("Route overlay cleared");
        }
        overlay.route.clear();
    }

    fn fit_bounds(&self, bounds: Bounds) {
        debug!(
            south_west = %bounds.south_west,
            north_east = %bounds.north_east,
            "Viewport fitted"
        );
        self.overlay.lock().bounds = Some(bounds);
    }
}
