//! Live turn-by-turn guidance
//!
//! The engine is a three-state machine:
//!
//! ```text
//! Idle --load_route--> Routed --sync(route has steps, position known)--> Guiding
//!   ^                                                                     |
//!   +--------------------- clear / empty replacement route ---------------+
//! ```
//!
//! While `Guiding` it owns exactly one [`PositionWatch`]. Every position fix
//! selects the maneuver nearest to the position (not progress along the
//! route, so a self-intersecting route can select an earlier maneuver) and
//! reports the rounded distance to it with an instruction text.
//!
//! All transitions take `&mut self`, so a route swap is always complete
//! before the next position event is handled.

use std::fmt;
use std::sync::Arc;

use domain::{Coordinate, GuidanceState, Route, RouteStep, distance};
use tracing::{debug, info, warn};

use crate::error::ApplicationError;
use crate::ports::{LocationPort, PositionEvent};
use crate::services::position_watch::PositionWatch;

/// Lifecycle phase of the guidance engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidancePhase {
    /// No route, no watch
    Idle,
    /// Route loaded, not watching yet
    Routed,
    /// Continuous position watch active
    Guiding,
}

impl fmt::Display for GuidancePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Routed => write!(f, "routed"),
            Self::Guiding => write!(f, "guiding"),
        }
    }
}

/// Select the nearest maneuver to `position` and describe it
///
/// Steps without a maneuver are skipped; ties go to the earlier step.
#[must_use]
pub fn compute_guidance(steps: &[RouteStep], position: Coordinate) -> GuidanceState {
    let nearest = steps
        .iter()
        .enumerate()
        .filter_map(|(index, step)| {
            step.maneuver
                .as_ref()
                .map(|m| (index, step, m.location, distance(position, m.location)))
        })
        .min_by(|a, b| a.3.total_cmp(&b.3));

    let Some((index, step, location, meters)) = nearest else {
        return GuidanceState::empty();
    };

    GuidanceState {
        next_step_index: Some(index),
        distance_to_maneuver_meters: Some(meters.round()),
        text: Some(step.instruction()),
        maneuver_location: Some(location),
    }
}

/// Stateful guidance over an active route
pub struct GuidanceEngine {
    location: Arc<dyn LocationPort>,
    phase: GuidancePhase,
    route: Option<Route>,
    watch: Option<PositionWatch>,
    last: Option<GuidanceState>,
}

impl fmt::Debug for GuidanceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuidanceEngine")
            .field("phase", &self.phase)
            .field("steps", &self.route.as_ref().map(|r| r.steps.len()))
            .field("watch", &self.watch)
            .finish_non_exhaustive()
    }
}

impl GuidanceEngine {
    /// Create an idle engine
    #[must_use]
    pub fn new(location: Arc<dyn LocationPort>) -> Self {
        Self {
            location,
            phase: GuidancePhase::Idle,
            route: None,
            watch: None,
            last: None,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> GuidancePhase {
        self.phase
    }

    /// Active route, if any
    #[must_use]
    pub const fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Guidance computed from the most recent fix
    #[must_use]
    pub const fn last_guidance(&self) -> Option<&GuidanceState> {
        self.last.as_ref()
    }

    /// Whether a position watch is running
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watch.as_ref().is_some_and(PositionWatch::is_active)
    }

    /// Replace the active route
    ///
    /// A replacement with steps keeps a running watch (`Guiding` stays
    /// `Guiding`); one without steps tears the watch down and can never
    /// reach `Guiding`.
    pub fn load_route(&mut self, route: Route) {
        let steps = route.steps.len();
        self.last = None;

        if route.has_steps() && self.phase == GuidancePhase::Guiding {
            self.route = Some(route);
            info!(steps, "Route replaced while guiding");
            return;
        }

        self.stop_watch();
        self.route = Some(route);
        self.phase = GuidancePhase::Routed;
        info!(steps, "Route loaded");
    }

    /// Enter `Guiding` once a route with steps and a position both exist
    ///
    /// Returns `true` if this call started guidance. Never starts a second
    /// watch.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses to start a watch; the engine
    /// then stays `Routed`.
    pub fn sync(&mut self, current: Option<Coordinate>) -> Result<bool, ApplicationError> {
        if self.phase != GuidancePhase::Routed {
            return Ok(false);
        }
        let has_steps = self.route.as_ref().is_some_and(Route::has_steps);
        if !has_steps || current.is_none() {
            return Ok(false);
        }

        if !self.is_watching() {
            self.watch = Some(PositionWatch::start(Arc::clone(&self.location))?);
        }
        self.phase = GuidancePhase::Guiding;
        info!("Guidance started");
        Ok(true)
    }

    /// Drop the route and stop watching
    pub fn clear(&mut self) {
        self.stop_watch();
        self.route = None;
        self.last = None;
        if self.phase != GuidancePhase::Idle {
            info!(from = %self.phase, "Guidance cleared");
        }
        self.phase = GuidancePhase::Idle;
    }

    /// Wait for the next event of the active watch
    ///
    /// Returns `None` immediately when no watch is running.
    pub async fn next_position(&mut self) -> Option<PositionEvent> {
        match self.watch.as_mut() {
            Some(watch) => watch.recv().await,
            None => None,
        }
    }

    /// Recompute guidance for one position event
    ///
    /// Only acts while `Guiding`. Errors are logged and leave the previous
    /// guidance in place.
    pub fn handle_position(&mut self, event: PositionEvent) -> Option<GuidanceState> {
        if self.phase != GuidancePhase::Guiding {
            debug!(phase = %self.phase, "Ignoring position event");
            return None;
        }

        let position = match event {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "Position update failed, keeping previous guidance");
                return None;
            },
        };

        let Some(route) = self.route.as_ref().filter(|r| r.has_steps()) else {
            self.clear();
            return None;
        };

        let state = compute_guidance(&route.steps, position);
        debug!(
            next_step = ?state.next_step_index,
            meters = ?state.distance_to_maneuver_meters,
            "Guidance updated"
        );
        self.last = Some(state.clone());
        Some(state)
    }

    fn stop_watch(&mut self) {
        if let Some(mut watch) = self.watch.take() {
            watch.stop();
        }
    }
}
