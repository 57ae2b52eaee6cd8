//! Tour Guide session orchestration
//!
//! Turns user intents (locate me, find nearby, route to a place, clear the
//! route, free-text chat) into calls on the place finder, route planner and
//! guidance engine, and keeps the map collaborator in sync with the
//! resulting [`TourState`].
//!
//! Service calls are split in three steps so the session is never borrowed
//! while a request is in flight: `begin_*` tags the request and hands out a
//! pending request, its `fetch` awaits the service, and `finish_*` applies
//! the response. Position events, route clears and newer requests can be
//! handled between `begin_*` and `finish_*`; a response overtaken by any of
//! them is discarded. The plain `find_nearby` and `route_to` methods run all
//! three steps back to back.

use std::fmt;
use std::sync::Arc;

use domain::{Coordinate, GuidanceState, Place, Route, TravelMode};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{LocationPort, MapPort, MarkerId, PlaceFinderPort, PositionEvent, RoutePlannerPort};
use crate::services::guidance_engine::{GuidanceEngine, GuidancePhase};
use crate::services::place_intent::infer_place_intent;
use crate::services::tour_state::{ApplyOutcome, PlacesRequest, RouteRequest, TourState};

/// Tunables for a tour session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourSettings {
    /// Category searched before the user picks one
    pub default_category: String,
    /// Nearby search radius in meters
    pub search_radius_meters: u32,
    /// Travel mode for new routes
    pub travel_mode: TravelMode,
    /// Zoom level used when centering on the user
    pub map_zoom: u8,
}

impl Default for TourSettings {
    fn default() -> Self {
        Self {
            default_category: "attraction".to_string(),
            search_radius_meters: 1500,
            travel_mode: TravelMode::Walking,
            map_zoom: 15,
        }
    }
}

/// External collaborators a session talks to
#[derive(Clone)]
pub struct TourPorts {
    /// Nearby place search
    pub places: Arc<dyn PlaceFinderPort>,
    /// Route planning
    pub routes: Arc<dyn RoutePlannerPort>,
    /// Platform positioning
    pub location: Arc<dyn LocationPort>,
    /// Map renderer
    pub map: Arc<dyn MapPort>,
}

impl fmt::Debug for TourPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourPorts").finish_non_exhaustive()
    }
}

/// Result of processing one position event
#[derive(Debug, Clone, PartialEq)]
pub enum PumpOutcome {
    /// Guidance recomputed from a position fix
    Guidance(GuidanceState),
    /// Event consumed without new guidance; the watch keeps running
    Ignored,
    /// No watch is running or the platform ended the stream
    Ended,
}

/// Nearby search started by [`TourSession::begin_find_nearby`]
pub struct PendingPlaces {
    request: PlacesRequest,
    finder: Arc<dyn PlaceFinderPort>,
}

impl fmt::Debug for PendingPlaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingPlaces")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

impl PendingPlaces {
    /// Parameters sent to the place finder
    #[must_use]
    pub const fn request(&self) -> &PlacesRequest {
        &self.request
    }

    /// Run the search
    pub async fn fetch(self) -> PlacesResponse {
        let result = self
            .finder
            .find_nearby(
                self.request.center,
                &self.request.category,
                self.request.radius_meters,
            )
            .await;
        PlacesResponse {
            generation: self.request.generation,
            result,
        }
    }
}

/// Completed nearby search, applied with [`TourSession::finish_find_nearby`]
#[derive(Debug)]
pub struct PlacesResponse {
    generation: u64,
    result: Result<Vec<Place>, ApplicationError>,
}

/// Route request started by [`TourSession::begin_route_to`]
pub struct PendingRoute {
    request: RouteRequest,
    planner: Arc<dyn RoutePlannerPort>,
}

impl fmt::Debug for PendingRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRoute")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

impl PendingRoute {
    /// Parameters sent to the route planner
    #[must_use]
    pub const fn request(&self) -> &RouteRequest {
        &self.request
    }

    /// Plan the route
    pub async fn fetch(self) -> RouteResponse {
        let result = self
            .planner
            .plan(self.request.origin, self.request.destination, self.request.mode)
            .await;
        RouteResponse {
            generation: self.request.generation,
            result,
        }
    }
}

/// Completed route request, applied with [`TourSession::finish_route`]
#[derive(Debug)]
pub struct RouteResponse {
    generation: u64,
    result: Result<Route, ApplicationError>,
}

/// Coordinating state holder for the Tour Guide feature
#[derive(Debug)]
pub struct TourSession {
    state: TourState,
    engine: GuidanceEngine,
    ports: TourPorts,
    settings: TourSettings,
    place_markers: Vec<MarkerId>,
}

impl TourSession {
    /// Create a session with no position, places or route
    #[must_use]
    pub fn new(ports: TourPorts, settings: TourSettings) -> Self {
        Self {
            state: TourState::new(settings.default_category.clone()),
            engine: GuidanceEngine::new(Arc::clone(&ports.location)),
            ports,
            settings,
            place_markers: Vec::new(),
        }
    }

    /// Current externally visible state
    #[must_use]
    pub const fn state(&self) -> &TourState {
        &self.state
    }

    /// Phase of the guidance engine
    #[must_use]
    pub const fn guidance_phase(&self) -> GuidancePhase {
        self.engine.phase()
    }

    /// Session settings
    #[must_use]
    pub const fn settings(&self) -> &TourSettings {
        &self.settings
    }

    /// Select the category for the next nearby search
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.state.set_category(category);
    }

    /// Select the travel mode for the next route
    pub fn set_travel_mode(&mut self, mode: TravelMode) {
        self.settings.travel_mode = mode;
    }

    /// Acquire the position once, on first interest
    ///
    /// A known position is returned without asking the platform again.
    ///
    /// # Errors
    ///
    /// Returns the acquisition error; the session stays usable.
    #[instrument(skip(self))]
    pub async fn locate(&mut self) -> Result<Coordinate, ApplicationError> {
        if let Some(current) = self.state.current() {
            return Ok(current);
        }

        match self.ports.location.current_position().await {
            Ok(position) => {
                info!(%position, "Location acquired");
                self.state.set_current(position);
                self.ports.map.set_view(position, self.settings.map_zoom);
                self.ports.map.upsert_marker(&MarkerId::User, position, "You are here");
                self.start_guidance_if_ready();
                Ok(position)
            },
            Err(e) => {
                let err = ApplicationError::from(e);
                warn!(error = %err, "Location acquisition failed");
                self.state.record_error(&err);
                Err(err)
            },
        }
    }

    /// Search the selected category around the current position
    ///
    /// On success the places are replaced wholesale and their markers
    /// redrawn; on failure the previous places stay.
    ///
    /// # Errors
    ///
    /// Returns an error if no position can be acquired or the search fails.
    #[instrument(skip(self), fields(category = %self.state.category()))]
    pub async fn find_nearby(&mut self) -> Result<&[Place], ApplicationError> {
        self.locate().await?;
        let response = self.begin_find_nearby()?.fetch().await;
        self.finish_find_nearby(response)?;
        Ok(self.state.places())
    }

    /// Start a nearby search around the known position
    ///
    /// Any search started earlier becomes stale.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no position is known or no category is
    /// selected.
    pub fn begin_find_nearby(&mut self) -> Result<PendingPlaces, ApplicationError> {
        let request = self
            .state
            .begin_places_request(self.settings.search_radius_meters)?;
        debug!(generation = request.generation, category = %request.category, "Nearby search started");
        Ok(PendingPlaces {
            request,
            finder: Arc::clone(&self.ports.places),
        })
    }

    /// Apply a finished nearby search
    ///
    /// Returns `Ok(false)` when a newer search superseded this one.
    ///
    /// # Errors
    ///
    /// Returns the search error unchanged; the previous places stay.
    pub fn finish_find_nearby(&mut self, response: PlacesResponse) -> Result<bool, ApplicationError> {
        match self.state.apply_places(response.generation, response.result) {
            ApplyOutcome::Applied => {
                info!(count = self.state.places().len(), "Nearby places updated");
                self.refresh_place_markers();
                Ok(true)
            },
            ApplyOutcome::Failed(e) => Err(e),
            ApplyOutcome::Stale => Ok(false),
        }
    }

    /// Plan a route from the current position to a place
    ///
    /// # Errors
    ///
    /// Returns an error if no position is known or planning fails; any
    /// previously active route stays untouched.
    pub async fn route_to(&mut self, place: &Place) -> Result<&Route, ApplicationError> {
        self.route_to_coordinate(place.coordinate).await
    }

    /// Plan a route from the current position to a coordinate
    ///
    /// # Errors
    ///
    /// Returns an error if no position is known or planning fails.
    #[instrument(skip(self))]
    pub async fn route_to_coordinate(
        &mut self,
        destination: Coordinate,
    ) -> Result<&Route, ApplicationError> {
        self.locate().await?;
        let response = self.begin_route_to(destination)?.fetch().await;
        self.finish_route(response)?;

        self.state
            .route()
            .ok_or_else(|| ApplicationError::InvalidState("No route is active".to_string()))
    }

    /// Start a route request from the known position
    ///
    /// Any route request started earlier becomes stale, as does this one
    /// once the route is cleared.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no position is known.
    pub fn begin_route_to(&mut self, destination: Coordinate) -> Result<PendingRoute, ApplicationError> {
        let request = self
            .state
            .begin_route_request(destination, self.settings.travel_mode)?;
        debug!(generation = request.generation, to = %destination, "Route request started");
        Ok(PendingRoute {
            request,
            planner: Arc::clone(&self.ports.routes),
        })
    }

    /// Apply a finished route request
    ///
    /// A new route is drawn and handed to the guidance engine. Returns
    /// `Ok(false)` when the request was superseded or the route cleared
    /// meanwhile.
    ///
    /// # Errors
    ///
    /// Returns the planning error unchanged; the active route stays.
    pub fn finish_route(&mut self, response: RouteResponse) -> Result<bool, ApplicationError> {
        match self.state.apply_route(response.generation, response.result) {
            ApplyOutcome::Applied => {
                self.activate_route();
                Ok(true)
            },
            ApplyOutcome::Failed(e) => Err(e),
            ApplyOutcome::Stale => Ok(false),
        }
    }

    /// Stop guidance and remove the route overlays
    pub fn clear_route(&mut self) {
        self.engine.clear();
        self.state.clear_route();
        self.ports.map.clear_route();
        self.ports.map.remove_marker(&MarkerId::NextTurn);
        info!("Route cleared");
    }

    /// Wait for and process the next position event
    ///
    /// Only [`PumpOutcome::Ended`] means no further event will arrive; a
    /// failed fix is [`PumpOutcome::Ignored`] and guidance goes on.
    /// Cancel safe: dropping the future before it completes loses no event.
    pub async fn pump(&mut self) -> PumpOutcome {
        let Some(event) = self.engine.next_position().await else {
            return PumpOutcome::Ended;
        };
        self.apply_position(event)
            .map_or(PumpOutcome::Ignored, PumpOutcome::Guidance)
    }

    /// Process one position event from the watch
    pub fn apply_position(&mut self, event: PositionEvent) -> Option<GuidanceState> {
        if self.engine.phase() != GuidancePhase::Guiding {
            debug!("Position event outside guidance ignored");
            return None;
        }

        if let Ok(position) = &event {
            self.state.set_current(*position);
            self.ports.map.upsert_marker(&MarkerId::User, *position, "You are here");
        }

        let guidance = self.engine.handle_position(event)?;
        self.show_guidance(&guidance);
        self.state.set_guidance(Some(guidance.clone()));
        Some(guidance)
    }

    /// Answer a free-text request for nearby places
    ///
    /// Returns `None` when the text does not ask for a known kind of place.
    pub async fn handle_chat(
        &mut self,
        text: &str,
    ) -> Option<Result<&[Place], ApplicationError>> {
        let intent = infer_place_intent(text)?;
        info!(%intent, "Chat asks for nearby places");
        self.state.set_category(intent.category());
        Some(self.find_nearby().await)
    }

    /// Hand a freshly applied route to the engine and the map
    fn activate_route(&mut self) {
        let Some(route) = self.state.route().cloned() else {
            return;
        };

        self.ports.map.remove_marker(&MarkerId::NextTurn);
        self.ports.map.draw_route(&route.geometry);
        if let Some(bounds) = route.bounds() {
            self.ports.map.fit_bounds(bounds);
        }
        info!(summary = %route, "Route ready");

        self.engine.load_route(route);
        self.start_guidance_if_ready();
    }

    /// Move from `Routed` to `Guiding` and show guidance for the known position
    fn start_guidance_if_ready(&mut self) {
        let current = self.state.current();
        if let Err(e) = self.engine.sync(current) {
            warn!(error = %e, "Could not start live guidance");
            self.state.record_error(&e);
            return;
        }

        // Also covers a route swapped under a running watch
        if let Some(guidance) = current.and_then(|p| self.engine.handle_position(Ok(p))) {
            self.show_guidance(&guidance);
            self.state.set_guidance(Some(guidance));
        }
    }

    fn show_guidance(&self, guidance: &GuidanceState) {
        match (guidance.maneuver_location, guidance.text.as_deref()) {
            (Some(location), Some(text)) => {
                self.ports.map.upsert_marker(&MarkerId::NextTurn, location, text);
            },
            _ => self.ports.map.remove_marker(&MarkerId::NextTurn),
        }
    }

    fn refresh_place_markers(&mut self) {
        for marker in self.place_markers.drain(..) {
            self.ports.map.remove_marker(&marker);
        }
        for place in self.state.places() {
            let marker = MarkerId::Place(place.id.clone());
            self.ports.map.upsert_marker(&marker, place.coordinate, &place.name);
            self.place_markers.push(marker);
        }
    }
}
