//! Externally visible tour state and its transitions
//!
//! [`TourState`] holds everything the UI renders: the current coordinate,
//! the selected category, the nearby places, the active route and the live
//! guidance. It performs no I/O; asynchronous work happens between a
//! `begin_*` call, which hands out a request tagged with a generation, and
//! the matching `apply_*` call. Responses whose generation is no longer the
//! latest are discarded, so a slow response can never overwrite the result
//! of a newer request.

use domain::{Coordinate, GuidanceState, Place, Route, TravelMode};
use tracing::{debug, warn};

use crate::error::ApplicationError;

/// Parameters of an outstanding nearby search
#[derive(Debug, Clone, PartialEq)]
pub struct PlacesRequest {
    /// Request generation
    pub generation: u64,
    /// Search center
    pub center: Coordinate,
    /// Category to search for
    pub category: String,
    /// Search radius in meters
    pub radius_meters: u32,
}

/// Parameters of an outstanding route request
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Request generation
    pub generation: u64,
    /// Start of the route
    pub origin: Coordinate,
    /// End of the route
    pub destination: Coordinate,
    /// Travel mode
    pub mode: TravelMode,
}

/// What happened to a response handed to an `apply_*` transition
#[derive(Debug)]
pub enum ApplyOutcome {
    /// State replaced with the response
    Applied,
    /// Request failed; prior state kept, user-facing message recorded
    Failed(ApplicationError),
    /// A newer request was issued meanwhile; response ignored
    Stale,
}

/// Session state shown to the user
#[derive(Debug, Clone, Default)]
pub struct TourState {
    current: Option<Coordinate>,
    category: String,
    places: Vec<Place>,
    route: Option<Route>,
    guidance: Option<GuidanceState>,
    last_error: Option<String>,
    places_generation: u64,
    route_generation: u64,
}

impl TourState {
    /// Create an empty state with a selected category
    #[must_use]
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// Last known position
    #[must_use]
    pub const fn current(&self) -> Option<Coordinate> {
        self.current
    }

    /// Selected POI category
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Nearby places, nearest first
    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Active route
    #[must_use]
    pub const fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Live guidance for the active route
    #[must_use]
    pub const fn guidance(&self) -> Option<&GuidanceState> {
        self.guidance.as_ref()
    }

    /// User-facing message of the most recent failure
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Record a new position
    pub fn set_current(&mut self, position: Coordinate) {
        self.current = Some(position);
    }

    /// Select the category used by the next search
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Store a user-facing failure message
    pub fn record_error(&mut self, error: &ApplicationError) {
        self.last_error = Some(error.user_message());
    }

    /// Replace the live guidance
    pub fn set_guidance(&mut self, guidance: Option<GuidanceState>) {
        self.guidance = guidance;
    }

    /// Start a nearby search around the current position
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no position is known yet.
    pub fn begin_places_request(
        &mut self,
        radius_meters: u32,
    ) -> Result<PlacesRequest, ApplicationError> {
        let center = self.current.ok_or_else(|| {
            ApplicationError::InvalidState("Current location is not known yet".to_string())
        })?;
        if self.category.is_empty() {
            return Err(ApplicationError::InvalidState(
                "No place category selected".to_string(),
            ));
        }

        self.places_generation += 1;
        Ok(PlacesRequest {
            generation: self.places_generation,
            center,
            category: self.category.clone(),
            radius_meters,
        })
    }

    /// Apply the response of a nearby search
    pub fn apply_places(
        &mut self,
        generation: u64,
        result: Result<Vec<Place>, ApplicationError>,
    ) -> ApplyOutcome {
        if generation != self.places_generation {
            debug!(generation, latest = self.places_generation, "Discarding stale places response");
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(places) => {
                self.places = places;
                self.last_error = None;
                ApplyOutcome::Applied
            },
            Err(e) => {
                warn!(error = %e, "Nearby search failed, keeping previous places");
                self.record_error(&e);
                ApplyOutcome::Failed(e)
            },
        }
    }

    /// Start a route request from the current position
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no position is known yet.
    pub fn begin_route_request(
        &mut self,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteRequest, ApplicationError> {
        let origin = self.current.ok_or_else(|| {
            ApplicationError::InvalidState("Current location is not known yet".to_string())
        })?;

        self.route_generation += 1;
        Ok(RouteRequest {
            generation: self.route_generation,
            origin,
            destination,
            mode,
        })
    }

    /// Apply the response of a route request
    ///
    /// A successful response replaces the route wholesale and resets guidance.
    pub fn apply_route(
        &mut self,
        generation: u64,
        result: Result<Route, ApplicationError>,
    ) -> ApplyOutcome {
        if generation != self.route_generation {
            debug!(generation, latest = self.route_generation, "Discarding stale route response");
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(route) => {
                self.route = Some(route);
                self.guidance = None;
                self.last_error = None;
                ApplyOutcome::Applied
            },
            Err(e) => {
                warn!(error = %e, "Route planning failed, keeping previous route");
                self.record_error(&e);
                ApplyOutcome::Failed(e)
            },
        }
    }

    /// Drop the route and guidance; in-flight route responses become stale
    pub fn clear_route(&mut self) {
        self.route = None;
        self.guidance = None;
        self.route_generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{DomainError, Maneuver, RouteStep};

    const HERE: Coordinate = Coordinate::new(40.0, -75.0);

    fn place(name: &str, meters: u32) -> Place {
        Place {
            distance_meters: Some(meters),
            ..Place::new(name, name, "restaurant", HERE)
        }
    }

    fn route(street: &str) -> Route {
        Route {
            steps: vec![RouteStep {
                street_name: street.to_string(),
                distance_meters: 10.0,
                duration_seconds: 8.0,
                maneuver: Some(Maneuver {
                    kind: Some("depart".to_string()),
                    modifier: None,
                    location: HERE,
                }),
            }],
            geometry: vec![HERE],
            distance_meters: 10.0,
            duration_seconds: 8.0,
            mode: TravelMode::Walking,
        }
    }

    fn located() -> TourState {
        let mut state = TourState::new("restaurant");
        state.set_current(HERE);
        state
    }

    #[test]
    fn places_request_needs_location() {
        let mut state = TourState::new("restaurant");
        assert!(matches!(
            state.begin_places_request(1500),
            Err(ApplicationError::InvalidState(_))
        ));
    }

    #[test]
    fn places_request_needs_category() {
        let mut state = TourState::new("");
        state.set_current(HERE);
        assert!(state.begin_places_request(1500).is_err());
    }

    #[test]
    fn places_replace_wholesale() {
        let mut state = located();
        let first = state.begin_places_request(1500).unwrap();
        assert_eq!(first.center, HERE);
        assert_eq!(first.category, "restaurant");
        state.apply_places(first.generation, Ok(vec![place("a", 1), place("b", 2)]));

        let second = state.begin_places_request(1500).unwrap();
        assert!(matches!(
            state.apply_places(second.generation, Ok(vec![place("c", 3)])),
            ApplyOutcome::Applied
        ));
        assert_eq!(state.places().len(), 1);
        assert_eq!(state.places()[0].name, "c");
    }

    #[test]
    fn failed_places_keep_previous_result() {
        let mut state = located();
        let first = state.begin_places_request(1500).unwrap();
        state.apply_places(first.generation, Ok(vec![place("kept", 1)]));

        let second = state.begin_places_request(1500).unwrap();
        let outcome = state.apply_places(
            second.generation,
            Err(ApplicationError::ExternalService("HTTP 504".to_string())),
        );
        assert!(matches!(
            outcome,
            ApplyOutcome::Failed(ApplicationError::ExternalService(_))
        ));
        assert_eq!(state.places()[0].name, "kept");
        assert!(state.last_error().is_some());
    }

    #[test]
    fn stale_places_response_is_discarded() {
        let mut state = located();
        let slow = state.begin_places_request(1500).unwrap();
        let fast = state.begin_places_request(1500).unwrap();

        state.apply_places(fast.generation, Ok(vec![place("fresh", 1)]));
        let outcome = state.apply_places(slow.generation, Ok(vec![place("old", 1)]));

        assert!(matches!(outcome, ApplyOutcome::Stale));
        assert_eq!(state.places()[0].name, "fresh");
    }

    #[test]
    fn route_replaces_and_resets_guidance() {
        let mut state = located();
        state.set_guidance(Some(GuidanceState::empty()));
        let request = state.begin_route_request(Coordinate::new(40.01, -75.01), TravelMode::Walking).unwrap();
        assert_eq!(request.origin, HERE);

        assert!(matches!(
            state.apply_route(request.generation, Ok(route("Main"))),
            ApplyOutcome::Applied
        ));
        assert_eq!(state.route().unwrap().steps[0].street_name, "Main");
        assert!(state.guidance().is_none());
    }

    #[test]
    fn failed_route_keeps_previous_route() {
        let mut state = located();
        let first = state.begin_route_request(HERE, TravelMode::Walking).unwrap();
        state.apply_route(first.generation, Ok(route("Main")));

        let second = state.begin_route_request(HERE, TravelMode::Driving).unwrap();
        let outcome = state.apply_route(
            second.generation,
            Err(ApplicationError::ExternalService("no route".to_string())),
        );
        assert!(matches!(outcome, ApplyOutcome::Failed(_)));
        assert_eq!(state.route().unwrap().steps[0].street_name, "Main");
    }

    #[test]
    fn clear_route_invalidates_in_flight_request() {
        let mut state = located();
        let request = state.begin_route_request(HERE, TravelMode::Walking).unwrap();
        state.clear_route();

        assert!(matches!(
            state.apply_route(request.generation, Ok(route("Late"))),
            ApplyOutcome::Stale
        ));
        assert!(state.route().is_none());
    }

    #[test]
    fn failure_keeps_original_error_variant() {
        let mut state = located();
        let request = state.begin_places_request(1500).unwrap();
        let outcome = state.apply_places(
            request.generation,
            Err(DomainError::ValidationError("Unsupported category: fast food".to_string()).into()),
        );

        let ApplyOutcome::Failed(err) = outcome else {
            panic!("expected a failed outcome");
        };
        assert!(matches!(err, ApplicationError::Domain(_)));
        assert!(state.last_error().unwrap().contains("Unsupported category"));
    }

    #[test]
    fn success_clears_last_error() {
        let mut state = located();
        state.record_error(&ApplicationError::ExternalService("x".to_string()));
        let request = state.begin_places_request(100).unwrap();
        state.apply_places(request.generation, Ok(vec![]));
        assert!(state.last_error().is_none());
    }
}
