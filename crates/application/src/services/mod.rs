//! Application services - Use case implementations

mod guidance_engine;
mod place_intent;
mod position_watch;
mod tour_session;
mod tour_state;

pub use guidance_engine::{GuidanceEngine, GuidancePhase, compute_guidance};
pub use place_intent::{PlaceIntent, infer_place_intent};
pub use position_watch::PositionWatch;
pub use tour_session::{
    PendingPlaces, PendingRoute, PlacesResponse, PumpOutcome, RouteResponse, TourPorts,
    TourSession, TourSettings,
};
pub use tour_state::{ApplyOutcome, PlacesRequest, RouteRequest, TourState};
