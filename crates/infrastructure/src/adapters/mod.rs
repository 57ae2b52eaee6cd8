//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod place_finder_adapter;
mod route_planner_adapter;
mod simulated_location;
mod tracing_map;

pub use place_finder_adapter::PlaceFinderAdapter;
pub use route_planner_adapter::RoutePlannerAdapter;
pub use simulated_location::SimulatedLocationProvider;
pub use tracing_map::{MapOverlay, TracingMapRenderer};

use application::error::ApplicationError;
use domain::DomainError;
use integration_osm::OsmError;

/// Convert an OSM client error into the application error a session records
fn map_osm_error(context: &str, err: OsmError) -> ApplicationError {
    match err {
        OsmError::InvalidRequest(reason) => {
            ApplicationError::Domain(DomainError::ValidationError(reason))
        },
        other => ApplicationError::ExternalService(format!("{context}: {other}")),
    }
}
