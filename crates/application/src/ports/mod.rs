//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod location_port;
mod map_port;
mod place_finder_port;
mod route_planner_port;

#[cfg(test)]
pub use location_port::MockLocationPort;
pub use location_port::{LocationError, LocationPort, PositionEvent, PositionSink, WatchId};
#[cfg(test)]
pub use map_port::MockMapPort;
pub use map_port::{MapPort, MarkerId};
#[cfg(test)]
pub use place_finder_port::MockPlaceFinderPort;
pub use place_finder_port::PlaceFinderPort;
#[cfg(test)]
pub use route_planner_port::MockRoutePlannerPort;
pub use route_planner_port::RoutePlannerPort;
