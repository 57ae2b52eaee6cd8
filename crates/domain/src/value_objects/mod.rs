//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod travel_mode;

pub use coordinate::{Bounds, Coordinate, EARTH_RADIUS_METERS, distance};
pub use travel_mode::TravelMode;
