//! Domain entities - Places, routes and derived guidance

mod guidance;
mod place;
mod route;

pub use guidance::GuidanceState;
pub use place::{Place, rank_by_distance};
pub use route::{Maneuver, Route, RouteStep};
