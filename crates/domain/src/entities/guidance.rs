//! Live guidance snapshot derived from a route and a position

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Coordinate;

/// The "next instruction + distance" for the current position
///
/// Recomputed on every position update; never persisted. An empty state
/// means no maneuver could be selected and is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuidanceState {
    /// Index into the route's steps of the selected maneuver
    pub next_step_index: Option<usize>,
    /// Rounded distance from the position to the maneuver in meters
    pub distance_to_maneuver_meters: Option<f64>,
    /// Human-readable instruction
    pub text: Option<String>,
    /// Where the selected maneuver takes place
    pub maneuver_location: Option<Coordinate>,
}

impl GuidanceState {
    /// State with no selected maneuver
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether a maneuver was selected
    #[must_use]
    pub const fn has_maneuver(&self) -> bool {
        self.next_step_index.is_some()
    }
}

impl fmt::Display for GuidanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.text, self.distance_to_maneuver_meters) {
            (Some(text), Some(meters)) => write!(f, "In {meters:.0} m: {text}"),
            (Some(text), None) => write!(f, "{text}"),
            _ => write!(f, "No upcoming maneuver"),
        }
    }
}
