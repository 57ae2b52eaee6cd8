//! Planned route with turn-by-turn steps

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{Bounds, Coordinate, TravelMode};

/// A single turn/instruction point within a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    /// Maneuver type as reported by the routing service (`turn`, `depart`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Direction modifier (`left`, `slight right`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    /// Where the maneuver takes place
    pub location: Coordinate,
}

/// One step of a route, in direction of travel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Street the step travels along, empty when unnamed
    #[serde(default)]
    pub street_name: String,
    /// Step length in meters
    pub distance_meters: f64,
    /// Step duration in seconds
    pub duration_seconds: f64,
    /// Maneuver that starts this step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maneuver: Option<Maneuver>,
}

impl RouteStep {
    /// Human-readable instruction for this step
    ///
    /// `"<type or Proceed>[ <modifier>][ on <street>]"`
    #[must_use]
    pub fn instruction(&self) -> String {
        let maneuver = self.maneuver.as_ref();
        let mut text = maneuver
            .and_then(|m| m.kind.as_deref())
            .filter(|k| !k.is_empty())
            .unwrap_or("Proceed")
            .to_string();

        if let Some(modifier) = maneuver
            .and_then(|m| m.modifier.as_deref())
            .filter(|m| !m.is_empty())
        {
            text.push(' ');
            text.push_str(modifier);
        }

        if !self.street_name.is_empty() {
            text.push_str(" on ");
            text.push_str(&self.street_name);
        }

        text
    }
}

impl fmt::Display for RouteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0} m)", self.instruction(), self.distance_meters)
    }
}

/// A planned route between two coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Ordered maneuver steps (single leg)
    pub steps: Vec<RouteStep>,
    /// Path geometry in (lat, lon) order
    pub geometry: Vec<Coordinate>,
    /// Total length in meters
    #[serde(default)]
    pub distance_meters: f64,
    /// Total duration in seconds
    #[serde(default)]
    pub duration_seconds: f64,
    /// Travel mode the route was planned for
    #[serde(default)]
    pub mode: TravelMode,
}

impl Route {
    /// Whether at least one step exists
    #[must_use]
    pub fn has_steps(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Bounding box of the route geometry
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(&self.geometry)
    }

    /// Format as a compact one-line summary
    #[must_use]
    pub fn format_summary(&self) -> String {
        let km = self.distance_meters / 1000.0;
        let minutes = (self.duration_seconds / 60.0).round();
        format!(
            "{km:.1} km, {minutes} min {} ({} steps)",
            self.mode,
            self.steps.len()
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}
