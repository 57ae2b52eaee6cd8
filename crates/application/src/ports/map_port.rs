//! Map rendering collaborator port
//!
//! The core only pushes coordinates, markers and polylines; it never reads
//! geometry back from the map.

use std::fmt;

use domain::{Bounds, Coordinate};
#[cfg(test)]
use mockall::automock;

/// Identity of a marker on the map
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerId {
    /// The user's live position
    User,
    /// The selected upcoming maneuver
    NextTurn,
    /// A nearby place, keyed by its feature id
    Place(String),
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::NextTurn => write!(f, "next-turn"),
            Self::Place(id) => write!(f, "place:{id}"),
        }
    }
}

/// Port for the map renderer
#[cfg_attr(test, automock)]
pub trait MapPort: Send + Sync {
    /// Center the view on a coordinate
    fn set_view(&self, center: Coordinate, zoom: u8);

    /// Move the marker if it exists, create it otherwise
    fn upsert_marker(&self, id: &MarkerId, at: Coordinate, label: &str);

    /// Remove a marker; unknown markers are ignored
    fn remove_marker(&self, id: &MarkerId);

    /// Draw the route polyline, replacing any previous one
    fn draw_route(&self, path: &[Coordinate]);

    /// Remove the route polyline
    fn clear_route(&self);

    /// Fit the viewport to a bounding box
    fn fit_bounds(&self, bounds: Bounds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_display() {
        assert_eq!(MarkerId::User.to_string(), "user");
        assert_eq!(MarkerId::NextTurn.to_string(), "next-turn");
        assert_eq!(MarkerId::Place("node/1".to_string()).to_string(), "place:node/1");
    }
}
