//! Point of interest entity

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Coordinate;

/// A named point of interest found near the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Opaque feature id from the POI service (not unique across categories)
    pub id: String,
    /// Display name, `"Unknown"` when the service has none
    pub name: String,
    /// Effective category (e.g. `restaurant`, `museum`)
    pub category: String,
    /// Representative position of the feature
    pub coordinate: Coordinate,
    /// Rounded distance from the search center in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<u32>,
}

impl Place {
    /// Name used when the POI service does not provide one
    pub const UNKNOWN_NAME: &'static str = "Unknown";

    /// Create a place without a distance
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            coordinate,
            distance_meters: None,
        }
    }

    /// Populate `distance_meters` relative to `center`
    ///
    /// Leaves the distance unset when either coordinate is not finite.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn with_distance_from(mut self, center: Coordinate) -> Self {
        let meters = center.distance_to(&self.coordinate);
        self.distance_meters = meters.is_finite().then(|| meters.round() as u32);
        self
    }

    /// Format as a compact one-line summary
    #[must_use]
    pub fn format_summary(&self) -> String {
        match self.distance_meters {
            Some(m) if m >= 1000 => {
                format!("{} ({}) {:.1} km", self.name, self.category, f64::from(m) / 1000.0)
            },
            Some(m) => format!("{} ({}) {m} m", self.name, self.category),
            None => format!("{} ({})", self.name, self.category),
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}

/// Sort places ascending by distance, keeping service order for ties
///
/// Places without a distance sort last.
pub fn rank_by_distance(places: &mut [Place]) {
    places.sort_by_key(|p| p.distance_meters.unwrap_or(u32::MAX));
}
