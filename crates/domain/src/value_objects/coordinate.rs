//! Geographic coordinate value object and great-circle distance

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in meters used by [`distance`]
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS-84 position in degrees
///
/// Out-of-range values are not rejected; callers that need validation use
/// [`Coordinate::validated`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create a coordinate with range validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180].
    pub fn validated(lat: f64, lon: f64) -> Result<Self, crate::DomainError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(crate::DomainError::InvalidCoordinates { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Build a coordinate from a `[longitude, latitude]` pair
    ///
    /// Routing services and GeoJSON use this ordering.
    #[must_use]
    pub const fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lon: pair[0],
        }
    }

    /// Whether both components are finite and non-zero
    ///
    /// A zero component is read as "missing", so a point lying exactly on
    /// the equator or the prime meridian is not resolvable. POI features
    /// without coordinates arrive as zeros, and telling them apart from a
    /// genuine zero is not possible.
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite() && self.lat != 0.0 && self.lon != 0.0
    }

    /// Great-circle distance to another coordinate in meters
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance(*self, *other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Haversine great-circle distance between two coordinates in meters
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
        (delta_lon / 2.0).sin().powi(2),
        (delta_lat / 2.0).sin().powi(2),
    );
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Axis-aligned bounding box used for viewport fitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum latitude / longitude corner
    pub south_west: Coordinate,
    /// Maximum latitude / longitude corner
    pub north_east: Coordinate,
}

impl Bounds {
    /// Smallest box enclosing all points, `None` for an empty slice
    #[must_use]
    pub fn enclosing(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            south_west: *first,
            north_east: *first,
        };
        for point in &points[1..] {
            bounds.south_west.lat = bounds.south_west.lat.min(point.lat);
            bounds.south_west.lon = bounds.south_west.lon.min(point.lon);
            bounds.north_east.lat = bounds.north_east.lat.max(point.lat);
            bounds.north_east.lon = bounds.north_east.lon.max(point.lon);
        }
        Some(bounds)
    }
}
