//! OpenStreetMap integrations for the tour guide
//!
//! Provides nearby point-of-interest search via the
//! [Overpass API](https://overpass-api.de) and turn-by-turn routing via
//! [OSRM](https://project-osrm.org).
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern consistent with other integration crates.
//! [`PlaceClient`] defines nearby search, implemented by [`OverpassPlaceClient`].
//! [`RoutingClient`] defines route planning, implemented by [`OsrmRoutingClient`].
//! Both are single-shot: no caching and no retries.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::{Coordinate, TravelMode};
//! use integration_osm::{OsrmConfig, OsrmRoutingClient, RoutingClient};
//!
//! let client = OsrmRoutingClient::new(&OsrmConfig::default())?;
//! let route = client
//!     .route(Coordinate::new(40.0, -75.0), Coordinate::new(40.01, -75.01), TravelMode::Walking)
//!     .await?;
//! ```

mod config;
mod error;
mod osrm;
mod overpass;

pub use config::{OsrmConfig, OverpassConfig};
pub use error::OsmError;
pub use osrm::{OsrmRoutingClient, RoutingClient};
pub use overpass::{DEFAULT_RADIUS_METERS, OverpassPlaceClient, PlaceClient};
