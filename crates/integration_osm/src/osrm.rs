//! OSRM routing client
//!
//! Plans a route between two coordinates with full geometry and
//! step-level maneuvers using the
//! [OSRM HTTP API](https://project-osrm.org/docs/v5.24.0/api/#route-service).

use std::time::Duration;

use async_trait::async_trait;
use domain::{Coordinate, Maneuver, Route, RouteStep, TravelMode};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::OsrmConfig;
use crate::error::OsmError;

/// Trait for routing service clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Plan a route from `origin` to `destination`
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Route, OsmError>;
}

/// OSRM-based routing client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, OsmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("TourGuide/1.0")
            .build()
            .map_err(|e| OsmError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Route URL: `<base>/route/v1/<profile>/<lon>,<lat>;<lon>,<lat>`
    fn route_url(&self, origin: Coordinate, destination: Coordinate, mode: TravelMode) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}",
            self.config.base_url,
            mode.profile(),
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat
        )
    }

    /// Parse an OSRM route body, keeping the first alternative and first leg
    fn parse_route_response(
        body: &str,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Route, OsmError> {
        let raw: RawRouteResponse =
            serde_json::from_str(body).map_err(|e| OsmError::ParseError(e.to_string()))?;

        let Some(first) = raw.routes.into_iter().next() else {
            debug!(code = ?raw.code, message = ?raw.message, "Routing service returned no routes");
            return Err(OsmError::NoRouteFound {
                from: origin.to_string(),
                to: destination.to_string(),
            });
        };

        if first.legs.len() > 1 {
            debug!(legs = first.legs.len(), "Multi-leg route truncated to first leg");
        }

        let geometry = first
            .geometry
            .coordinates
            .into_iter()
            .map(Coordinate::from_lon_lat)
            .collect();

        let steps = first
            .legs
            .into_iter()
            .next()
            .map(|leg| leg.steps.into_iter().map(Self::convert_step).collect())
            .unwrap_or_default();

        Ok(Route {
            steps,
            geometry,
            distance_meters: first.distance,
            duration_seconds: first.duration,
            mode,
        })
    }

    /// Convert a raw step to a typed step
    fn convert_step(raw: RawStep) -> RouteStep {
        RouteStep {
            street_name: raw.name,
            distance_meters: raw.distance,
            duration_seconds: raw.duration,
            maneuver: raw.maneuver.map(|m| Maneuver {
                kind: m.kind,
                modifier: m.modifier,
                location: Coordinate::from_lon_lat(m.location),
            }),
        }
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self), fields(from = %origin, to = %destination))]
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Route, OsmError> {
        let url = self.route_url(origin, destination, mode);
        let params = [
            ("overview", "full"),
            ("geometries", "geojson"),
            ("steps", "true"),
        ];

        debug!(?url, "Requesting route");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| OsmError::from_transport(&e, self.config.timeout_secs))?;

        if !response.status().is_success() {
            return Err(OsmError::from_status(&response));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OsmError::ParseError(e.to_string()))?;

        let route = Self::parse_route_response(&body, origin, destination, mode)?;
        debug!(
            steps = route.steps.len(),
            points = route.geometry.len(),
            "Route planned"
        );
        Ok(route)
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawRouteResponse {
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    geometry: RawGeometry,
    #[serde(default)]
    legs: Vec<RawLeg>,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default)]
    name: String,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    maneuver: Option<RawManeuver>,
}

#[derive(Debug, Deserialize)]
struct RawManeuver {
    #[serde(rename = "type")]
    kind: Option<String>,
    modifier: Option<String>,
    location: [f64; 2],
}
