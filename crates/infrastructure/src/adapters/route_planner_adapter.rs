//! Route planner adapter - Implements RoutePlannerPort using integration_osm

use application::error::ApplicationError;
use application::ports::RoutePlannerPort;
use async_trait::async_trait;
use domain::{Coordinate, Route, TravelMode};
use integration_osm::{OsrmConfig, OsrmRoutingClient, RoutingClient};
use tracing::{info, instrument, warn};

use super::map_osm_error;

/// Adapter for route planning backed by OSRM
pub struct RoutePlannerAdapter {
    client: Box<dyn RoutingClient>,
}

impl std::fmt::Debug for RoutePlannerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutePlannerAdapter")
            .field("client", &"dyn RoutingClient")
            .finish()
    }
}

impl RoutePlannerAdapter {
    /// Create an adapter with an OSRM client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &OsrmConfig) -> Result<Self, ApplicationError> {
        let client = OsrmRoutingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    /// Create an adapter around any routing client
    #[must_use]
    pub fn with_client(client: impl RoutingClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }
}

#[async_trait]
impl RoutePlannerPort for RoutePlannerAdapter {
    #[instrument(skip(self))]
    async fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Route, ApplicationError> {
        match self.client.route(origin, destination, mode).await {
            Ok(route) => {
                info!(
                    steps = route.steps.len(),
                    meters = route.distance_meters,
                    "Route planned"
                );
                Ok(route)
            },
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "Route planning failed");
                Err(map_osm_error("Route planning failed", e))
            },
        }
    }
}
