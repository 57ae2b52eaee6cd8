//! Place finder adapter - Implements PlaceFinderPort using integration_osm

use application::error::ApplicationError;
use application::ports::PlaceFinderPort;
use async_trait::async_trait;
use domain::{Coordinate, Place};
use integration_osm::{OverpassConfig, OverpassPlaceClient, PlaceClient};
use tracing::{debug, instrument, warn};

use super::map_osm_error;

/// Adapter for nearby POI search backed by Overpass
pub struct PlaceFinderAdapter {
    client: Box<dyn PlaceClient>,
}

impl std::fmt::Debug for PlaceFinderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceFinderAdapter")
            .field("client", &"dyn PlaceClient")
            .finish()
    }
}

impl PlaceFinderAdapter {
    /// Create an adapter with an Overpass client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &OverpassConfig) -> Result<Self, ApplicationError> {
        let client = OverpassPlaceClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    /// Create an adapter around any POI client
    #[must_use]
    pub fn with_client(client: impl PlaceClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }
}

#[async_trait]
impl PlaceFinderPort for PlaceFinderAdapter {
    #[instrument(skip(self))]
    async fn find_nearby(
        &self,
        center: Coordinate,
        category: &str,
        radius_meters: u32,
    ) -> Result<Vec<Place>, ApplicationError> {
        match self.client.find_nearby(center, category, radius_meters).await {
            Ok(places) => {
                debug!(count = places.len(), "POI search returned places");
                Ok(places)
            },
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "POI search failed");
                Err(map_osm_error("Nearby search failed", e))
            },
        }
    }
}
