//! Nearby place search port

use async_trait::async_trait;
use domain::{Coordinate, Place};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for finding points of interest around a coordinate
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlaceFinderPort: Send + Sync {
    /// Places of `category` within `radius_meters` of `center`, nearest first
    async fn find_nearby(
        &self,
        center: Coordinate,
        category: &str,
        radius_meters: u32,
    ) -> Result<Vec<Place>, ApplicationError>;
}
