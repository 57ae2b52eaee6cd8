//! Route planning port

use async_trait::async_trait;
use domain::{Coordinate, Route, TravelMode};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for turn-by-turn route planning
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutePlannerPort: Send + Sync {
    /// Plan a single-leg route from `origin` to `destination`
    async fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Route, ApplicationError>;
}
