//! Application configuration
//!
//! Split into sections:
//! - `overpass`: POI search service
//! - `osrm`: routing service
//! - `tour`: session defaults
//! - `logging`: console logging
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file
//! (`tourguide.toml` in the working directory unless a path is given), and
//! environment variables such as `TOURGUIDE_OSRM__BASE_URL`.

mod tour;

use std::path::Path;

use integration_osm::{OsrmConfig, OverpassConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use tour::TourAppConfig;

use crate::telemetry::LoggingConfig;

/// Default configuration file name, without extension
pub const DEFAULT_CONFIG_FILE: &str = "tourguide";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "TOURGUIDE";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Overpass POI search configuration
    #[serde(default)]
    pub overpass: OverpassConfig,

    /// OSRM routing configuration
    #[serde(default)]
    pub osrm: OsrmConfig,

    /// Tour session defaults
    #[serde(default)]
    pub tour: TourAppConfig,

    /// Console logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `tourguide.toml` (if present) and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required) or the default one
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or a source cannot be
    /// parsed.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            .set_default("tour.default_category", "attraction")?
            .set_default("tour.travel_mode", "walking")?
            .add_source(file)
            // e.g. TOURGUIDE_TOUR__SEARCH_RADIUS_METERS=800
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(?path, "Configuration loaded");
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate(&self) -> Result<(), String> {
        self.overpass.validate()?;
        self.osrm.validate()?;
        self.tour.validate()
    }
}
