//! Tour session configuration

use application::TourSettings;
use domain::TravelMode;
use serde::{Deserialize, Serialize};

/// Tour session settings as read from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourAppConfig {
    /// Category searched before the user selects one (default: attraction)
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Nearby search radius in meters (default: 1500)
    #[serde(default = "default_search_radius")]
    pub search_radius_meters: u32,

    /// Travel mode for new routes (default: walking)
    #[serde(default)]
    pub travel_mode: TravelMode,

    /// Zoom level when centering the map on the user (default: 15)
    #[serde(default = "default_map_zoom")]
    pub map_zoom: u8,

    /// Interval between replayed positions of the simulated location source
    #[serde(default = "default_simulation_interval_ms")]
    pub simulation_interval_ms: u64,
}

fn default_category() -> String {
    "attraction".to_string()
}

const fn default_search_radius() -> u32 {
    1500
}

const fn default_map_zoom() -> u8 {
    15
}

const fn default_simulation_interval_ms() -> u64 {
    1000
}

impl Default for TourAppConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            search_radius_meters: default_search_radius(),
            travel_mode: TravelMode::default(),
            map_zoom: default_map_zoom(),
            simulation_interval_ms: default_simulation_interval_ms(),
        }
    }
}

impl TourAppConfig {
    /// Convert to session settings
    #[must_use]
    pub fn to_settings(&self) -> TourSettings {
        TourSettings {
            default_category: self.default_category.clone(),
            search_radius_meters: self.search_radius_meters,
            travel_mode: self.travel_mode,
            map_zoom: self.map_zoom,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error message if a value is out of range.
    pub fn validate(&self) -> Result<(), String> {
        if self.search_radius_meters == 0 {
            return Err("tour.search_radius_meters must be greater than 0".to_string());
        }
        if self.map_zoom > 19 {
            return Err(format!("tour.map_zoom must be 0-19, got {}", self.map_zoom));
        }
        if self.simulation_interval_ms == 0 {
            return Err("tour.simulation_interval_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}
