//! POI and routing service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Overpass POI service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverpassConfig {
    /// Base URL of the Overpass API (the client appends `/interpreter`)
    #[serde(default = "default_overpass_base_url")]
    pub base_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_overpass_timeout_secs")]
    pub timeout_secs: u64,

    /// Server-side query timeout in seconds (`[timeout:N]` in the query)
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,

    /// Also return generic `tourism` features alongside the requested category
    #[serde(default = "default_include_tourism")]
    pub include_tourism: bool,
}

fn default_overpass_base_url() -> String {
    "https://overpass-api.de/api".to_string()
}

const fn default_overpass_timeout_secs() -> u64 {
    30
}

const fn default_query_timeout_secs() -> u64 {
    25
}

const fn default_include_tourism() -> bool {
    true
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: default_overpass_base_url(),
            timeout_secs: default_overpass_timeout_secs(),
            query_timeout_secs: default_query_timeout_secs(),
            include_tourism: default_include_tourism(),
        }
    }
}

impl OverpassConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            query_timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("overpass.base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("overpass.timeout_secs must be greater than 0".to_string());
        }

        if self.query_timeout_secs == 0 {
            return Err("overpass.query_timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Configuration for the OSRM routing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsrmConfig {
    /// Base URL of the OSRM HTTP API (the client appends `/route/v1/...`)
    #[serde(default = "default_osrm_base_url")]
    pub base_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_osrm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_osrm_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

const fn default_osrm_timeout_secs() -> u64 {
    10
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_osrm_base_url(),
            timeout_secs: default_osrm_timeout_secs(),
        }
    }
}

impl OsrmConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("osrm.base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("osrm.timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
