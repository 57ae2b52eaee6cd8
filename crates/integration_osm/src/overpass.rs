//! Overpass POI client
//!
//! Finds points of interest of a category within a radius of a coordinate
//! using the [Overpass API](https://wiki.openstreetmap.org/wiki/Overpass_API)
//! and ranks them by great-circle distance from the search center.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use domain::{Coordinate, Place, rank_by_distance};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::OverpassConfig;
use crate::error::OsmError;

/// Default search radius in meters
pub const DEFAULT_RADIUS_METERS: u32 = 1500;

/// Categories that live under the `tourism` key instead of `amenity`
const TOURISM_CATEGORIES: &[&str] = &[
    "attraction",
    "artwork",
    "gallery",
    "hotel",
    "museum",
    "theme_park",
    "viewpoint",
    "zoo",
];

/// Trait for POI search clients
#[async_trait]
pub trait PlaceClient: Send + Sync {
    /// Find places of `category` within `radius_meters` of `center`,
    /// sorted ascending by distance
    async fn find_nearby(
        &self,
        center: Coordinate,
        category: &str,
        radius_meters: u32,
    ) -> Result<Vec<Place>, OsmError>;
}

/// Overpass-based POI client
#[derive(Debug)]
pub struct OverpassPlaceClient {
    client: Client,
    config: OverpassConfig,
}

impl OverpassPlaceClient {
    /// Create a new Overpass client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OverpassConfig) -> Result<Self, OsmError> {
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

    /// Tag key a category is filed under
    fn tag_key(category: &str) -> &'static str {
        if TOURISM_CATEGORIES.contains(&category) {
            "tourism"
        } else {
            "amenity"
        }
    }

    /// Reject categories that cannot be embedded in a query safely
    fn validate_category(category: &str) -> Result<(), OsmError> {
        if category.is_empty() {
            return Err(OsmError::InvalidRequest(
                "Category must not be empty".to_string(),
            ));
        }
        if !category
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(OsmError::InvalidRequest(format!(
                "Unsupported category: {category}"
            )));
        }
        Ok(())
    }

    /// Build the Overpass QL query for a category around a center
    fn build_query(&self, center: Coordinate, category: &str, radius_meters: u32) -> String {
        let key = Self::tag_key(category);
        let around = format!("(around:{radius_meters},{:.6},{:.6})", center.lat, center.lon);

        let mut query = format!("[out:json][timeout:{}];\n(\n", self.config.query_timeout_secs);
        for element in ["node", "way"] {
            let _ = writeln!(query, "  {element}[\"{key}\"=\"{category}\"]{around};");
        }
        // A tourism category is already covered by the specific filter
        if self.config.include_tourism && key != "tourism" {
            for element in ["node", "way"] {
                let _ = writeln!(query, "  {element}[\"tourism\"]{around};");
            }
        }
        query.push_str(");\nout center;");
        query
    }

    /// Parse an Overpass JSON body into ranked places
    fn parse_places_response(
        body: &str,
        center: Coordinate,
        requested_category: &str,
    ) -> Result<Vec<Place>, OsmError> {
        let raw: RawOverpassResponse =
            serde_json::from_str(body).map_err(|e| OsmError::ParseError(e.to_string()))?;

        let total = raw.elements.len();
        let mut places: Vec<Place> = raw
            .elements
            .into_iter()
            .filter_map(|element| Self::convert_element(element, center, requested_category))
            .collect();

        if places.len() < total {
            debug!(dropped = total - places.len(), "Dropped features without a position");
        }

        rank_by_distance(&mut places);
        Ok(places)
    }

    /// Convert a raw element, `None` if it has no usable position
    fn convert_element(
        raw: RawElement,
        center: Coordinate,
        requested_category: &str,
    ) -> Option<Place> {
        let coordinate = match (raw.lat, raw.lon, raw.center) {
            (Some(lat), Some(lon), _) => Coordinate::new(lat, lon),
            (_, _, Some(c)) => Coordinate::new(c.lat, c.lon),
            _ => return None,
        };
        if !coordinate.is_resolvable() {
            return None;
        }

        let mut tags = raw.tags;
        let name = tags
            .remove("name")
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| Place::UNKNOWN_NAME.to_string());
        let category = tags
            .remove("amenity")
            .or_else(|| tags.remove("tourism"))
            .unwrap_or_else(|| requested_category.to_string());

        let place = Place::new(format!("{}/{}", raw.kind, raw.id), name, category, coordinate)
            .with_distance_from(center);
        place.distance_meters.is_some().then_some(place)
    }
}

#[async_trait]
impl PlaceClient for OverpassPlaceClient {
    #[instrument(skip(self), fields(center = %center))]
    async fn find_nearby(
        &self,
        center: Coordinate,
        category: &str,
        radius_meters: u32,
    ) -> Result<Vec<Place>, OsmError> {
        Self::validate_category(category)?;
        if radius_meters == 0 {
            return Err(OsmError::InvalidRequest(
                "Radius must be greater than 0".to_string(),
            ));
        }

        let url = format!("{}/interpreter", self.config.base_url);
        let query = self.build_query(center, category, radius_meters);

        debug!(?url, %query, "Querying nearby places");

        let response = self
            .client
            .post(&url)
            .form(&[("data", query.as_str())])
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

        let places = Self::parse_places_response(&body, center, category)?;
        debug!(count = places.len(), "Nearby places found");
        Ok(places)
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawOverpassResponse {
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<RawCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawCenter {
    lat: f64,
    lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Coordinate = Coordinate::new(40.0, -75.0);

    fn client(include_tourism: bool) -> OverpassPlaceClient {
        let config = OverpassConfig {
            include_tourism,
            ..OverpassConfig::for_testing()
        };
        OverpassPlaceClient::new(&config).unwrap()
    }

    #[test]
    fn test_tag_key() {
        assert_eq!(OverpassPlaceClient::tag_key("restaurant"), "amenity");
        assert_eq!(OverpassPlaceClient::tag_key("post_office"), "amenity");
        assert_eq!(OverpassPlaceClient::tag_key("museum"), "tourism");
        assert_eq!(OverpassPlaceClient::tag_key("attraction"), "tourism");
    }

    #[test]
    fn test_build_query_with_tourism() {
        let query = client(true).build_query(CENTER, "restaurant", 1500);
        assert!(query.starts_with("[out:json][timeout:5];"));
        assert!(query.contains(r#"node["amenity"="restaurant"](around:1500,40.000000,-75.000000);"#));
        assert!(query.contains(r#"way["amenity"="restaurant"](around:1500,40.000000,-75.000000);"#));
        assert!(query.contains(r#"node["tourism"](around:1500"#));
        assert!(query.ends_with("out center;"));
    }

    #[test]
    fn test_build_query_without_tourism() {
        let query = client(false).build_query(CENTER, "cafe", 800);
        assert!(!query.contains(r#"["tourism"]"#));
        assert!(query.contains("around:800"));
    }

    #[test]
    fn test_build_query_tourism_category_skips_generic_filter() {
        let query = client(true).build_query(CENTER, "museum", 1500);
        assert!(query.contains(r#"node["tourism"="museum"]"#));
        assert!(!query.contains(r#"node["tourism"](around"#));
    }

    #[test]
    fn test_validate_category() {
        assert!(OverpassPlaceClient::validate_category("post_office").is_ok());
        assert!(OverpassPlaceClient::validate_category("").is_err());
        assert!(OverpassPlaceClient::validate_category(r#"cafe"];out;"#).is_err());
    }

    #[test]
    fn test_parse_node_and_way() {
        let json = r#"{
            "elements": [
                {
                    "type": "way", "id": 7,
                    "center": { "lat": 40.0045, "lon": -75.0 },
                    "tags": { "name": "Far Museum", "tourism": "museum" }
                },
                {
                    "type": "node", "id": 3, "lat": 40.00045, "lon": -75.0,
                    "tags": { "name": "Corner Diner", "amenity": "restaurant" }
                }
            ]
        }"#;

        let places = OverpassPlaceClient::parse_places_response(json, CENTER, "restaurant").unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].id, "node/3");
        assert_eq!(places[0].name, "Corner Diner");
        assert_eq!(places[0].category, "restaurant");
        assert_eq!(places[1].id, "way/7");
        assert_eq!(places[1].category, "museum");
        assert!(places[0].distance_meters < places[1].distance_meters);
    }

    #[test]
    fn test_parse_fallbacks() {
        let json = r#"{
            "elements": [
                { "type": "node", "id": 1, "lat": 40.001, "lon": -75.0 }
            ]
        }"#;
        let places = OverpassPlaceClient::parse_places_response(json, CENTER, "cafe").unwrap();
        assert_eq!(places[0].name, "Unknown");
        assert_eq!(places[0].category, "cafe");
    }

    #[test]
    fn test_parse_drops_unresolvable_positions() {
        let json = r#"{
            "elements": [
                { "type": "node", "id": 1, "lat": 0.0, "lon": 0.0, "tags": { "name": "Null Island" } },
                { "type": "way", "id": 2, "tags": { "name": "No Geometry" } },
                { "type": "node", "id": 3, "lat": 40.0, "lon": 0.0 },
                { "type": "node", "id": 4, "lat": 40.002, "lon": -75.0, "tags": { "name": "Kept" } }
            ]
        }"#;
        let places = OverpassPlaceClient::parse_places_response(json, CENTER, "cafe").unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Kept");
    }

    #[test]
    fn test_parse_empty_elements() {
        let places =
            OverpassPlaceClient::parse_places_response(r#"{ "elements": [] }"#, CENTER, "cafe").unwrap();
        assert!(places.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(OverpassPlaceClient::parse_places_response("not json", CENTER, "cafe").is_err());
        assert!(OverpassPlaceClient::parse_places_response("{}", CENTER, "cafe").is_err());
    }
}
