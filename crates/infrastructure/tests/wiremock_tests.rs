//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - OSM adapters against mocked Overpass and OSRM services
//! - A full tour session wired to the adapters, the simulated location
//!   source and the headless map renderer

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use application::ports::{MarkerId, PlaceFinderPort, RoutePlannerPort};
use application::{
    ApplicationError, GuidancePhase, PumpOutcome, TourPorts, TourSession, TourSettings,
};
use domain::{Coordinate, TravelMode};
use infrastructure::{
    PlaceFinderAdapter, RoutePlannerAdapter, SimulatedLocationProvider, TracingMapRenderer,
};
use integration_osm::{OsrmConfig, OverpassConfig};

const CENTER: Coordinate = Coordinate::new(40.0, -75.0);
const TURN: Coordinate = Coordinate::new(40.003, -75.002);

const PLACES_JSON: &str = r#"{
    "elements": [
        {
            "type": "way", "id": 202,
            "center": { "lat": 40.0045, "lon": -75.0 },
            "tags": { "name": "Five Hundred", "amenity": "restaurant" }
        },
        {
            "type": "node", "id": 101, "lat": 40.00045, "lon": -75.0,
            "tags": { "name": "Fifty", "amenity": "restaurant" }
        }
    ]
}"#;

const ROUTE_JSON: &str = r#"{
    "code": "Ok",
    "routes": [{
        "distance": 1450.2,
        "duration": 1044.1,
        "geometry": {
            "type": "LineString",
            "coordinates": [[-75.0, 40.0], [-75.002, 40.003], [-75.006, 40.007], [-75.01, 40.01]]
        },
        "legs": [{
            "steps": [
                {
                    "name": "Chestnut Street", "distance": 600.0, "duration": 430.0,
                    "maneuver": { "type": "depart", "location": [-75.0, 40.0] }
                },
                {
                    "name": "Walnut Street", "distance": 850.2, "duration": 614.1,
                    "maneuver": { "type": "turn", "modifier": "right", "location": [-75.002, 40.003] }
                }
            ]
        }]
    }]
}"#;

fn place_adapter(server: &MockServer) -> PlaceFinderAdapter {
    PlaceFinderAdapter::new(&OverpassConfig {
        base_url: server.uri(),
        ..OverpassConfig::for_testing()
    })
    .unwrap()
}

fn route_adapter(server: &MockServer) -> RoutePlannerAdapter {
    RoutePlannerAdapter::new(&OsrmConfig {
        base_url: server.uri(),
        ..OsrmConfig::for_testing()
    })
    .unwrap()
}

async fn mount_places(server: &MockServer, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_string(PLACES_JSON)
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("POST"))
        .and(path("/interpreter"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_route(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/walking/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROUTE_JSON))
        .mount(server)
        .await;
}

// ============================================================================
// Adapter Tests
// ============================================================================

mod adapter_tests {
    use super::*;

    #[tokio::test]
    async fn place_adapter_returns_ranked_places() {
        let server = MockServer::start().await;
        mount_places(&server, 200).await;

        let places = place_adapter(&server)
            .find_nearby(CENTER, "restaurant", 1500)
            .await
            .unwrap();
        let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Fifty", "Five Hundred"]);
    }

    #[tokio::test]
    async fn place_adapter_maps_gateway_timeout() {
        let server = MockServer::start().await;
        mount_places(&server, 504).await;

        let err = place_adapter(&server)
            .find_nearby(CENTER, "restaurant", 1500)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }

    #[tokio::test]
    async fn route_adapter_returns_route() {
        let server = MockServer::start().await;
        mount_route(&server).await;

        let route = route_adapter(&server)
            .plan(CENTER, Coordinate::new(40.01, -75.01), TravelMode::Walking)
            .await
            .unwrap();
        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.geometry.len(), 4);
        assert_eq!(route.mode, TravelMode::Walking);
    }
}

// ============================================================================
// Tour Session Tests
// ============================================================================

mod session_tests {
    use super::*;

    struct Wired {
        session: TourSession,
        location: Arc<SimulatedLocationProvider>,
        map: Arc<TracingMapRenderer>,
    }

    fn wire(places: &MockServer, routes: &MockServer) -> Wired {
        let location = Arc::new(SimulatedLocationProvider::fixed(
            CENTER,
            Duration::from_millis(10),
        ));
        let map = Arc::new(TracingMapRenderer::new());
        let ports = TourPorts {
            places: Arc::new(place_adapter(places)),
            routes: Arc::new(route_adapter(routes)),
            location: location.clone(),
            map: map.clone(),
        };
        let settings = TourSettings {
            default_category: "restaurant".to_string(),
            ..TourSettings::default()
        };
        Wired {
            session: TourSession::new(ports, settings),
            location,
            map,
        }
    }

    #[tokio::test]
    async fn nearby_then_route_then_follow_track() {
        let places = MockServer::start().await;
        let routes = MockServer::start().await;
        mount_places(&places, 200).await;
        mount_route(&routes).await;
        let Wired {
            mut session,
            location,
            map,
        } = wire(&places, &routes);

        let nearest = session.find_nearby().await.unwrap()[0].clone();
        assert_eq!(nearest.name, "Fifty");
        assert_eq!(map.snapshot().view, Some((CENTER, 15)));

        let geometry = session.route_to(&nearest).await.unwrap().geometry.clone();
        assert_eq!(session.guidance_phase(), GuidancePhase::Guiding);
        assert_eq!(session.state().guidance().unwrap().next_step_index, Some(0));
        location.set_track(geometry);

        let mut seen = Vec::new();
        loop {
            match session.pump().await {
                PumpOutcome::Guidance(guidance) => seen.push(guidance.next_step_index),
                PumpOutcome::Ignored => {},
                PumpOutcome::Ended => break,
            }
        }
        assert_eq!(seen.last(), Some(&Some(1)));

        let overlay = map.snapshot();
        assert_eq!(overlay.route.len(), 4);
        let (turn_at, label) = &overlay.markers[&MarkerId::NextTurn];
        assert_eq!(*turn_at, TURN);
        assert_eq!(label, "turn right on Walnut Street");

        session.clear_route();
        let overlay = map.snapshot();
        assert!(overlay.route.is_empty());
        assert!(!overlay.markers.contains_key(&MarkerId::NextTurn));
        assert_eq!(location.active_watches(), 0);
        assert_eq!(session.guidance_phase(), GuidancePhase::Idle);
    }

    #[tokio::test]
    async fn failed_search_records_error() {
        let places = MockServer::start().await;
        let routes = MockServer::start().await;
        mount_places(&places, 504).await;
        let Wired { mut session, map, .. } = wire(&places, &routes);

        assert!(session.find_nearby().await.is_err());
        assert!(session.state().places().is_empty());
        assert!(session.state().last_error().is_some());
        assert_eq!(map.snapshot().markers.len(), 1);
    }
}
