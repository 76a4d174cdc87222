//! OSRM adapter tests against a mock server.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use travel_itinerary::error::ServiceError;
use travel_itinerary::osrm::{OsrmClient, OsrmConfig};
use travel_itinerary::traits::{DistanceMatrixProvider, RouteProvider};
use travel_itinerary::Coordinate;

fn client(server: &MockServer) -> OsrmClient {
    OsrmClient::new(OsrmConfig {
        base_url: server.uri(),
        profile: "car".to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn table_uses_origin_as_only_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/table/v1/car/120.598564,16.416390;120.600000,16.420000;120.590000,16.400000",
        ))
        .and(query_param("sources", "0"))
        .and(query_param("annotations", "duration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "durations": [[0.0, 512.3, 201.9]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let times = client(&server)
        .travel_times(
            Coordinate::new(16.41639, 120.598564),
            &[Coordinate::new(16.42, 120.60), Coordinate::new(16.40, 120.59)],
        )
        .await
        .unwrap();
    assert_eq!(times, vec![512.3, 201.9]);
}

#[tokio::test]
async fn table_error_code_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "NoTable",
            "message": "no table"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .travel_times(Coordinate::new(0.0, 0.0), &[Coordinate::new(1.0, 1.0)])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::MalformedResponse { .. }));
}

#[tokio::test]
async fn route_reassembles_legs_from_steps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/route/v1/car/120.598564,16.416390;120.590000,16.400000"))
        .and(query_param("geometries", "geojson"))
        .and(query_param("steps", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [{
                "distance": 2100.5,
                "duration": 260.2,
                "legs": [{
                    "steps": [
                        { "geometry": { "type": "LineString", "coordinates": [[120.598564, 16.41639], [120.595, 16.41]] } },
                        { "geometry": { "type": "LineString", "coordinates": [[120.595, 16.41], [120.59, 16.40]] } },
                        { "geometry": { "type": "LineString", "coordinates": [[120.59, 16.40], [120.59, 16.40]] } }
                    ]
                }]
            }]
        })))
        .mount(&server)
        .await;

    let route = client(&server)
        .calculate_route(&[
            Coordinate::new(16.41639, 120.598564),
            Coordinate::new(16.40, 120.59),
        ])
        .await
        .unwrap();

    assert_eq!(route.legs.len(), 1);
    assert_eq!(route.legs[0].len(), 4);
    assert_eq!(route.legs[0].points()[2], Coordinate::new(16.40, 120.59));
    assert_eq!(route.length_meters, Some(2100.5));
}

#[tokio::test]
async fn server_error_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client(&server)
        .calculate_route(&[Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Status { .. }));
}
