//! TomTom Routing API adapter for travel times and route calculation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ServiceError;
use crate::geo::{Coordinate, GeoPoint};
use crate::polyline::Polyline;
use crate::route::RouteGeometry;
use crate::traits::{DistanceMatrixProvider, RouteProvider};

const MATRIX_SERVICE: &str = "matrix routing";
const ROUTE_SERVICE: &str = "calculate route";

#[derive(Clone)]
pub struct TomTomConfig {
    pub base_url: String,
    pub api_key: String,
    pub travel_mode: String,
    pub timeout_secs: u64,
}

impl Default for TomTomConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tomtom.com".to_string(),
            api_key: String::new(),
            travel_mode: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

impl fmt::Debug for TomTomConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TomTomConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("travel_mode", &self.travel_mode)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TomTomClient {
    config: TomTomConfig,
    client: reqwest::Client,
}

impl TomTomClient {
    pub fn new(config: TomTomConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl DistanceMatrixProvider for TomTomClient {
    #[tracing::instrument(skip_all, fields(destinations = destinations.len()))]
    async fn travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        let body = MatrixRequest {
            origins: vec![GeoPoint::from(origin)],
            destinations: destinations.iter().map(GeoPoint::from).collect(),
        };

        let request = self
            .client
            .post(self.url("/routing/1/matrix/sync/json"))
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("routeType", "fastest"),
                ("travelMode", self.config.travel_mode.as_str()),
            ])
            .json(&body);

        let response: MatrixResponse = fetch_json(request, MATRIX_SERVICE).await?;
        response.first_row_travel_times(destinations.len())
    }
}

#[async_trait]
impl RouteProvider for TomTomClient {
    #[tracing::instrument(skip_all, fields(stops = stops.len()))]
    async fn calculate_route(&self, stops: &[Coordinate]) -> Result<RouteGeometry, ServiceError> {
        let locations = stops
            .iter()
            .map(Coordinate::lat_lng_pair)
            .collect::<Vec<_>>()
            .join(":");

        let request = self
            .client
            .get(self.url(&format!("/routing/1/calculateRoute/{}/json", locations)))
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("travelMode", self.config.travel_mode.as_str()),
                ("routeType", "fastest"),
                ("computeBestOrder", "false"),
            ]);

        let response: CalculateRouteResponse = fetch_json(request, ROUTE_SERVICE).await?;
        response.into_geometry(stops.len())
    }
}

async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    service: &'static str,
) -> Result<T, ServiceError> {
    let response = request.send().await.map_err(redacted)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::Status { service, status });
    }

    let bytes = response.bytes().await.map_err(redacted)?;
    debug!(service, bytes = bytes.len(), "response received");
    serde_json::from_slice(&bytes).map_err(|err| ServiceError::malformed(service, err.to_string()))
}

/// The request URL carries the API key in its query string.
fn redacted(err: reqwest::Error) -> ServiceError {
    ServiceError::Request(err.without_url())
}

#[derive(Debug, Serialize)]
struct MatrixRequest {
    origins: Vec<GeoPoint>,
    destinations: Vec<GeoPoint>,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    matrix: Vec<Vec<MatrixCell>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixCell {
    status_code: Option<u16>,
    response: Option<MatrixCellResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixCellResponse {
    route_summary: Option<RouteSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteSummary {
    length_in_meters: f64,
    travel_time_in_seconds: f64,
}

impl MatrixResponse {
    fn first_row_travel_times(self, expected: usize) -> Result<Vec<f64>, ServiceError> {
        let row = self
            .matrix
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::malformed(MATRIX_SERVICE, "empty matrix"))?;

        if row.len() != expected {
            return Err(ServiceError::LengthMismatch {
                expected,
                actual: row.len(),
            });
        }

        row.into_iter()
            .enumerate()
            .map(|(index, cell)| {
                if let Some(code) = cell.status_code.filter(|code| *code != 200) {
                    return Err(ServiceError::malformed(
                        MATRIX_SERVICE,
                        format!("cell {} has status {}", index, code),
                    ));
                }
                cell.response
                    .and_then(|response| response.route_summary)
                    .map(|summary| summary.travel_time_in_seconds)
                    .ok_or_else(|| {
                        ServiceError::malformed(
                            MATRIX_SERVICE,
                            format!("cell {} is missing routeSummary", index),
                        )
                    })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct CalculateRouteResponse {
    routes: Vec<TomTomRoute>,
}

#[derive(Debug, Deserialize)]
struct TomTomRoute {
    summary: RouteSummary,
    legs: Vec<TomTomLeg>,
}

#[derive(Debug, Deserialize)]
struct TomTomLeg {
    points: Vec<Coordinate>,
}

impl CalculateRouteResponse {
    fn into_geometry(self, stops: usize) -> Result<RouteGeometry, ServiceError> {
        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::malformed(ROUTE_SERVICE, "no routes returned"))?;

        if route.legs.len() + 1 != stops {
            return Err(ServiceError::malformed(
                ROUTE_SERVICE,
                format!("expected {} legs, got {}", stops.saturating_sub(1), route.legs.len()),
            ));
        }

        let legs = route
            .legs
            .into_iter()
            .map(|leg| Polyline::new(leg.points))
            .collect();

        Ok(RouteGeometry::new(legs).with_summary(
            route.summary.length_in_meters,
            route.summary.travel_time_in_seconds,
        ))
    }
}
