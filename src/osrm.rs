//! OSRM HTTP adapter for travel times and routes.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ServiceError;
use crate::geo::Coordinate;
use crate::polyline::Polyline;
use crate::route::RouteGeometry;
use crate::traits::{DistanceMatrixProvider, RouteProvider};

const TABLE_SERVICE: &str = "osrm table";
const ROUTE_SERVICE: &str = "osrm route";

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self, service: &str, points: &[Coordinate]) -> String {
        let coords = points
            .iter()
            .map(Coordinate::lng_lat_pair)
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/{}/v1/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            service,
            self.config.profile,
            coords
        )
    }

    async fn get<T: DeserializeOwned + OsrmCode>(
        &self,
        url: String,
        query: &[(&str, &str)],
        service: &'static str,
    ) -> Result<T, ServiceError> {
        debug!(%url, "osrm request");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|err| ServiceError::Request(err.without_url()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status { service, status });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ServiceError::Request(err.without_url()))?;
        let body: T = serde_json::from_slice(&bytes)
            .map_err(|err| ServiceError::malformed(service, err.to_string()))?;

        if body.code() != "Ok" {
            return Err(ServiceError::malformed(service, format!("code {}", body.code())));
        }
        Ok(body)
    }
}

#[async_trait]
impl DistanceMatrixProvider for OsrmClient {
    #[tracing::instrument(skip_all, fields(destinations = destinations.len()))]
    async fn travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        let points: Vec<Coordinate> = std::iter::once(origin)
            .chain(destinations.iter().copied())
            .collect();

        let url = self.url("table", &points);
        let body: OsrmTableResponse = self
            .get(url, &[("sources", "0"), ("annotations", "duration")], TABLE_SERVICE)
            .await?;

        body.origin_row(destinations.len())
    }
}

#[async_trait]
impl RouteProvider for OsrmClient {
    #[tracing::instrument(skip_all, fields(stops = stops.len()))]
    async fn calculate_route(&self, stops: &[Coordinate]) -> Result<RouteGeometry, ServiceError> {
        let url = self.url("route", stops);
        let body: OsrmRouteResponse = self
            .get(
                url,
                &[
                    ("overview", "false"),
                    ("steps", "true"),
                    ("geometries", "geojson"),
                ],
                ROUTE_SERVICE,
            )
            .await?;

        body.into_geometry(stops.len())
    }
}

trait OsrmCode {
    fn code(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    durations: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmCode for OsrmTableResponse {
    fn code(&self) -> &str {
        &self.code
    }
}

impl OsrmTableResponse {
    /// Row 0 without the origin-to-itself column.
    fn origin_row(self, expected: usize) -> Result<Vec<f64>, ServiceError> {
        let row = self
            .durations
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::malformed(TABLE_SERVICE, "missing durations"))?;

        if row.len() != expected + 1 {
            return Err(ServiceError::LengthMismatch {
                expected,
                actual: row.len().saturating_sub(1),
            });
        }

        row.into_iter()
            .skip(1)
            .enumerate()
            .map(|(index, value)| {
                value.ok_or_else(|| {
                    ServiceError::malformed(TABLE_SERVICE, format!("no route to destination {}", index))
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

impl OsrmCode for OsrmRouteResponse {
    fn code(&self) -> &str {
        &self.code
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    geometry: OsrmLineString,
}

#[derive(Debug, Deserialize)]
struct OsrmLineString {
    coordinates: Vec<[f64; 2]>,
}

impl OsrmRouteResponse {
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
            .map(|leg| {
                let mut line = Polyline::default();
                for step in leg.steps {
                    let points = step
                        .geometry
                        .coordinates
                        .into_iter()
                        .map(|[lng, lat]| Coordinate::new(lat, lng))
                        .collect();
                    line.extend_joined(Polyline::new(points));
                }
                line
            })
            .collect();

        Ok(RouteGeometry::new(legs).with_summary(route.distance, route.duration))
    }
}
