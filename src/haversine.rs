//! Haversine travel-time provider (offline fallback).
//!
//! Uses great-circle distance to estimate travel time.
//! Less accurate than a routing service (ignores roads) but always available.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::geo::Coordinate;
use crate::route::RouteGeometry;
use crate::traits::{DistanceMatrixProvider, RouteProvider};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);

        EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
    }

    fn km_to_seconds(&self, km: f64) -> f64 {
        (km / self.speed_kmh * 3600.0).round()
    }
}

#[async_trait]
impl DistanceMatrixProvider for HaversineMatrix {
    async fn travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        Ok(destinations
            .iter()
            .map(|to| self.km_to_seconds(Self::haversine_km(origin.lat_lng(), to.lat_lng())))
            .collect())
    }
}

#[async_trait]
impl RouteProvider for HaversineMatrix {
    async fn calculate_route(&self, _stops: &[Coordinate]) -> Result<RouteGeometry, ServiceError> {
        Err(ServiceError::Unsupported("route calculation"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let dist = HaversineMatrix::haversine_km((16.41, 120.59), (16.41, 120.59));
        assert!(dist < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Baguio (16.41, 120.60) to Manila (14.60, 120.98), roughly 205 km
        let dist = HaversineMatrix::haversine_km((16.41, 120.60), (14.60, 120.98));
        assert!(dist > 190.0 && dist < 220.0, "Baguio to Manila should be ~205km, got {}", dist);
    }

    #[test]
    fn test_reasonable_travel_time() {
        let provider = HaversineMatrix::new(40.0);
        // 10 km at 40 km/h = 900 seconds
        assert_eq!(provider.km_to_seconds(10.0), 900.0);
    }

    #[tokio::test]
    async fn test_travel_times_follow_destination_order() {
        let provider = HaversineMatrix::default();
        let origin = Coordinate::new(16.41639, 120.598564);
        let far = Coordinate::new(16.50, 120.70);
        let near = Coordinate::new(16.42, 120.60);

        let times = provider.travel_times(origin, &[far, near]).await.unwrap();
        assert_eq!(times.len(), 2);
        assert!(times[0] > times[1]);
    }

    #[tokio::test]
    async fn test_route_is_unsupported() {
        let err = HaversineMatrix::default()
            .calculate_route(&[Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unsupported(_)));
    }
}
