//! The ordered stop sequence and route synthesis over it.

use serde::Serialize;
use tracing::debug;

use crate::error::ServiceError;
use crate::geo::Coordinate;
use crate::route::RouteGeometry;
use crate::traits::RouteProvider;

/// Origin followed by destinations in visiting order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    origin: Coordinate,
    destinations: Vec<Coordinate>,
}

impl Itinerary {
    pub fn new(origin: Coordinate, ordered_destinations: Vec<Coordinate>) -> Self {
        Self {
            origin,
            destinations: ordered_destinations,
        }
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn destinations(&self) -> &[Coordinate] {
        &self.destinations
    }

    /// All stops with the origin first.
    pub fn stops(&self) -> Vec<Coordinate> {
        std::iter::once(self.origin)
            .chain(self.destinations.iter().copied())
            .collect()
    }

    /// A route needs the origin and at least one destination.
    pub fn is_routable(&self) -> bool {
        !self.destinations.is_empty()
    }
}

/// Requests a route over the itinerary's stops in order.
///
/// Returns `Ok(None)` without contacting the provider when the itinerary has
/// no destinations.
pub async fn synthesize_route(
    router: &dyn RouteProvider,
    itinerary: &Itinerary,
) -> Result<Option<RouteGeometry>, ServiceError> {
    if !itinerary.is_routable() {
        return Ok(None);
    }

    let stops = itinerary.stops();
    debug!(stops = stops.len(), "requesting route");
    router.calculate_route(&stops).await.map(Some)
}
