//! Seams between the itinerary pipeline and its external collaborators.
//!
//! Routing services and the map widget live outside this crate. Hosts plug
//! in their own implementations, or use the bundled TomTom/OSRM clients and
//! the in-memory map.

use async_trait::async_trait;
use geojson::GeoJson;

use crate::error::ServiceError;
use crate::geo::Coordinate;
use crate::renderer::{LineStyle, Marker};
use crate::route::RouteGeometry;

/// Provides travel times from one origin to many destinations.
///
/// The returned vector is indexed by the provided destination order and
/// holds seconds. Callers must not invoke it with an empty destination list.
#[async_trait]
pub trait DistanceMatrixProvider: Send + Sync {
    async fn travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError>;
}

/// Calculates a drivable path through stops in the given order.
///
/// Implementations must not reorder the stops.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn calculate_route(&self, stops: &[Coordinate]) -> Result<RouteGeometry, ServiceError>;
}

/// The subset of a map widget the renderer and controller need.
pub trait MapSurface: Send {
    fn has_layer(&self, id: &str) -> bool;

    fn remove_layer(&mut self, id: &str);

    fn remove_source(&mut self, id: &str);

    /// Adds a line layer backed by a GeoJSON source of the same id.
    fn add_line_layer(&mut self, id: &str, data: GeoJson, style: LineStyle);

    fn add_marker(&mut self, marker: Marker);

    /// Moves the start marker to `position`, placing one if none exists.
    fn move_origin_marker(&mut self, position: Coordinate);
}
