//! travel-itinerary core
//!
//! Orders map destinations by travel time from an origin and draws a
//! multi-stop driving route through them.

pub mod config;
pub mod controller;
pub mod error;
pub mod geo;
pub mod haversine;
pub mod itinerary;
pub mod osrm;
pub mod polyline;
pub mod renderer;
pub mod route;
pub mod sequencer;
pub mod tomtom;
pub mod traits;

pub use controller::{ItineraryController, MapEvent, Phase, PipelineOutcome};
pub use geo::Coordinate;
pub use itinerary::Itinerary;
pub use route::RouteGeometry;
