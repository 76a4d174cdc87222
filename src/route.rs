//! Route geometry returned by a route provider.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};

use crate::polyline::Polyline;

/// Drawable path for one itinerary, one polyline per leg.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub legs: Vec<Polyline>,
    /// Total length in meters, when the provider reports it.
    pub length_meters: Option<f64>,
    /// Total travel time in seconds, when the provider reports it.
    pub travel_time_seconds: Option<f64>,
}

impl RouteGeometry {
    pub fn new(legs: Vec<Polyline>) -> Self {
        Self {
            legs,
            length_meters: None,
            travel_time_seconds: None,
        }
    }

    pub fn with_summary(mut self, length_meters: f64, travel_time_seconds: f64) -> Self {
        self.length_meters = Some(length_meters);
        self.travel_time_seconds = Some(travel_time_seconds);
        self
    }

    pub fn point_count(&self) -> usize {
        self.legs.iter().map(Polyline::len).sum()
    }

    /// A feature collection holding one `MultiLineString` feature, legs in order.
    pub fn to_geojson(&self) -> GeoJson {
        let lines = self.legs.iter().map(Polyline::positions).collect();

        let mut properties = JsonObject::new();
        if let Some(length) = self.length_meters {
            properties.insert("lengthInMeters".to_string(), length.into());
        }
        if let Some(time) = self.travel_time_seconds {
            properties.insert("travelTimeInSeconds".to_string(), time.into());
        }

        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::MultiLineString(lines))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        };

        GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        })
    }
}
