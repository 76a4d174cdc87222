//! Polyline representation for route legs.
//!
//! Points are kept decoded. Conversion to GeoJSON positions happens at the
//! rendering boundary.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// One leg of a route as an ordered list of coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// GeoJSON positions, longitude first.
    pub fn positions(&self) -> Vec<Vec<f64>> {
        self.points
            .iter()
            .map(|point| vec![point.longitude, point.latitude])
            .collect()
    }

    /// Appends `other`, dropping its first point when it repeats our last one.
    pub(crate) fn extend_joined(&mut self, other: Polyline) {
        let mut incoming = other.points.into_iter().peekable();
        if let (Some(last), Some(first)) = (self.points.last(), incoming.peek()) {
            if last == first {
                incoming.next();
            }
        }
        self.points.extend(incoming);
    }
}

impl From<Vec<(f64, f64)>> for Polyline {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points.into_iter().map(Coordinate::from).collect())
    }
}
