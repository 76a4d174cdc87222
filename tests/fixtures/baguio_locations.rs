//! Baguio City landmarks used as realistic stops.
//!
//! Coordinates are approximate, taken from OpenStreetMap.

use travel_itinerary::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// The default origin marker position.
pub const CITY_CENTER: Location = Location::new("Start", 16.41639, 120.598564);

pub const LANDMARKS: &[Location] = &[
    Location::new("Mines View Park", 16.4197, 120.6275),
    Location::new("Burnham Park", 16.4124, 120.5937),
    Location::new("Wright Park", 16.4134, 120.6171),
    Location::new("Camp John Hay", 16.3995, 120.6134),
    Location::new("Baguio Cathedral", 16.4129, 120.5985),
    Location::new("Botanical Garden", 16.4145, 120.6124),
    Location::new("Strawberry Farm", 16.4556, 120.5876),
];

pub fn landmark(name: &str) -> Coordinate {
    LANDMARKS
        .iter()
        .find(|location| location.name == name)
        .map(Location::coordinate)
        .unwrap_or_else(|| panic!("unknown landmark {name}"))
}
