//! Coordinates and the wire shape used by distance-matrix requests.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// A WGS84 position captured from map interaction or the origin fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parses the latitude/longitude text fields.
    ///
    /// Both fields are trimmed before parsing. Latitude must lie in
    /// `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, InputError> {
        let latitude = parse_field("latitude", latitude, 90.0)?;
        let longitude = parse_field("longitude", longitude, 180.0)?;
        Ok(Self::new(latitude, longitude))
    }

    /// (lat, lng) tuple, the form the haversine estimator works on.
    pub fn lat_lng(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// `lat,lng` with six decimals, as used in TomTom path segments.
    pub(crate) fn lat_lng_pair(&self) -> String {
        format!("{:.6},{:.6}", self.latitude, self.longitude)
    }

    /// `lng,lat` with six decimals, as used in OSRM path segments.
    pub(crate) fn lng_lat_pair(&self) -> String {
        format!("{:.6},{:.6}", self.longitude, self.latitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

fn parse_field(field: &'static str, raw: &str, bound: f64) -> Result<f64, InputError> {
    let value: f64 = raw.trim().parse().map_err(|_| InputError::NotANumber {
        field,
        value: raw.to_string(),
    })?;

    if !value.is_finite() || value.abs() > bound {
        return Err(InputError::OutOfRange { field, value });
    }

    Ok(value)
}

/// Request shape for a single matrix endpoint: `{"point": {...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub point: Coordinate,
}

impl From<Coordinate> for GeoPoint {
    fn from(point: Coordinate) -> Self {
        Self { point }
    }
}

impl From<&Coordinate> for GeoPoint {
    fn from(point: &Coordinate) -> Self {
        Self { point: *point }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_wire_shape() {
        let point = GeoPoint::from(Coordinate::new(16.41639, 120.598564));
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "point": { "latitude": 16.41639, "longitude": 120.598564 } })
        );
    }

    #[test]
    fn test_parse_trims_fields() {
        let coord = Coordinate::parse(" 16.41639 ", "120.598564").unwrap();
        assert_eq!(coord, Coordinate::new(16.41639, 120.598564));
    }

    #[test]
    fn test_parse_rejects_text() {
        let err = Coordinate::parse("north", "120.5").unwrap_err();
        assert!(matches!(err, InputError::NotANumber { field: "latitude", .. }));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let err = Coordinate::parse("16.4", "200").unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { field: "longitude", .. }));

        let err = Coordinate::parse("NaN", "120").unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { field: "latitude", .. }));
    }

    #[test]
    fn test_path_pairs() {
        let coord = Coordinate::new(16.42, 120.6);
        assert_eq!(coord.lat_lng_pair(), "16.420000,120.600000");
        assert_eq!(coord.lng_lat_pair(), "120.600000,16.420000");
    }
}
