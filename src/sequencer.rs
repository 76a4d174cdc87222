//! Destination ordering by travel time from the origin.
//!
//! This is a single-origin nearest-time sort, not a tour optimisation:
//! every destination is ranked by its own travel time from the origin.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::ServiceError;
use crate::geo::Coordinate;
use crate::traits::DistanceMatrixProvider;

/// A destination paired with its travel time from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelTimeEntry {
    pub destination: Coordinate,
    pub travel_time_seconds: f64,
}

/// Stable ascending sort by travel time.
///
/// Entries with equal times keep their input order, so equidistant
/// destinations do not swap places between recomputations. NaN times sort
/// after every real value.
pub fn sequence(mut entries: Vec<TravelTimeEntry>) -> Vec<Coordinate> {
    entries.sort_by(|a, b| compare_times(a.travel_time_seconds, b.travel_time_seconds));
    entries.into_iter().map(|entry| entry.destination).collect()
}

fn compare_times(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.total_cmp(&b),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

/// Pairs destinations with provider travel times, order preserved.
pub fn pair_travel_times(
    destinations: &[Coordinate],
    times: Vec<f64>,
) -> Result<Vec<TravelTimeEntry>, ServiceError> {
    if times.len() != destinations.len() {
        return Err(ServiceError::LengthMismatch {
            expected: destinations.len(),
            actual: times.len(),
        });
    }

    Ok(destinations
        .iter()
        .zip(times)
        .map(|(destination, travel_time_seconds)| TravelTimeEntry {
            destination: *destination,
            travel_time_seconds,
        })
        .collect())
}

/// Queries travel times from `origin` and returns `destinations` reordered.
///
/// An empty destination list returns immediately without calling the provider.
pub async fn sort_destinations(
    provider: &dyn DistanceMatrixProvider,
    origin: Coordinate,
    destinations: &[Coordinate],
) -> Result<Vec<Coordinate>, ServiceError> {
    if destinations.is_empty() {
        return Ok(Vec::new());
    }

    let times = provider.travel_times(origin, destinations).await?;
    debug!(count = times.len(), "received travel times");

    let entries = pair_travel_times(destinations, times)?;
    Ok(sequence(entries))
}
