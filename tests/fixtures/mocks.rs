//! Mock providers that record every call.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::sync::oneshot;

use travel_itinerary::error::ServiceError;
use travel_itinerary::polyline::Polyline;
use travel_itinerary::traits::{DistanceMatrixProvider, RouteProvider};
use travel_itinerary::{Coordinate, RouteGeometry};

type TimeFn = Box<dyn Fn(Coordinate, Coordinate) -> f64 + Send + Sync>;

fn unavailable(service: &'static str) -> ServiceError {
    ServiceError::Status {
        service,
        status: StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub struct MockMatrix {
    times: TimeFn,
    calls: Mutex<Vec<(Coordinate, Vec<Coordinate>)>>,
    failing: AtomicBool,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MockMatrix {
    fn with_times(times: TimeFn) -> Self {
        Self {
            times,
            calls: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            gate: Mutex::new(None),
        }
    }

    /// Travel time grows with the coordinate difference from the origin.
    pub fn manhattan() -> Self {
        Self::with_times(Box::new(|from, to| {
            ((from.latitude - to.latitude).abs() + (from.longitude - to.longitude).abs()) * 60_000.0
        }))
    }

    /// Fixed time per destination, independent of the origin.
    pub fn fixed(table: Vec<(Coordinate, f64)>) -> Self {
        Self::with_times(Box::new(move |_, to| {
            table
                .iter()
                .find(|(coordinate, _)| *coordinate == to)
                .map(|(_, seconds)| *seconds)
                .unwrap_or_else(|| panic!("no travel time for {:?}", to))
        }))
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Holds the next call until the returned sender fires or is dropped.
    pub fn gate_next_call(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        *self.gate.lock() = Some(gate);
        release
    }

    pub fn calls(&self) -> Vec<(Coordinate, Vec<Coordinate>)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl DistanceMatrixProvider for MockMatrix {
    async fn travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        self.calls.lock().push((origin, destinations.to_vec()));

        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("mock matrix"));
        }

        Ok(destinations
            .iter()
            .map(|destination| (self.times)(origin, *destination))
            .collect())
    }
}

/// Returns one straight segment per leg.
#[derive(Default)]
pub struct MockRouter {
    calls: Mutex<Vec<Vec<Coordinate>>>,
    failing: AtomicBool,
}

impl MockRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Vec<Coordinate>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl RouteProvider for MockRouter {
    async fn calculate_route(&self, stops: &[Coordinate]) -> Result<RouteGeometry, ServiceError> {
        self.calls.lock().push(stops.to_vec());

        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("mock route"));
        }

        Ok(RouteGeometry::new(
            stops
                .windows(2)
                .map(|pair| Polyline::new(pair.to_vec()))
                .collect(),
        ))
    }
}
