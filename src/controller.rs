//! Itinerary controller: owns the origin and destinations and drives the
//! sort → route → render pipeline on every change.
//!
//! Every trigger is issued a generation number. Runs may overlap, but only
//! the run holding the latest generation is allowed to draw. Older runs that
//! finish late are reported as [`PipelineOutcome::Superseded`] and leave the
//! map untouched. A failed run also leaves the map untouched, so the last
//! successfully drawn route stays visible.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, ServiceError};
use crate::geo::Coordinate;
use crate::itinerary::{Itinerary, synthesize_route};
use crate::renderer::{Marker, RouteRenderer};
use crate::sequencer::sort_destinations;
use crate::traits::{DistanceMatrixProvider, MapSurface, RouteProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has been drawn yet.
    Idle,
    /// The latest run is in flight.
    Computing,
    /// The latest finished run drew a route.
    Rendered,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// No destinations yet, so no service was contacted.
    Skipped,
    Rendered {
        generation: u64,
        itinerary: Itinerary,
    },
    /// A newer run was issued before this one finished; its result was dropped.
    Superseded { generation: u64 },
}

/// Events from the map widget and origin fields.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Click(Coordinate),
    OriginDragEnd(Coordinate),
    OriginFieldsEdited { latitude: String, longitude: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItinerarySnapshot {
    pub origin: Coordinate,
    /// Destinations in the order they were added.
    pub destinations: Vec<Coordinate>,
    /// The itinerary behind the route currently on the map.
    pub rendered: Option<Itinerary>,
    pub phase: Phase,
    pub generation: u64,
}

struct State {
    origin: Coordinate,
    destinations: Vec<Coordinate>,
    generation: u64,
    phase: Phase,
    rendered: Option<Itinerary>,
}

impl State {
    fn begin_run(&mut self) -> Option<PipelineRun> {
        if self.destinations.is_empty() {
            return None;
        }

        self.generation += 1;
        self.phase = Phase::Computing;
        Some(PipelineRun {
            generation: self.generation,
            origin: self.origin,
            destinations: self.destinations.clone(),
        })
    }

    fn settled_phase(&self) -> Phase {
        if self.rendered.is_some() {
            Phase::Rendered
        } else {
            Phase::Idle
        }
    }
}

/// Inputs captured when a run was triggered.
struct PipelineRun {
    generation: u64,
    origin: Coordinate,
    destinations: Vec<Coordinate>,
}

pub struct ItineraryController<S: MapSurface> {
    matrix: Arc<dyn DistanceMatrixProvider>,
    router: Arc<dyn RouteProvider>,
    state: Mutex<State>,
    renderer: Mutex<RouteRenderer<S>>,
}

impl<S: MapSurface> ItineraryController<S> {
    /// Creates the controller and places the origin marker.
    pub fn new(
        origin: Coordinate,
        matrix: Arc<dyn DistanceMatrixProvider>,
        router: Arc<dyn RouteProvider>,
        surface: S,
    ) -> Self {
        let mut renderer = RouteRenderer::new(surface);
        renderer.place_marker(Marker::origin(origin));

        Self {
            matrix,
            router,
            state: Mutex::new(State {
                origin,
                destinations: Vec::new(),
                generation: 0,
                phase: Phase::Idle,
                rendered: None,
            }),
            renderer: Mutex::new(renderer),
        }
    }

    /// Appends a destination, marks it, and recomputes the route.
    pub async fn add_destination(
        &self,
        destination: Coordinate,
    ) -> Result<PipelineOutcome, PipelineError> {
        let run = self.begin_add_destination(destination);
        self.execute(run).await
    }

    /// Replaces the origin and recomputes every destination against it.
    pub async fn move_origin(&self, origin: Coordinate) -> Result<PipelineOutcome, PipelineError> {
        let run = self.begin_move_origin(origin);
        self.execute(run).await
    }

    pub fn snapshot(&self) -> ItinerarySnapshot {
        let state = self.state.lock();
        ItinerarySnapshot {
            origin: state.origin,
            destinations: state.destinations.clone(),
            rendered: state.rendered.clone(),
            phase: state.phase,
            generation: state.generation,
        }
    }

    /// A copy of the map surface as currently drawn.
    pub fn surface(&self) -> S
    where
        S: Clone,
    {
        self.renderer.lock().surface().clone()
    }

    fn begin_add_destination(&self, destination: Coordinate) -> Option<PipelineRun> {
        let mut state = self.state.lock();
        state.destinations.push(destination);
        self.renderer.lock().place_marker(Marker::destination(destination));
        debug!(count = state.destinations.len(), "destination added");
        state.begin_run()
    }

    fn begin_move_origin(&self, origin: Coordinate) -> Option<PipelineRun> {
        let mut state = self.state.lock();
        state.origin = origin;
        self.renderer.lock().move_origin_marker(origin);
        debug!(
            latitude = origin.latitude,
            longitude = origin.longitude,
            "origin moved"
        );
        state.begin_run()
    }

    async fn execute(&self, run: Option<PipelineRun>) -> Result<PipelineOutcome, PipelineError> {
        let Some(run) = run else {
            return Ok(PipelineOutcome::Skipped);
        };
        let generation = run.generation;

        let sorted = sort_destinations(&*self.matrix, run.origin, &run.destinations)
            .await
            .map_err(|source| self.abandon(generation, source))?;

        let itinerary = Itinerary::new(run.origin, sorted);
        let route = synthesize_route(&*self.router, &itinerary)
            .await
            .map_err(|source| self.abandon(generation, source))?;

        let Some(route) = route else {
            return Ok(PipelineOutcome::Skipped);
        };

        let mut state = self.state.lock();
        if generation != state.generation {
            debug!(generation, latest = state.generation, "dropping superseded route");
            return Ok(PipelineOutcome::Superseded { generation });
        }

        self.renderer.lock().draw(&route);
        info!(
            generation,
            stops = itinerary.stops().len(),
            points = route.point_count(),
            "route rendered"
        );
        state.phase = Phase::Rendered;
        state.rendered = Some(itinerary.clone());

        Ok(PipelineOutcome::Rendered {
            generation,
            itinerary,
        })
    }

    fn abandon(&self, generation: u64, source: ServiceError) -> PipelineError {
        let mut state = self.state.lock();
        if generation == state.generation {
            state.phase = state.settled_phase();
        }
        warn!(generation, error = %source, "pipeline run abandoned");
        PipelineError { generation, source }
    }

}

impl<S: MapSurface + 'static> ItineraryController<S> {
    /// Consumes map events until the sender side is dropped.
    ///
    /// State changes are applied in event order; each resulting pipeline run
    /// is spawned so runs can overlap. Closing the channel tears the session
    /// down and aborts runs still in flight.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<MapEvent>) {
        let mut tasks = JoinSet::new();

        while let Some(event) = events.recv().await {
            let run = match event {
                MapEvent::Click(destination) => self.begin_add_destination(destination),
                MapEvent::OriginDragEnd(origin) => self.begin_move_origin(origin),
                MapEvent::OriginFieldsEdited {
                    latitude,
                    longitude,
                } => match Coordinate::parse(&latitude, &longitude) {
                    Ok(origin) => self.begin_move_origin(origin),
                    Err(err) => {
                        warn!(error = %err, "ignoring origin field edit");
                        continue;
                    }
                },
            };

            let controller = Arc::clone(&self);
            tasks.spawn(async move { controller.execute(run).await });

            while let Some(finished) = tasks.try_join_next() {
                log_finished(finished);
            }
        }

        debug!(in_flight = tasks.len(), "map session closed");
        tasks.abort_all();
        while let Some(finished) = tasks.join_next().await {
            if let Err(err) = &finished {
                if err.is_cancelled() {
                    continue;
                }
            }
            log_finished(finished);
        }
    }
}

fn log_finished(
    finished: Result<Result<PipelineOutcome, PipelineError>, tokio::task::JoinError>,
) {
    match finished {
        Ok(Ok(outcome)) => debug!(?outcome, "pipeline run finished"),
        Ok(Err(_)) => {}
        Err(err) => warn!(error = %err, "pipeline task failed"),
    }
}
