//! Drawing the route and markers onto a map surface.

use std::collections::BTreeMap;

use geojson::GeoJson;
use tracing::debug;

use crate::geo::Coordinate;
use crate::route::RouteGeometry;
use crate::traits::MapSurface;

/// Id shared by the route layer and its GeoJSON source.
pub const ROUTE_LAYER_ID: &str = "route";

pub const ORIGIN_POPUP: &str = "This is your starting point.";

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: "red".to_string(),
            width: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    /// The draggable start marker with its popup text.
    Origin { popup: String },
    Destination,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Coordinate,
}

impl Marker {
    pub fn origin(position: Coordinate) -> Self {
        Self {
            kind: MarkerKind::Origin {
                popup: ORIGIN_POPUP.to_string(),
            },
            position,
        }
    }

    pub fn destination(position: Coordinate) -> Self {
        Self {
            kind: MarkerKind::Destination,
            position,
        }
    }

    pub fn is_draggable(&self) -> bool {
        matches!(self.kind, MarkerKind::Origin { .. })
    }
}

/// Keeps at most one route layer on a map surface.
#[derive(Debug)]
pub struct RouteRenderer<S: MapSurface> {
    surface: S,
    style: LineStyle,
}

impl<S: MapSurface> RouteRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self::with_style(surface, LineStyle::default())
    }

    pub fn with_style(surface: S, style: LineStyle) -> Self {
        Self { surface, style }
    }

    /// Replaces any existing route layer with `route`.
    pub fn draw(&mut self, route: &RouteGeometry) {
        if self.surface.has_layer(ROUTE_LAYER_ID) {
            self.surface.remove_layer(ROUTE_LAYER_ID);
            self.surface.remove_source(ROUTE_LAYER_ID);
        }

        debug!(legs = route.legs.len(), points = route.point_count(), "drawing route");
        self.surface
            .add_line_layer(ROUTE_LAYER_ID, route.to_geojson(), self.style.clone());
    }

    pub fn place_marker(&mut self, marker: Marker) {
        self.surface.add_marker(marker);
    }

    pub fn move_origin_marker(&mut self, position: Coordinate) {
        self.surface.move_origin_marker(position);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayer {
    pub style: LineStyle,
    pub data: GeoJson,
}

/// A headless map surface that records layers and markers.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMap {
    layers: BTreeMap<String, LineLayer>,
    sources: BTreeMap<String, GeoJson>,
    markers: Vec<Marker>,
    layer_adds: usize,
}

impl InMemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self, id: &str) -> Option<&LineLayer> {
        self.layers.get(id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Number of times any line layer was added, including replacements.
    pub fn layer_adds(&self) -> usize {
        self.layer_adds
    }
}

impl MapSurface for InMemoryMap {
    fn has_layer(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    fn remove_layer(&mut self, id: &str) {
        self.layers.remove(id);
    }

    fn remove_source(&mut self, id: &str) {
        self.sources.remove(id);
    }

    fn add_line_layer(&mut self, id: &str, data: GeoJson, style: LineStyle) {
        self.sources.insert(id.to_string(), data.clone());
        self.layers.insert(id.to_string(), LineLayer { style, data });
        self.layer_adds += 1;
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn move_origin_marker(&mut self, position: Coordinate) {
        match self.markers.iter_mut().find(|marker| marker.is_draggable()) {
            Some(origin) => origin.position = position,
            None => self.markers.push(Marker::origin(position)),
        }
    }
}
