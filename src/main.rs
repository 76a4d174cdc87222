use clap::Parser;
use tracing::{info, warn};

use travel_itinerary::config::ItineraryConfig;
use travel_itinerary::renderer::{InMemoryMap, ROUTE_LAYER_ID};
use travel_itinerary::{Coordinate, ItineraryController};

#[derive(Parser)]
#[command(author, version, about = "Order destinations by travel time and print the route as GeoJSON")]
struct Cli {
    /// Start point as LAT,LNG (defaults to the configured origin)
    #[arg(short, long, value_parser = parse_coordinate)]
    origin: Option<Coordinate>,

    /// A destination as LAT,LNG; repeat in the order they are added
    #[arg(short, long = "destination", value_parser = parse_coordinate)]
    destinations: Vec<Coordinate>,

    /// tomtom, osrm or haversine (overrides TRAVEL_ITINERARY_PROVIDER)
    #[arg(short, long)]
    provider: Option<String>,

    #[arg(long)]
    debug: bool,
}

fn parse_coordinate(raw: &str) -> Result<Coordinate, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {:?}", raw))?;
    Coordinate::parse(lat, lng).map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = ItineraryConfig::from_env(cli.provider.as_deref())?;
    let providers = config.providers()?;
    let origin = cli.origin.unwrap_or(config.origin);

    let controller = ItineraryController::new(
        origin,
        providers.matrix,
        providers.router,
        InMemoryMap::new(),
    );

    for destination in cli.destinations {
        if let Err(err) = controller.add_destination(destination).await {
            warn!(error = %err, "keeping previous route");
        }
    }

    let snapshot = controller.snapshot();
    if let Some(itinerary) = &snapshot.rendered {
        info!(stops = itinerary.stops().len(), "itinerary ready");
    }

    let map = controller.surface();
    match map.layer(ROUTE_LAYER_ID).map(|layer| layer.data.to_string()) {
        Some(geojson) => println!("{}", geojson),
        None => warn!("no route was drawn"),
    }

    Ok(())
}
