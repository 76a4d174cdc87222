//! Process configuration read from the environment.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::geo::Coordinate;
use crate::haversine::HaversineMatrix;
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::tomtom::{TomTomClient, TomTomConfig};
use crate::traits::{DistanceMatrixProvider, RouteProvider};

pub const API_KEY_VAR: &str = "TRAVEL_ITINERARY_API_KEY";
pub const PROVIDER_VAR: &str = "TRAVEL_ITINERARY_PROVIDER";
pub const BASE_URL_VAR: &str = "TRAVEL_ITINERARY_BASE_URL";
pub const TIMEOUT_VAR: &str = "TRAVEL_ITINERARY_TIMEOUT_SECS";
pub const ORIGIN_LAT_VAR: &str = "TRAVEL_ITINERARY_ORIGIN_LAT";
pub const ORIGIN_LNG_VAR: &str = "TRAVEL_ITINERARY_ORIGIN_LNG";

/// Default start point, in Baguio City.
pub const DEFAULT_ORIGIN: Coordinate = Coordinate::new(16.41639, 120.598564);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    TomTom,
    Osrm,
    Haversine,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tomtom" => Ok(ProviderKind::TomTom),
            "osrm" => Ok(ProviderKind::Osrm),
            "haversine" => Ok(ProviderKind::Haversine),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItineraryConfig {
    pub provider: ProviderKind,
    pub tomtom: TomTomConfig,
    pub osrm: OsrmConfig,
    pub origin: Coordinate,
}

impl Default for ItineraryConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::TomTom,
            tomtom: TomTomConfig::default(),
            osrm: OsrmConfig::default(),
            origin: DEFAULT_ORIGIN,
        }
    }
}

/// Matrix and route providers selected by configuration.
pub struct Providers {
    pub matrix: Arc<dyn DistanceMatrixProvider>,
    pub router: Arc<dyn RouteProvider>,
}

impl ItineraryConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// A `provider` given here takes precedence over the provider variable.
    pub fn from_env(provider: Option<&str>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| match provider {
            Some(provider) if name == PROVIDER_VAR => Some(provider.to_string()),
            _ => env::var(name).ok(),
        })
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(provider) = lookup(PROVIDER_VAR) {
            config.provider = provider.parse()?;
        }

        if let Some(base_url) = lookup(BASE_URL_VAR) {
            config.tomtom.base_url = base_url.clone();
            config.osrm.base_url = base_url;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let timeout = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: TIMEOUT_VAR,
                value: raw.clone(),
            })?;
            config.tomtom.timeout_secs = timeout;
            config.osrm.timeout_secs = timeout;
        }

        match (lookup(ORIGIN_LAT_VAR), lookup(ORIGIN_LNG_VAR)) {
            (Some(lat), Some(lng)) => config.origin = Coordinate::parse(&lat, &lng)?,
            (None, None) => {}
            (Some(_), None) => return Err(ConfigError::Missing(ORIGIN_LNG_VAR)),
            (None, Some(_)) => return Err(ConfigError::Missing(ORIGIN_LAT_VAR)),
        }

        match lookup(API_KEY_VAR) {
            Some(key) if !key.trim().is_empty() => config.tomtom.api_key = key,
            _ if config.provider == ProviderKind::TomTom => {
                return Err(ConfigError::Missing(API_KEY_VAR));
            }
            _ => {}
        }

        Ok(config)
    }

    /// Builds the matrix and route providers for the configured backend.
    ///
    /// The haversine backend has no route service and falls back to OSRM
    /// for route calculation.
    pub fn providers(&self) -> Result<Providers, ConfigError> {
        let providers = match self.provider {
            ProviderKind::TomTom => {
                let client = Arc::new(TomTomClient::new(self.tomtom.clone())?);
                Providers {
                    matrix: client.clone(),
                    router: client,
                }
            }
            ProviderKind::Osrm => {
                let client = Arc::new(OsrmClient::new(self.osrm.clone())?);
                Providers {
                    matrix: client.clone(),
                    router: client,
                }
            }
            ProviderKind::Haversine => Providers {
                matrix: Arc::new(HaversineMatrix::default()),
                router: Arc::new(OsrmClient::new(self.osrm.clone())?),
            },
        };

        Ok(providers)
    }
}
