//! Address geocoding with a persistent cache.
//!
//! Lookups go to a Nominatim-compatible search endpoint. Results are kept in
//! `client_state` under the normalized address and never expire.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::instrument;
use url::Url;

use fleet_logistics_core::geo::{Coordinates, normalize_address};

use crate::config::GeocoderConfig;
use crate::db::ClientState;

/// `client_state` namespace for cached coordinates.
pub const GEOCODE_NAMESPACE: &str = "geocode";

/// Geocoding service failure.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoder returned an unparseable coordinate: {0}")]
    InvalidCoordinate(String),
}

/// External address search, first match only.
pub trait Geocoder: Send + Sync {
    /// Look up a free-text address. `Ok(None)` means no match.
    fn search(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<Coordinates>, GeocodeError>> + Send;
}

/// One search hit. Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl Place {
    fn coordinates(&self) -> Result<Coordinates, GeocodeError> {
        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::InvalidCoordinate(s.to_string()))
        };
        Ok(Coordinates::new(parse(&self.lat)?, parse(&self.lon)?))
    }
}

/// Nominatim search client.
#[derive(Clone)]
pub struct NominatimGeocoder {
    inner: Arc<NominatimInner>,
}

struct NominatimInner {
    client: reqwest::Client,
    url: Url,
}

impl NominatimGeocoder {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &GeocoderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            inner: Arc::new(NominatimInner {
                client,
                url: config.url.clone(),
            }),
        })
    }

    fn search_url(&self, address: &str) -> Url {
        let mut url = self.inner.url.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }
}

impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn search(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let places: Vec<Place> = self
            .inner
            .client
            .get(self.search_url(address))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        places.first().map(Place::coordinates).transpose()
    }
}

/// Cache-first resolver.
pub struct GeocodeResolver<'a, G> {
    cache: ClientState<'a>,
    geocoder: &'a G,
}

impl<'a, G: Geocoder> GeocodeResolver<'a, G> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, geocoder: &'a G) -> Self {
        Self {
            cache: ClientState::new(pool, GEOCODE_NAMESPACE),
            geocoder,
        }
    }

    /// Coordinates for an address, or `None` if it cannot be placed.
    ///
    /// Blank addresses, service errors and empty results all yield `None`;
    /// failures are logged, never returned.
    #[instrument(skip(self))]
    pub async fn resolve(&self, address: &str) -> Option<Coordinates> {
        let key = normalize_address(address)?;

        match self.cache.get::<Coordinates>(&key).await {
            Ok(Some(hit)) => return Some(hit),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "geocode cache read failed"),
        }

        let coordinates = match self.geocoder.search(address).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                tracing::debug!("no geocoding result");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "geocoding failed");
                return None;
            }
        };

        if let Err(e) = self.cache.set(&key, &coordinates).await {
            tracing::warn!(error = %e, "geocode cache write failed");
        }
        Some(coordinates)
    }
}
