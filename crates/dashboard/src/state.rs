//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::client::ShipmentsClient;
use crate::config::DashboardConfig;
use crate::services::{GeocodeResolver, NominatimGeocoder, UserDirectory};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: SqlitePool,
    api: ShipmentsClient,
    geocoder: NominatimGeocoder,
}

impl AppState {
    /// Create the state, building the API and geocoder clients from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: &DashboardConfig, pool: SqlitePool) -> Result<Self, StateInitError> {
        let api = ShipmentsClient::new(config.api_url.clone())?;
        let geocoder = NominatimGeocoder::new(&config.geocoder)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                pool,
                api,
                geocoder,
            }),
        })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Shipments API client.
    #[must_use]
    pub fn api(&self) -> &ShipmentsClient {
        &self.inner.api
    }

    /// Cache-first geocoder over the shared pool.
    #[must_use]
    pub fn resolver(&self) -> GeocodeResolver<'_, NominatimGeocoder> {
        GeocodeResolver::new(&self.inner.pool, &self.inner.geocoder)
    }

    /// Mock user directory.
    #[must_use]
    pub fn directory(&self) -> UserDirectory<'_> {
        UserDirectory::new(&self.inner.pool)
    }
}
