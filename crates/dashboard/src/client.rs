//! Shipments API client.
//!
//! Four calls against one resource. Every failure collapses to a single
//! display message; there is no retry.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fleet_logistics_core::{NewShipment, Shipment, ShipmentId, ShipmentStatus, StatusUpdate};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

/// Message used when `GET /shipments` fails for any reason.
pub const LIST_FAILED: &str = "API Error";

/// A failed API call, reduced to what the user is shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        tracing::warn!(error = %e, "shipments API request failed");
        Self::new("Could not reach the shipments API")
    }
}

/// Operations the dashboard needs from the shipments API.
///
/// Implemented by [`ShipmentsClient`]; tests substitute an in-memory fake.
pub trait ShipmentApi: Send + Sync {
    /// Fetch every shipment.
    fn list(&self) -> impl Future<Output = Result<Vec<Shipment>, ApiError>> + Send;

    /// Create a shipment and return it as stored.
    fn create(&self, data: &NewShipment) -> impl Future<Output = Result<Shipment, ApiError>> + Send;

    /// Set a shipment's status.
    fn update_status(
        &self,
        id: &ShipmentId,
        status: ShipmentStatus,
    ) -> impl Future<Output = Result<Shipment, ApiError>> + Send;

    /// Delete every shipment.
    fn clear_all(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the shipments API.
#[derive(Clone)]
pub struct ShipmentsClient {
    inner: Arc<ShipmentsClientInner>,
}

struct ShipmentsClientInner {
    client: reqwest::Client,
    /// Collection URL, e.g. `http://127.0.0.1:5000/shipments`
    base: Url,
}

impl ShipmentsClient {
    /// Create a client for the given `/shipments` endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base: Url) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(ShipmentsClientInner { client, base }),
        })
    }

    /// The configured collection URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    /// URL of a path below the collection (`{base}/{segment}`).
    fn url_for(&self, segment: &str) -> Url {
        let mut url = self.inner.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        url
    }
}

/// Turn a non-success response into an [`ApiError`].
///
/// Prefers the body's `message`, falling back to the status text.
async fn failure(response: Response) -> ApiError {
    let status = response.status();
    let body = response.json::<ErrorBody>().await.ok();

    match body.and_then(|b| b.message) {
        Some(message) => ApiError::new(message),
        None => ApiError::new(status_text(status)),
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), str::to_string)
}

impl ShipmentApi for ShipmentsClient {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Shipment>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.inner.base.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "shipments API unreachable");
                ApiError::new(LIST_FAILED)
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "listing shipments failed");
            return Err(ApiError::new(LIST_FAILED));
        }

        response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "shipment list did not decode");
            ApiError::new(LIST_FAILED)
        })
    }

    #[instrument(skip(self, data), fields(tracking_id = %data.tracking_id))]
    async fn create(&self, data: &NewShipment) -> Result<Shipment, ApiError> {
        let response = self
            .inner
            .client
            .post(self.inner.base.clone())
            .json(data)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(response.json().await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn update_status(
        &self,
        id: &ShipmentId,
        status: ShipmentStatus,
    ) -> Result<Shipment, ApiError> {
        let response = self
            .inner
            .client
            .put(self.url_for(id.as_str()))
            .json(&StatusUpdate { status })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn clear_all(&self) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .delete(self.url_for("clear"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(())
    }
}
