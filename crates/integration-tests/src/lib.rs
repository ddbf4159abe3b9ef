//! Integration tests for Fleet Logistics.
//!
//! Each test starts its own shipments API, dashboard and stub geocoder on
//! ephemeral ports, backed by `SQLite` files in a temporary directory, and
//! drives them over real HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fleet-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_contract` - REST contract of the shipments API
//! - `dashboard_auth` - Login, signup, logout and role routing
//! - `dashboard_actions` - Staff actions end to end through the API

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use fleet_logistics_api::config::ApiConfig;
use fleet_logistics_core::Shipment;
use fleet_logistics_dashboard::config::DashboardConfig;
use reqwest::Client;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use url::Url;

/// Addresses the stub geocoder refuses to resolve.
pub const UNKNOWN_PLACE: &str = "Nowhere";

/// Running servers for one test.
pub struct TestContext {
    /// Cookie-aware client; follows redirects like a browser.
    pub client: Client,
    pub api_url: String,
    pub dashboard_url: String,
    _dir: TempDir,
}

impl TestContext {
    /// Start the API (optionally seeded with the demo manifest), a stub
    /// geocoder and the dashboard.
    pub async fn start(seed: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();

        let api_db = sqlite_url(&dir, "api.db");
        let api_state = fleet_logistics_api::prepare(ApiConfig::local(&api_db, seed))
            .await
            .unwrap();
        let api_addr = serve(fleet_logistics_api::app(api_state)).await;
        let api_url = format!("http://{api_addr}");

        let geocoder_addr = serve(geocoder()).await;

        let dashboard_addr = start_dashboard(
            &dir,
            &format!("{api_url}/shipments"),
            &format!("http://{geocoder_addr}/search"),
        )
        .await;

        Self {
            client: browser(),
            api_url,
            dashboard_url: format!("http://{dashboard_addr}"),
            _dir: dir,
        }
    }

    /// Start only a dashboard whose API address refuses connections.
    pub async fn offline() -> Self {
        let dir = tempfile::tempdir().unwrap();

        // Bind then drop to obtain a port nothing listens on.
        let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let api_url = format!("http://{}", closed.local_addr().unwrap());
        drop(closed);

        let dashboard_addr = start_dashboard(
            &dir,
            &format!("{api_url}/shipments"),
            &format!("{api_url}/search"),
        )
        .await;

        Self {
            client: browser(),
            api_url,
            dashboard_url: format!("http://{dashboard_addr}"),
            _dir: dir,
        }
    }

    /// Absolute dashboard URL for `path`.
    #[must_use]
    pub fn page(&self, path: &str) -> String {
        format!("{}{path}", self.dashboard_url)
    }

    /// Absolute API URL for `path`.
    #[must_use]
    pub fn api(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    /// Log in through the form and return the landing page HTML.
    pub async fn login(&self, email: &str, password: &str) -> String {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// Submit a dashboard form and return the HTML after redirects.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> String {
        let response = self.client.post(self.page(path)).form(form).send().await.unwrap();
        assert!(response.status().is_success(), "POST {path}: {}", response.status());
        response.text().await.unwrap()
    }

    /// Fetch a dashboard page as HTML.
    pub async fn get_page(&self, path: &str) -> String {
        let response = self.client.get(self.page(path)).send().await.unwrap();
        assert!(response.status().is_success(), "GET {path}: {}", response.status());
        response.text().await.unwrap()
    }

    /// Every shipment, straight from the API.
    pub async fn shipments(&self) -> Vec<Shipment> {
        self.client
            .get(self.api("/shipments"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    /// The API's shipment with `tracking_id`, if any.
    pub async fn shipment(&self, tracking_id: &str) -> Option<Shipment> {
        self.shipments()
            .await
            .into_iter()
            .find(|s| s.tracking_id.as_str() == tracking_id)
    }

    /// Create a shipment directly through the API.
    pub async fn create_shipment(&self, body: &Value) -> Shipment {
        let response = self
            .client
            .post(self.api("/shipments"))
            .json(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.unwrap()
    }
}

fn browser() -> Client {
    Client::builder().cookie_store(true).build().unwrap()
}

fn sqlite_url(dir: &TempDir, name: &str) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join(name).display())
}

async fn start_dashboard(dir: &TempDir, api_url: &str, geocoder_url: &str) -> SocketAddr {
    let config = DashboardConfig::local(
        &sqlite_url(dir, "dashboard.db"),
        Url::parse(api_url).unwrap(),
        Url::parse(geocoder_url).unwrap(),
    );
    let (state, session_layer) = fleet_logistics_dashboard::prepare(config).await.unwrap();
    serve(fleet_logistics_dashboard::app(state, session_layer)).await
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Nominatim-shaped stub: every query resolves to Dallas except
/// [`UNKNOWN_PLACE`], which has no results.
fn geocoder() -> Router {
    Router::new().route(
        "/search",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let query = params.get("q").map(String::as_str).unwrap_or_default();
            if query.contains(UNKNOWN_PLACE) {
                Json(json!([]))
            } else {
                Json(json!([{ "lat": "32.7767", "lon": "-96.7970" }]))
            }
        }),
    )
}
