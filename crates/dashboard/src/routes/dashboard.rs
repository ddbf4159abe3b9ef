//! View dispatch.
//!
//! `GET /` renders the staff dashboard or the customer portal depending on
//! the session's role, re-fetching the manifest every time.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use fleet_logistics_core::ShipmentId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAuth, RequireStaff, map_open, take_map_just_opened, toggle_map};
use crate::services::dashboard::{DashboardView, MapPanel, refresh};
use crate::state::AppState;

use super::Page;

/// Query parameters for the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Shipment whose action menu is open.
    pub menu: Option<String>,
}

/// Staff dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct StaffDashboardTemplate {
    pub page: Page,
    pub view: DashboardView,
    pub map_open: bool,
    /// Serialized map frame for `static/js/map.js`.
    pub map_json: String,
}

/// Customer portal template.
#[derive(Template, WebTemplate)]
#[template(path = "portal.html")]
pub struct CustomerPortalTemplate {
    pub page: Page,
    pub view: DashboardView,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/map/toggle", post(map_toggle))
}

/// GET /
///
/// Anonymous visitors are redirected to `/login`.
#[instrument(skip(state, session, user))]
async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let mut page = Page::load(&session, Some(user.clone())).await;
    let panel = MapPanel {
        open: map_open(&session).await,
        just_opened: take_map_just_opened(&session).await,
    };
    let open_menu = query.menu.map(ShipmentId::new);

    let resolver = state.resolver();
    let view = refresh(state.api(), &resolver, user, open_menu.as_ref(), panel).await;
    page.api = Some(view.api);

    if view.is_staff() {
        let map_json = view
            .map
            .as_ref()
            .map_or_else(|| "null".to_string(), |frame| frame.to_json());
        StaffDashboardTemplate {
            page,
            view,
            map_open: panel.open,
            map_json,
        }
        .into_response()
    } else {
        CustomerPortalTemplate { page, view }.into_response()
    }
}

/// POST /map/toggle
///
/// Opening the panel also re-renders the manifest and markers.
async fn map_toggle(session: Session, RequireStaff(_user): RequireStaff) -> Result<Redirect, AppError> {
    let open = toggle_map(&session).await?;
    tracing::debug!(open, "map panel toggled");
    Ok(Redirect::to("/"))
}
