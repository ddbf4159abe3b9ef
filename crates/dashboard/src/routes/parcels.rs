//! Add Parcel.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use fleet_logistics_core::Priority;

use crate::filters;
use crate::middleware::RequireStaff;
use crate::models::Flash;
use crate::services::ActionError;
use crate::services::actions::add_parcel;
use crate::state::AppState;

use super::{Page, flash_home};

/// Add parcel form data.
#[derive(Debug, Deserialize)]
pub struct ParcelForm {
    pub tracking_id: String,
    pub destination: String,
    #[serde(default)]
    pub priority: Priority,
}

/// One `<option>` of the priority select.
#[derive(Debug, Clone)]
pub struct PriorityOption {
    pub value: &'static str,
    pub selected: bool,
}

fn priority_options(selected: Priority) -> Vec<PriorityOption> {
    Priority::ALL
        .iter()
        .map(|&p| PriorityOption {
            value: p.as_str(),
            selected: p == selected,
        })
        .collect()
}

/// Add parcel form template.
#[derive(Template, WebTemplate)]
#[template(path = "parcel_form.html")]
pub struct ParcelFormTemplate {
    pub page: Page,
    pub tracking_id: String,
    pub destination: String,
    pub priorities: Vec<PriorityOption>,
    /// Shown under the form, e.g. "Invalid Location."
    pub error: Option<String>,
}

/// Build the parcels router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parcels/new", get(new_parcel))
        .route("/parcels", post(create_parcel))
}

/// GET /parcels/new
async fn new_parcel(session: Session, RequireStaff(user): RequireStaff) -> ParcelFormTemplate {
    ParcelFormTemplate {
        page: Page::load(&session, Some(user)).await,
        tracking_id: String::new(),
        destination: String::new(),
        priorities: priority_options(Priority::default()),
        error: None,
    }
}

/// POST /parcels
///
/// The destination must geocode before anything is sent to the API.
#[instrument(skip(state, session, user))]
async fn create_parcel(
    State(state): State<AppState>,
    session: Session,
    RequireStaff(user): RequireStaff,
    Form(form): Form<ParcelForm>,
) -> Response {
    let resolver = state.resolver();
    let result = add_parcel(
        state.api(),
        &resolver,
        &form.tracking_id,
        &form.destination,
        form.priority,
    )
    .await;

    let (flash, error) = match result {
        Ok(message) => return flash_home(&session, Flash::success(message)).await.into_response(),
        Err(ActionError::Validation(message)) => (None, Some(message)),
        Err(e) => (Some(Flash::error(e.to_string())), None),
    };

    let mut page = Page::load(&session, Some(user)).await;
    page.flash = flash.or(page.flash.take());
    ParcelFormTemplate {
        page,
        tracking_id: form.tracking_id,
        destination: form.destination,
        priorities: priority_options(form.priority),
        error,
    }
    .into_response()
}
