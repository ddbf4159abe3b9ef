//! Confirmation flows for staff actions.
//!
//! Each action is a GET that renders a confirmation (or prompt) and a POST
//! that performs it, then returns to the dashboard with a notification.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use fleet_logistics_core::manifest::CLEAR_ALL_PHRASE;
use fleet_logistics_core::{ShipmentId, ShipmentStatus, User};

use crate::filters;
use crate::middleware::RequireStaff;
use crate::models::Flash;
use crate::services::ActionError;
use crate::services::actions::{
    ACCESS_DENIED, check_transition, clear_all, deliver, deliver_prompt, next_delivery, register_return,
    status_change_prompt, update_status,
};
use crate::state::AppState;

use super::{Page, flash_home};

/// Inline error for an empty prompt.
pub const INPUT_REQUIRED: &str = "Input required";

/// A hidden form field carried through a confirmation.
#[derive(Debug, Clone)]
pub struct Hidden {
    pub name: &'static str,
    pub value: String,
}

impl Hidden {
    fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// A text input shown by prompt dialogs.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

/// Confirmation or prompt dialog.
#[derive(Template, WebTemplate)]
#[template(path = "confirm.html")]
pub struct ConfirmTemplate {
    pub page: Page,
    pub title: &'static str,
    pub message: String,
    /// Form target.
    pub action: String,
    pub hidden: Vec<Hidden>,
    pub prompt: Option<Prompt>,
    /// Inline error under the input.
    pub error: Option<String>,
    pub danger: bool,
}

impl ConfirmTemplate {
    async fn new(
        session: &Session,
        user: User,
        title: &'static str,
        message: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            page: Page::load(session, Some(user)).await,
            title,
            message: message.into(),
            action: action.into(),
            hidden: Vec::new(),
            prompt: None,
            error: None,
            danger: false,
        }
    }

    fn hidden(mut self, field: Hidden) -> Self {
        self.hidden.push(field);
        self
    }

    fn prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    fn error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    fn danger(mut self) -> Self {
        self.danger = true;
        self
    }
}

const TRACKING_PROMPT: Prompt = Prompt {
    name: "tracking_id",
    label: "Enter Tracking ID:",
    placeholder: "TRK123",
};

const DESTINATION_PROMPT: Prompt = Prompt {
    name: "destination",
    label: "Enter Destination:",
    placeholder: "City, State",
};

const PHRASE_PROMPT: Prompt = Prompt {
    name: "phrase",
    label: "Confirmation phrase",
    placeholder: CLEAR_ALL_PHRASE,
};

/// Build the actions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shipments/{id}/status", get(confirm_status).post(apply_status))
        .route("/deliver-next", get(confirm_deliver_next).post(apply_deliver_next))
        .route("/returns/new", get(return_step_tracking).post(return_step_destination))
        .route("/returns", post(create_return))
        .route("/clear", get(confirm_clear).post(apply_clear))
}

/// Turn an action result into a notification on the dashboard.
async fn finish(session: &Session, result: Result<String, ActionError>) -> Response {
    let flash = match result {
        Ok(message) => Flash::success(message),
        Err(e) => Flash::error(e.to_string()),
    };
    flash_home(session, flash).await.into_response()
}

// =============================================================================
// Row status change
// =============================================================================

/// Query for a status change confirmation.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub to: ShipmentStatus,
}

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: ShipmentStatus,
}

/// GET /shipments/{id}/status?to=<Status>
///
/// A move the shipment's current status does not offer goes straight back
/// to the dashboard with an error.
async fn confirm_status(
    State(state): State<AppState>,
    session: Session,
    RequireStaff(user): RequireStaff,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Response {
    if let Err(e) = check_transition(state.api(), &ShipmentId::new(id.as_str()), query.to).await {
        return flash_home(&session, Flash::error(e.to_string()))
            .await
            .into_response();
    }

    ConfirmTemplate::new(
        &session,
        user,
        "Update Status",
        status_change_prompt(query.to),
        format!("/shipments/{id}/status"),
    )
    .await
    .hidden(Hidden::new("status", query.to.as_str()))
    .into_response()
}

/// POST /shipments/{id}/status
#[instrument(skip(state, session, _user))]
async fn apply_status(
    State(state): State<AppState>,
    session: Session,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Response {
    let result = update_status(state.api(), &ShipmentId::new(id), form.status).await;
    finish(&session, result).await
}

// =============================================================================
// Deliver Next
// =============================================================================

/// Deliver Next form data.
#[derive(Debug, Deserialize)]
pub struct DeliverForm {
    pub id: String,
}

/// GET /deliver-next
///
/// With nothing active, returns straight to the dashboard with a notice.
async fn confirm_deliver_next(
    State(state): State<AppState>,
    session: Session,
    RequireStaff(user): RequireStaff,
) -> Response {
    match next_delivery(state.api()).await {
        Ok(shipment) => ConfirmTemplate::new(
            &session,
            user,
            "Auto-Deliver",
            deliver_prompt(&shipment),
            "/deliver-next",
        )
        .await
        .hidden(Hidden::new("id", shipment.id.as_str()))
        .into_response(),
        Err(ActionError::Validation(message)) => {
            flash_home(&session, Flash::info(message)).await.into_response()
        }
        Err(e) => flash_home(&session, Flash::error(e.to_string()))
            .await
            .into_response(),
    }
}

/// POST /deliver-next
#[instrument(skip(state, session, _user))]
async fn apply_deliver_next(
    State(state): State<AppState>,
    session: Session,
    RequireStaff(_user): RequireStaff,
    Form(form): Form<DeliverForm>,
) -> Response {
    let result = deliver(state.api(), &ShipmentId::new(form.id)).await;
    finish(&session, result).await
}

// =============================================================================
// Register Return
// =============================================================================

/// Register Return form data; fields fill in step by step.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    pub tracking_id: String,
    #[serde(default)]
    pub destination: String,
}

/// GET /returns/new
async fn return_step_tracking(session: Session, RequireStaff(user): RequireStaff) -> ConfirmTemplate {
    ConfirmTemplate::new(&session, user, "Return", "", "/returns/new")
        .await
        .prompt(TRACKING_PROMPT)
}

/// POST /returns/new
///
/// Step 1 submitted: ask for the destination.
async fn return_step_destination(
    session: Session,
    RequireStaff(user): RequireStaff,
    Form(form): Form<ReturnForm>,
) -> ConfirmTemplate {
    let tracking_id = form.tracking_id.trim();
    if tracking_id.is_empty() {
        return ConfirmTemplate::new(&session, user, "Return", "", "/returns/new")
            .await
            .prompt(TRACKING_PROMPT)
            .error(INPUT_REQUIRED);
    }

    ConfirmTemplate::new(&session, user, "Return", format!("Tracking ID: {tracking_id}"), "/returns")
        .await
        .hidden(Hidden::new("tracking_id", tracking_id))
        .prompt(DESTINATION_PROMPT)
}

/// POST /returns
#[instrument(skip(state, session, user))]
async fn create_return(
    State(state): State<AppState>,
    session: Session,
    RequireStaff(user): RequireStaff,
    Form(form): Form<ReturnForm>,
) -> Response {
    if form.destination.trim().is_empty() {
        let tracking_id = form.tracking_id.trim();
        return ConfirmTemplate::new(
            &session,
            user,
            "Return",
            format!("Tracking ID: {tracking_id}"),
            "/returns",
        )
        .await
        .hidden(Hidden::new("tracking_id", tracking_id))
        .prompt(DESTINATION_PROMPT)
        .error(INPUT_REQUIRED)
        .into_response();
    }

    let result = register_return(state.api(), &form.tracking_id, &form.destination).await;
    finish(&session, result).await
}

// =============================================================================
// Clear All Data
// =============================================================================

/// Clear-all form data.
#[derive(Debug, Deserialize)]
pub struct ClearForm {
    #[serde(default)]
    pub phrase: String,
}

fn clear_message() -> String {
    format!("This deletes every shipment. Type {CLEAR_ALL_PHRASE} to confirm.")
}

/// GET /clear
async fn confirm_clear(session: Session, RequireStaff(user): RequireStaff) -> Response {
    if !user.role.can_clear_data() {
        return flash_home(&session, Flash::error(ACCESS_DENIED))
            .await
            .into_response();
    }
    ConfirmTemplate::new(&session, user, "Clear Data", clear_message(), "/clear")
        .await
        .prompt(PHRASE_PROMPT)
        .danger()
        .into_response()
}

/// POST /clear
#[instrument(skip(state, session, user, form))]
async fn apply_clear(
    State(state): State<AppState>,
    session: Session,
    RequireStaff(user): RequireStaff,
    Form(form): Form<ClearForm>,
) -> Response {
    if user.role.can_clear_data() && form.phrase.trim().is_empty() {
        return ConfirmTemplate::new(&session, user, "Clear Data", clear_message(), "/clear")
            .await
            .prompt(PHRASE_PROMPT)
            .danger()
            .error(INPUT_REQUIRED)
            .into_response();
    }

    let result = clear_all(state.api(), user.role, &form.phrase).await;
    finish(&session, result).await
}
