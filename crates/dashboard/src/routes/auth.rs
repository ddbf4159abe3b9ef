//! Login, signup and logout.
//!
//! **Mock authentication, not for production.** Credentials are compared in
//! plaintext against the built-in accounts and the signup directory.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use fleet_logistics_core::{BUILT_IN_ACCOUNTS, BuiltInAccount};

use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user, set_flash};
use crate::models::Flash;
use crate::services::SignupError;
use crate::services::directory::SignupRequest;
use crate::state::AppState;

use super::Page;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: Page,
    pub email: String,
    pub demo_accounts: &'static [BuiltInAccount],
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub page: Page,
    pub email: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", post(logout))
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /login
async fn login_page(session: Session, OptionalAuth(user): OptionalAuth) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate {
        page: Page::load(&session, None).await,
        email: String::new(),
        demo_accounts: &BUILT_IN_ACCOUNTS,
    }
    .into_response()
}

/// POST /login
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Some(user) = state
        .directory()
        .authenticate(&form.email, &form.password)
        .await?
    else {
        tracing::info!("login rejected");
        return Ok(LoginTemplate {
            page: Page::default().with_flash(Flash::error("Invalid credentials.")),
            email: form.email,
            demo_accounts: &BUILT_IN_ACCOUNTS,
        }
        .into_response());
    };

    set_current_user(&session, &user).await?;
    set_flash(&session, Flash::success(format!("Welcome, {}", user.username))).await?;
    tracing::info!(role = %user.role, "user signed in");
    Ok(Redirect::to("/").into_response())
}

/// GET /signup
async fn signup_page(session: Session, OptionalAuth(user): OptionalAuth) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    SignupTemplate {
        page: Page::load(&session, None).await,
        email: String::new(),
    }
    .into_response()
}

/// POST /signup
///
/// Registers a Staff account and returns to login without signing in.
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let request = SignupRequest {
        email: &form.email,
        password: &form.password,
        confirm_password: &form.confirm_password,
        username: None,
    };

    match state.directory().sign_up(request).await {
        Ok(_) => {
            set_flash(&session, Flash::success("Account created! Please log in.")).await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(SignupError::State(e)) => Err(e.into()),
        Err(e) => Ok(SignupTemplate {
            page: Page::default().with_flash(Flash::error(e.to_string())),
            email: form.email,
        }
        .into_response()),
    }
}

/// POST /logout
async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    set_flash(&session, Flash::info("Logged out.")).await?;
    Ok(Redirect::to("/login"))
}
