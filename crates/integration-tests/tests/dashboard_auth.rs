//! Integration tests for dashboard authentication and role routing.

use fleet_integration_tests::TestContext;

const ADMIN: (&str, &str) = ("admin@fleetlogistics.com", "admin123");
const CUSTOMER: (&str, &str) = ("customer@example.com", "customer123");

#[tokio::test]
async fn test_anonymous_visitor_lands_on_login() {
    let ctx = TestContext::start(true).await;

    let html = ctx.get_page("/").await;
    assert!(html.contains("Not for production use."));
    assert!(html.contains("admin@fleetlogistics.com"));
}

#[tokio::test]
async fn test_admin_login_shows_full_manifest() {
    let ctx = TestContext::start(true).await;

    let html = ctx.login(ADMIN.0, ADMIN.1).await;

    assert!(html.contains("Welcome, Admin"));
    assert!(html.contains("Active Manifest"));
    assert!(html.contains("API Online"));
    assert!(html.contains("High Priority"));
    for tracking_id in ["TRK001", "TRK002", "TRK003", "TRK999"] {
        assert!(html.contains(tracking_id), "missing {tracking_id}");
    }
}

#[tokio::test]
async fn test_customer_sees_only_allowed_shipments() {
    let ctx = TestContext::start(true).await;

    let html = ctx.login(CUSTOMER.0, CUSTOMER.1).await;

    assert!(html.contains("My Shipments"));
    assert!(html.contains("TRK001"));
    assert!(!html.contains("TRK999"));
    assert!(!html.contains("Active Manifest"));
}

#[tokio::test]
async fn test_wrong_password_stays_on_login() {
    let ctx = TestContext::start(true).await;

    let html = ctx.login(ADMIN.0, "nope").await;

    assert!(html.contains("Invalid credentials."));
    assert!(!html.contains("Active Manifest"));
}

#[tokio::test]
async fn test_logout_returns_to_login() {
    let ctx = TestContext::start(true).await;
    ctx.login(ADMIN.0, ADMIN.1).await;

    let html = ctx.post_form("/logout", &[]).await;
    assert!(html.contains(r#"<div class="toast toast-info" role="status">Logged out.</div>"#));

    let html = ctx.get_page("/").await;
    assert!(html.contains("Not for production use."));
}

#[tokio::test]
async fn test_signup_then_login_as_staff() {
    let ctx = TestContext::start(true).await;

    let html = ctx
        .post_form(
            "/signup",
            &[
                ("email", "dispatch@fleet.test"),
                ("password", "hunter2"),
                ("confirm_password", "hunter2"),
            ],
        )
        .await;
    assert!(html.contains("Account created! Please log in."));

    let html = ctx.login("dispatch@fleet.test", "hunter2").await;
    assert!(html.contains("Welcome, dispatch"));
    assert!(html.contains("Active Manifest"));
}

#[tokio::test]
async fn test_signup_cannot_shadow_built_in_account() {
    let ctx = TestContext::start(true).await;

    let html = ctx
        .post_form(
            "/signup",
            &[
                ("email", ADMIN.0),
                ("password", "other"),
                ("confirm_password", "other"),
            ],
        )
        .await;
    assert!(html.contains("Account already exists."));

    let html = ctx.login(ADMIN.0, ADMIN.1).await;
    assert!(html.contains("Welcome, Admin"));
}

#[tokio::test]
async fn test_signup_password_mismatch() {
    let ctx = TestContext::start(true).await;

    let html = ctx
        .post_form(
            "/signup",
            &[
                ("email", "dispatch@fleet.test"),
                ("password", "a"),
                ("confirm_password", "b"),
            ],
        )
        .await;
    assert!(html.contains("Passwords do not match."));
}

#[tokio::test]
async fn test_customer_cannot_open_staff_actions() {
    let ctx = TestContext::start(true).await;
    ctx.login(CUSTOMER.0, CUSTOMER.1).await;

    let html = ctx.get_page("/parcels/new").await;
    assert!(html.contains("Access Denied"));
    assert!(html.contains("My Shipments"));
}

#[tokio::test]
async fn test_offline_api_renders_error_state() {
    let ctx = TestContext::offline().await;

    let html = ctx.login(ADMIN.0, ADMIN.1).await;

    assert!(html.contains("API Offline"));
    assert!(html.contains("Cannot connect to server."));
    assert!(html.contains("ERR"));
}
