//! Integration tests for staff actions, driven through the dashboard and
//! checked against the shipments API.

use fleet_integration_tests::{TestContext, UNKNOWN_PLACE};
use fleet_logistics_core::manifest::select_next_delivery;
use fleet_logistics_core::{Priority, ShipmentStatus};
use serde_json::json;

async fn as_admin(seed: bool) -> TestContext {
    let ctx = TestContext::start(seed).await;
    ctx.login("admin@fleetlogistics.com", "admin123").await;
    ctx
}

#[tokio::test]
async fn test_row_menu_offers_transitions() {
    let ctx = as_admin(true).await;
    let trk002 = ctx.shipment("TRK002").await.unwrap();

    let html = ctx.get_page(&format!("/?menu={}", trk002.id)).await;

    assert!(html.contains("Start Transit"));
    assert!(html.contains("Mark Delivered"));
    assert!(html.contains("Mark Returned"));
}

#[tokio::test]
async fn test_status_change_updates_api() {
    let ctx = as_admin(true).await;
    let trk002 = ctx.shipment("TRK002").await.unwrap();
    let path = format!("/shipments/{}/status", trk002.id);

    let html = ctx.get_page(&format!("{path}?to=Processing")).await;
    assert!(html.contains("Change status to Processing?"));

    let html = ctx.post_form(&path, &[("status", "Processing")]).await;
    assert!(html.contains("Updated to Processing"));

    let updated = ctx.shipment("TRK002").await.unwrap();
    assert_eq!(updated.status, ShipmentStatus::Processing);
}

#[tokio::test]
async fn test_delivered_shipment_cannot_be_rescheduled() {
    let ctx = as_admin(false).await;
    let delivered = ctx
        .create_shipment(&json!({
            "trackingId": "TRK100",
            "destination": "1 Elm St, Austin, TX",
            "priority": "High",
            "status": "Delivered"
        }))
        .await;
    let path = format!("/shipments/{}/status", delivered.id);
    let refused = "Cannot change TRK100 from Delivered to Scheduled.";

    let html = ctx.get_page(&format!("{path}?to=Scheduled")).await;
    assert!(html.contains(refused));
    assert!(!html.contains("Change status to Scheduled?"));

    let html = ctx.post_form(&path, &[("status", "Scheduled")]).await;
    assert!(html.contains(refused));

    let unchanged = ctx.shipment("TRK100").await.unwrap();
    assert_eq!(unchanged.status, ShipmentStatus::Delivered);
}

#[tokio::test]
async fn test_deliver_next_delivers_selected_shipment() {
    let ctx = as_admin(true).await;
    let shipments = ctx.shipments().await;
    let next = select_next_delivery(&shipments).unwrap().clone();

    let html = ctx.get_page("/deliver-next").await;
    assert!(html.contains(&format!("Deliver {}?", next.tracking_id)));

    let html = ctx.post_form("/deliver-next", &[("id", next.id.as_str())]).await;
    assert!(html.contains("Delivered!"));

    let delivered = ctx.shipment(next.tracking_id.as_str()).await.unwrap();
    assert_eq!(delivered.status, ShipmentStatus::Delivered);
}

#[tokio::test]
async fn test_deliver_next_with_nothing_active() {
    let ctx = as_admin(false).await;
    ctx.create_shipment(&json!({
        "trackingId": "TRK100",
        "destination": "1 Elm St, Austin, TX",
        "priority": "High",
        "status": "Delivered"
    }))
    .await;

    let html = ctx.get_page("/deliver-next").await;
    assert!(html.contains("No active shipments"));
}

#[tokio::test]
async fn test_add_parcel_geocodes_and_creates() {
    let ctx = as_admin(false).await;

    let html = ctx
        .post_form(
            "/parcels",
            &[
                ("tracking_id", "TRK500"),
                ("destination", "500 Commerce St, Dallas, TX"),
                ("priority", "High"),
            ],
        )
        .await;
    assert!(html.contains("Parcel Added: TRK500"));

    let created = ctx.shipment("TRK500").await.unwrap();
    assert_eq!(created.status, ShipmentStatus::Scheduled);
    assert_eq!(created.priority, Priority::High);
    assert_eq!(created.destination, "500 Commerce St, Dallas, TX");
}

#[tokio::test]
async fn test_add_parcel_rejects_unknown_location() {
    let ctx = as_admin(false).await;

    let html = ctx
        .post_form(
            "/parcels",
            &[
                ("tracking_id", "TRK501"),
                ("destination", UNKNOWN_PLACE),
                ("priority", "Low"),
            ],
        )
        .await;
    assert!(html.contains("Invalid Location."));
    assert!(ctx.shipment("TRK501").await.is_none());
}

#[tokio::test]
async fn test_register_return_in_two_steps() {
    let ctx = as_admin(false).await;

    let html = ctx.post_form("/returns/new", &[("tracking_id", "TRK777")]).await;
    assert!(html.contains("Tracking ID: TRK777"));
    assert!(html.contains("Enter Destination:"));

    let html = ctx
        .post_form(
            "/returns",
            &[("tracking_id", "TRK777"), ("destination", "9 Dock Rd, Tampa, FL")],
        )
        .await;
    assert!(html.contains("Return Registered"));

    let returned = ctx.shipment("TRK777").await.unwrap();
    assert_eq!(returned.status, ShipmentStatus::Returned);
    assert_eq!(returned.priority, Priority::High);
}

#[tokio::test]
async fn test_register_return_requires_input() {
    let ctx = as_admin(false).await;

    let html = ctx.post_form("/returns/new", &[("tracking_id", "  ")]).await;
    assert!(html.contains("Input required"));
    assert!(html.contains("Enter Tracking ID:"));
}

#[tokio::test]
async fn test_admin_clear_requires_exact_phrase() {
    let ctx = as_admin(false).await;
    ctx.create_shipment(&json!({
        "trackingId": "TRK100",
        "destination": "1 Elm St, Austin, TX",
        "priority": "Medium"
    }))
    .await;

    let html = ctx.get_page("/clear").await;
    assert!(html.contains("DELETE ALL"));

    let html = ctx.post_form("/clear", &[("phrase", "delete all")]).await;
    assert!(html.contains("Confirmation phrase did not match."));
    assert_eq!(ctx.shipments().await.len(), 1);

    let html = ctx.post_form("/clear", &[("phrase", "DELETE ALL")]).await;
    assert!(html.contains("All data cleared."));
    assert!(html.contains("No shipments found."));
    assert!(ctx.shipments().await.is_empty());
}

#[tokio::test]
async fn test_staff_cannot_clear_data() {
    let ctx = TestContext::start(true).await;
    ctx.post_form(
        "/signup",
        &[
            ("email", "dispatch@fleet.test"),
            ("password", "pw"),
            ("confirm_password", "pw"),
        ],
    )
    .await;
    ctx.login("dispatch@fleet.test", "pw").await;

    let html = ctx.get_page("/clear").await;
    assert!(html.contains("Access Denied"));

    let html = ctx.post_form("/clear", &[("phrase", "DELETE ALL")]).await;
    assert!(html.contains("Access Denied"));
    assert_eq!(ctx.shipments().await.len(), 4);
}

#[tokio::test]
async fn test_map_toggle_embeds_markers() {
    let ctx = as_admin(true).await;

    let html = ctx.get_page("/").await;
    assert!(html.contains("Show Map"));

    let html = ctx.post_form("/map/toggle", &[]).await;
    assert!(html.contains("Hide Map"));
    assert!(html.contains("TRK999"));
    assert!(html.contains("fitBounds"));
}
