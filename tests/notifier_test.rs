//! Provisioning approval followed by the status-0 notification sweep.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use sendit_api::domain::{AccountStatus, ParcelStatus};
use sendit_api::jobs::NotificationSweep;

#[tokio::test]
async fn test_sweep_moves_provisioned_parcel_to_pending() {
    let app = TestApp::new();
    let created = app.book_order("carol@example.com").await;
    let order = &created["order"];

    let (status, body) = app
        .post(
            &format!("/api/v1/orders/{}/approve", order["_id"].as_str().unwrap()),
            json!({
                "weight": 1.5,
                "cost": 900.0,
                "originBranch": order["originBranch"],
                "destinationBranch": order["destinationBranch"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let parcel_id = body["parcel"]["_id"].as_str().unwrap().to_string();

    let user = app.store.user_by_email("carol@example.com").unwrap();
    assert_eq!(user.status, AccountStatus::NotifyPending);

    let sweep = NotificationSweep::new(Arc::new(app.store.clone()), app.notifier.clone());
    let report = sweep.run_once().await.unwrap();
    assert_eq!(report.parcels_notified, 1);
    assert_eq!(report.emails_queued, 2);
    assert_eq!(report.users_activated, 1);
    assert_eq!(report.parcels_deferred, 0);

    let recipients = app.notifier.recipients();
    assert!(recipients.contains(&"bob@example.com".to_string()));
    assert_eq!(
        recipients.iter().filter(|r| *r == "carol@example.com").count(),
        2,
        "credentials email plus the pending notice"
    );

    let (_, tracked) = app
        .get(&format!("/api/v1/parcels/track/{}", parcel_id))
        .await;
    assert_eq!(tracked["data"]["status"], ParcelStatus::Pending.code());
    assert_eq!(tracked["data"]["statusLabel"], "Pending");

    let user = app.store.user_by_email("carol@example.com").unwrap();
    assert_eq!(user.status, AccountStatus::Active);
}

#[tokio::test]
async fn test_sweep_with_nothing_pending() {
    let app = TestApp::new();
    let sweep = NotificationSweep::new(Arc::new(app.store.clone()), app.notifier.clone());

    let report = sweep.run_once().await.unwrap();
    assert_eq!(report.parcels_notified, 0);
    assert_eq!(report.emails_queued, 0);
    assert!(app.notifier.recipients().is_empty());
}
