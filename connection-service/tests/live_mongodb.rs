//! Tests against a running MongoDB server.
//!
//! Enabled with `--features tests_integration_mongodb`. The server address is
//! read from `MONGODB_TEST_URI` (default `mongodb://localhost:27017`).
#![cfg(feature = "tests_integration_mongodb")]

use common::models::ConnectionParams;
use common::utils::host_from_uri;
use connection_service::{ConnectionManager, ConnectionService};

fn test_uri() -> String {
    std::env::var("MONGODB_TEST_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

#[tokio::test]
async fn test_connect_reports_host_and_database() {
    let uri = test_uri();
    let host = host_from_uri(&uri).expect("test URI must have a host");

    let mut service = ConnectionService::new();
    let envelope = service
        .connect(&ConnectionParams::new(uri.clone(), "mydatabase"))
        .await;

    assert!(!envelope.is_error, "{}", envelope.text());
    assert!(envelope.text().contains("mydatabase"));
    assert!(envelope.text().contains(&host));
    let handle = service.handle().expect("handle after connect");
    assert_eq!(handle.host(), host);
    assert!(handle.connected_at() <= chrono::Utc::now());

    service.close().await;
    assert!(service.handle().is_none());
}

#[tokio::test]
async fn test_reconnect_replaces_handle() {
    let uri = test_uri();
    let mut manager = ConnectionManager::new();

    manager
        .open(&ConnectionParams::new(uri.clone(), "first"))
        .await
        .expect("first connect");
    let handle = manager
        .open(&ConnectionParams::new(uri, "second"))
        .await
        .expect("second connect");
    assert_eq!(handle.database_name(), "second");

    manager.close().await;
}

#[tokio::test]
async fn test_failed_reconnect_keeps_previous_handle() {
    let mut manager = ConnectionManager::new();
    manager
        .open(&ConnectionParams::new(test_uri(), "kept"))
        .await
        .expect("connect");

    assert!(manager
        .open(&ConnectionParams::new("not-a-url", "other"))
        .await
        .is_err());
    assert_eq!(
        manager.handle().map(|h| h.database_name().to_string()),
        Some("kept".to_string())
    );

    manager.close().await;
}
