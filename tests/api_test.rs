use async_trait::async_trait;
use auction_house_sync::api::{create_router, ActiveListingsResponse, ErrorResponse};
use auction_house_sync::errors::{SyncError, SyncResult};
use auction_house_sync::models::LedgerDelta;
use auction_house_sync::store::{ListingStore, MemoryStore};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

struct BrokenStore;

#[async_trait]
impl ListingStore for BrokenStore {
    async fn cursor(&self) -> SyncResult<Option<String>> {
        Err(SyncError::Storage("unreachable".to_string()))
    }

    async fn commit(&self, _delta: &LedgerDelta, _signature: &str) -> SyncResult<()> {
        Err(SyncError::Commit("unreachable".to_string()))
    }

    async fn active_listings(&self) -> SyncResult<Vec<String>> {
        Err(SyncError::Storage("unreachable".to_string()))
    }

    async fn contains(&self, _receipt: &str) -> SyncResult<bool> {
        Err(SyncError::Storage("unreachable".to_string()))
    }

    async fn reset_cursor(&self) -> SyncResult<()> {
        Err(SyncError::Storage("unreachable".to_string()))
    }
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_active_listings_reads_through_store() {
    let store = Arc::new(MemoryStore::new());
    let delta: LedgerDelta = vec![("R2", 1), ("R1", 1)].into_iter().collect();
    store.commit(&delta, "sig-1").await.unwrap();

    let (status, body) = get(create_router(store), "/api/nft/activeListings").await;
    assert_eq!(status, StatusCode::OK);

    let parsed: ActiveListingsResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed.status, "success");
    assert_eq!(parsed.active_listings, vec!["R1", "R2"]);

    // Wire format uses camelCase keys
    let raw: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(raw.get("activeListings").is_some());
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let (status, body) = get(create_router(Arc::new(BrokenStore)), "/api/nft/activeListings").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed.status, "error");
    assert_eq!(parsed.message, "Internal server error");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(create_router(Arc::new(MemoryStore::new())), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let raw: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(raw["status"], "ok");
    assert_eq!(raw["version"], auction_house_sync::VERSION);
}
