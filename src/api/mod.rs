//! Read-through HTTP API over the listing store

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info};
use serde::{Serialize, Deserialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::store::ListingStore;

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn ListingStore>,
}

/// Body of `GET /api/nft/activeListings`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveListingsResponse {
    pub status: String,
    pub active_listings: Vec<String>,
}

/// Body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create the API router
pub fn create_router(store: Arc<dyn ListingStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/nft/activeListings", get(active_listings))
        .with_state(ApiState { store })
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Serve the API until the listener fails
pub async fn serve(addr: SocketAddr, store: Arc<dyn ListingStore>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listings API listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(store)).await
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn active_listings(State(state): State<ApiState>) -> Response {
    match state.store.active_listings().await {
        Ok(active_listings) => Json(ActiveListingsResponse {
            status: "success".to_string(),
            active_listings,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to read active listings: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    status: "error".to_string(),
                    message: "Internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}
