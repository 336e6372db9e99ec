//! Integration test support for Backstock.
//!
//! Spins up an in-process axum backend implementing the item store's REST
//! contract, backed by [`MemoryStore`], so the real `RestStore` client and
//! `InventoryService` engine can be exercised end to end without external
//! services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p backstock-integration-tests
//! ```

// Test support crate: panicking on setup failure is the point.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::OnceLock;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;
use url::Url;

use backstock_core::{ItemId, Role, UserId};
use backstock_inventory::{
    InventoryConfig, InventoryError, MemoryStore, Session, StockItem, StockItemDraft, StockStore,
};
use secrecy::SecretString;

static TRACING: OnceLock<()> = OnceLock::new();

/// Initialize test logging once per binary (`RUST_LOG` controls the filter).
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A unique temp-file path that does not exist yet.
#[must_use]
pub fn temp_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}-{}.json", uuid::Uuid::new_v4()))
}

/// A signed-in session for tests.
#[must_use]
pub fn test_session() -> Session {
    Session::new(
        UserId::new("user-1"),
        "Integration Tester",
        Role::Supervisor,
        SecretString::from("tok-integration"),
    )
}

/// Inventory configuration pointing at `base_url` with fresh temp paths.
#[must_use]
pub fn test_config(base_url: Url) -> InventoryConfig {
    InventoryConfig::new(
        base_url,
        temp_path("backstock-it-cache"),
        temp_path("backstock-it-session"),
    )
}

/// An in-process backend serving the item store's REST contract.
pub struct TestBackend {
    /// Base URL the spawned server listens on.
    pub base_url: Url,
    /// Handle to the backing store, for seeding and fault injection.
    pub store: MemoryStore,
}

/// Bind a fresh backend on an ephemeral port and serve it in the background.
pub async fn spawn_backend() -> TestBackend {
    init_tracing();

    let store = MemoryStore::new();
    let app = router(store.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend {
        base_url: Url::parse(&format!("http://{addr}")).unwrap(),
        store,
    }
}

fn router(store: MemoryStore) -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", put(update_item).delete(delete_item))
        .route("/items/{id}/deliver", post(deliver))
        .route("/items/{id}/buffer", post(add_buffer))
        .route("/items/{id}/transfer", post(transfer))
        .route("/items/{id}/movements", get(movements))
        .with_state(store)
}

/// Maps store errors onto the wire contract the `RestStore` client expects:
/// 404 for missing items, 422 with a message body for declined mutations,
/// 500 for everything else.
struct ApiError(InventoryError);

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InventoryError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            InventoryError::OperationRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match self.0 {
            InventoryError::OperationRejected(message) => message,
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

#[derive(Deserialize)]
struct AmountBody {
    amount: i64,
}

async fn list_items(State(store): State<MemoryStore>) -> Result<Json<Vec<StockItem>>, ApiError> {
    Ok(Json(store.list_items().await?))
}

async fn create_item(
    State(store): State<MemoryStore>,
    Json(draft): Json<StockItemDraft>,
) -> Result<Json<StockItem>, ApiError> {
    Ok(Json(store.create_item(draft).await?))
}

async fn update_item(
    State(store): State<MemoryStore>,
    Path(id): Path<String>,
    Json(draft): Json<StockItemDraft>,
) -> Result<Json<StockItem>, ApiError> {
    Ok(Json(store.update_item(&ItemId::new(id), draft).await?))
}

async fn delete_item(
    State(store): State<MemoryStore>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = ItemId::new(id);
    store.delete_item(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

async fn deliver(
    State(store): State<MemoryStore>,
    Path(id): Path<String>,
    Json(body): Json<AmountBody>,
) -> Result<Json<StockItem>, ApiError> {
    Ok(Json(store.deliver(&ItemId::new(id), body.amount).await?))
}

async fn add_buffer(
    State(store): State<MemoryStore>,
    Path(id): Path<String>,
    Json(body): Json<AmountBody>,
) -> Result<Json<StockItem>, ApiError> {
    Ok(Json(store.add_buffer(&ItemId::new(id), body.amount).await?))
}

async fn transfer(
    State(store): State<MemoryStore>,
    Path(id): Path<String>,
    Json(body): Json<AmountBody>,
) -> Result<Json<StockItem>, ApiError> {
    Ok(Json(
        store.transfer_buffer(&ItemId::new(id), body.amount).await?,
    ))
}

async fn movements(
    State(store): State<MemoryStore>,
    Path(id): Path<String>,
) -> Result<Json<Vec<backstock_inventory::MovementRecord>>, ApiError> {
    Ok(Json(store.movements(&ItemId::new(id)).await?))
}
