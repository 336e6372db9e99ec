//! REST client for the backend item store.
//!
//! JSON over HTTP against the configured base URL, bearer-token
//! authenticated with the session's API token. One request per operation;
//! no retries, no request timeout, no deduplication of rapid duplicate
//! invocations (matching the caller-side contract).

use std::sync::Arc;

use backstock_core::ItemId;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use secrecy::ExposeSecret;
use tracing::instrument;
use url::Url;

use super::StockStore;
use crate::config::InventoryConfig;
use crate::error::InventoryError;
use crate::item::{MovementRecord, StockItem, StockItemDraft};
use crate::session::Session;

/// REST client for the backend item store.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct RestStore {
    inner: Arc<RestStoreInner>,
}

struct RestStoreInner {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

/// Error body returned by the backend when it declines a mutation.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, serde::Serialize)]
struct AmountBody {
    amount: i64,
}

impl RestStore {
    /// Create a new store client from configuration and the session that
    /// carries the API token.
    #[must_use]
    pub fn new(config: &InventoryConfig, session: &Session) -> Self {
        Self {
            inner: Arc::new(RestStoreInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                token: session.token().expose_secret().to_owned(),
            }),
        }
    }

    /// The configured backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Issue a request and map the response per the backend contract:
    /// 404 is `ItemNotFound` (when an item id is in play), 409/422 is
    /// `OperationRejected` carrying the server's message, anything else
    /// non-2xx is a transport-level failure.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        item: Option<&ItemId>,
    ) -> Result<T, InventoryError> {
        let mut builder = self
            .inner
            .client
            .request(method, self.endpoint(path))
            .bearer_auth(&self.inner.token);

        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND
            && let Some(id) = item
        {
            return Err(InventoryError::ItemNotFound(id.clone()));
        }

        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            let message = response
                .json::<ErrorBody>()
                .await
                .map_or_else(|_| "operation rejected by the store".to_string(), |b| b.message);
            return Err(InventoryError::OperationRejected(message));
        }

        if !status.is_success() {
            return Err(InventoryError::NetworkFailure(format!(
                "unexpected status {status} from {path}"
            )));
        }

        Ok(response.json().await?)
    }

    async fn mutate_quantity(
        &self,
        id: &ItemId,
        endpoint: &str,
        amount: i64,
    ) -> Result<StockItem, InventoryError> {
        let body = serde_json::to_value(AmountBody { amount })?;
        self.request(
            Method::POST,
            &format!("items/{id}/{endpoint}"),
            Some(body),
            Some(id),
        )
        .await
    }
}

impl StockStore for RestStore {
    #[instrument(skip(self))]
    async fn list_items(&self) -> Result<Vec<StockItem>, InventoryError> {
        self.request(Method::GET, "items", None, None).await
    }

    #[instrument(skip(self, draft), fields(sku = %draft.sku))]
    async fn create_item(&self, draft: StockItemDraft) -> Result<StockItem, InventoryError> {
        let body = serde_json::to_value(&draft)?;
        self.request(Method::POST, "items", Some(body), None).await
    }

    #[instrument(skip(self, draft), fields(item_id = %id))]
    async fn update_item(
        &self,
        id: &ItemId,
        draft: StockItemDraft,
    ) -> Result<StockItem, InventoryError> {
        let body = serde_json::to_value(&draft)?;
        self.request(Method::PUT, &format!("items/{id}"), Some(body), Some(id))
            .await
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn delete_item(&self, id: &ItemId) -> Result<(), InventoryError> {
        // The backend replies with a confirmation body; only the status matters.
        let _: serde_json::Value = self
            .request(Method::DELETE, &format!("items/{id}"), None, Some(id))
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(item_id = %id, amount = %amount))]
    async fn deliver(&self, id: &ItemId, amount: i64) -> Result<StockItem, InventoryError> {
        self.mutate_quantity(id, "deliver", amount).await
    }

    #[instrument(skip(self), fields(item_id = %id, amount = %amount))]
    async fn add_buffer(&self, id: &ItemId, amount: i64) -> Result<StockItem, InventoryError> {
        self.mutate_quantity(id, "buffer", amount).await
    }

    #[instrument(skip(self), fields(item_id = %id, amount = %amount))]
    async fn transfer_buffer(
        &self,
        id: &ItemId,
        amount: i64,
    ) -> Result<StockItem, InventoryError> {
        self.mutate_quantity(id, "transfer", amount).await
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn movements(&self, id: &ItemId) -> Result<Vec<MovementRecord>, InventoryError> {
        self.request(Method::GET, &format!("items/{id}/movements"), None, Some(id))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use backstock_core::Role;
    use backstock_core::UserId;
    use secrecy::SecretString;

    fn store_with_base(base: &str) -> RestStore {
        let config = InventoryConfig::new(
            Url::parse(base).unwrap(),
            "/tmp/movements.json",
            "/tmp/session.json",
        );
        let session = Session::new(
            UserId::new("user-1"),
            "Test",
            Role::Supervisor,
            SecretString::from("tok-test"),
        );
        RestStore::new(&config, &session)
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let store = store_with_base("http://127.0.0.1:8080/");
        assert_eq!(
            store.endpoint("items/item-1/deliver"),
            "http://127.0.0.1:8080/items/item-1/deliver"
        );
    }

    #[test]
    fn test_endpoint_preserves_base_path() {
        let store = store_with_base("http://127.0.0.1:8080/api/v1");
        assert_eq!(store.endpoint("/items"), "http://127.0.0.1:8080/api/v1/items");
    }
}
