//! The inventory operations engine.
//!
//! Wraps a [`StockStore`] with client-side amount validation, before/after
//! movement records, and mirroring into the durable local cache. Operations
//! are atomic from the caller's perspective: validate, round-trip the
//! mutation to the store, then record the movement. A failed operation
//! records nothing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use backstock_core::{ItemId, MovementKind};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{instrument, warn};

use crate::cache::MovementCache;
use crate::error::InventoryError;
use crate::item::{MovementRecord, StockItem, StockItemDraft};
use crate::store::StockStore;

/// Where a movement history read was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistorySource {
    /// The authoritative server-side ledger answered.
    Server,
    /// The server ledger was unreachable; contents come from the local
    /// cache (degraded mode).
    LocalFallback,
}

/// A movement history read: the records plus where they came from, so the
/// caller can surface a degraded-mode indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementHistory {
    pub source: HistorySource,
    /// Newest first.
    pub movements: Vec<MovementRecord>,
}

/// The result of a successful quantity-changing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    /// The authoritative updated item snapshot from the store.
    pub item: StockItem,
    /// The movement record mirrored into the local cache.
    pub movement: MovementRecord,
}

/// The inventory operations engine.
///
/// Cheap to clone; all clones share the store client and the cache. Writes
/// are serialized through an internal lock within one process; cross-process
/// writers remain last-write-wins, as with the original console.
#[derive(Clone)]
pub struct InventoryService<S> {
    inner: Arc<ServiceInner<S>>,
}

struct ServiceInner<S> {
    store: S,
    cache: RwLock<MovementCache>,
    cache_path: PathBuf,
}

impl<S: StockStore> InventoryService<S> {
    /// Create a service over `store`, hydrating the local movement cache
    /// from `cache_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing cache file cannot be read or parsed.
    pub fn new(store: S, cache_path: &Path) -> Result<Self, InventoryError> {
        let cache = MovementCache::load(cache_path)?;
        Ok(Self {
            inner: Arc::new(ServiceInner {
                store,
                cache: RwLock::new(cache),
                cache_path: cache_path.to_path_buf(),
            }),
        })
    }

    // =========================================================================
    // Quantity-changing operations
    // =========================================================================

    /// Deliver `amount` units of on-hand stock to a customer/order.
    ///
    /// No sufficiency pre-check is made client-side; the store's rejection
    /// is surfaced verbatim.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` if `amount <= 0` (no request is dispatched);
    /// `ItemNotFound`, `OperationRejected`, or `NetworkFailure` from the
    /// store; cache errors if the mirror cannot be persisted.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn deliver(
        &self,
        item_id: &ItemId,
        amount: i64,
    ) -> Result<OperationOutcome, InventoryError> {
        self.apply(item_id, MovementKind::Deliver, amount).await
    }

    /// Add `amount` units to the buffer reserve. On-hand stock is untouched.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`InventoryService::deliver`].
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn add_buffer(
        &self,
        item_id: &ItemId,
        amount: i64,
    ) -> Result<OperationOutcome, InventoryError> {
        self.apply(item_id, MovementKind::AddBuffer, amount).await
    }

    /// Reclassify `amount` units of buffer as sellable on-hand stock.
    ///
    /// The displayed buffer is only a hint; the authoritative rejection of
    /// an excessive transfer comes from the store.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`InventoryService::deliver`].
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn transfer_buffer_to_stock(
        &self,
        item_id: &ItemId,
        amount: i64,
    ) -> Result<OperationOutcome, InventoryError> {
        self.apply(item_id, MovementKind::Transfer, amount).await
    }

    async fn apply(
        &self,
        item_id: &ItemId,
        kind: MovementKind,
        amount: i64,
    ) -> Result<OperationOutcome, InventoryError> {
        if amount <= 0 {
            return Err(InventoryError::InvalidAmount(amount));
        }

        let updated = match kind {
            MovementKind::Deliver => self.inner.store.deliver(item_id, amount).await?,
            MovementKind::AddBuffer => self.inner.store.add_buffer(item_id, amount).await?,
            MovementKind::Transfer => self.inner.store.transfer_buffer(item_id, amount).await?,
        };

        let movement = MovementRecord::for_operation(&updated, kind, amount);

        // Mirror to the local cache regardless of server ledger availability,
        // so a record of the action always survives client-side.
        {
            let mut cache = self.inner.cache.write().await;
            cache.append(movement.clone());
            cache.save(&self.inner.cache_path)?;
        }

        Ok(OperationOutcome {
            item: updated,
            movement,
        })
    }

    // =========================================================================
    // Movement history
    // =========================================================================

    /// Read the movement history for an item, newest first.
    ///
    /// Prefers the server-side ledger. On any fetch failure the local cache
    /// answers instead, tagged [`HistorySource::LocalFallback`], rather than
    /// failing the whole view. The two sources are never merged.
    ///
    /// # Errors
    ///
    /// Infallible in practice today: every store failure degrades to the
    /// cache. The `Result` is kept for parity with the other operations.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn movement_history(
        &self,
        item_id: &ItemId,
    ) -> Result<MovementHistory, InventoryError> {
        match self.inner.store.movements(item_id).await {
            Ok(movements) => Ok(MovementHistory {
                source: HistorySource::Server,
                movements,
            }),
            Err(err) => {
                warn!(error = %err, "server ledger unavailable, serving local cache");
                let cache = self.inner.cache.read().await;
                Ok(MovementHistory {
                    source: HistorySource::LocalFallback,
                    movements: cache.newest_first(item_id),
                })
            }
        }
    }

    // =========================================================================
    // Item CRUD passthrough
    // =========================================================================

    /// Read all stock items from the store.
    ///
    /// # Errors
    ///
    /// Store errors are surfaced unchanged; no retries.
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<StockItem>, InventoryError> {
        self.inner.store.list_items().await
    }

    /// Add a new stock item.
    ///
    /// # Errors
    ///
    /// Store errors are surfaced unchanged.
    #[instrument(skip(self, draft), fields(sku = %draft.sku))]
    pub async fn create_item(&self, draft: StockItemDraft) -> Result<StockItem, InventoryError> {
        self.inner.store.create_item(draft).await
    }

    /// Full-field edit of an existing item.
    ///
    /// # Errors
    ///
    /// Store errors are surfaced unchanged.
    #[instrument(skip(self, draft), fields(item_id = %item_id))]
    pub async fn update_item(
        &self,
        item_id: &ItemId,
        draft: StockItemDraft,
    ) -> Result<StockItem, InventoryError> {
        self.inner.store.update_item(item_id, draft).await
    }

    /// Remove a stock item. Irreversible.
    ///
    /// # Errors
    ///
    /// Store errors are surfaced unchanged.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn delete_item(&self, item_id: &ItemId) -> Result<(), InventoryError> {
        self.inner.store.delete_item(item_id).await
    }

    /// Direct access to the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use backstock_core::{Price, Sku};
    use std::path::PathBuf;

    fn temp_cache_path() -> PathBuf {
        std::env::temp_dir().join(format!("backstock-engine-{}.json", uuid::Uuid::new_v4()))
    }

    fn draft(quantity: i64, buffer: i64) -> StockItemDraft {
        StockItemDraft {
            name: "Widget".to_string(),
            sku: Sku::parse("WIDGET-001").unwrap(),
            price: Price::ZERO,
            quantity,
            buffer,
            description: String::new(),
        }
    }

    async fn service_with_item(
        quantity: i64,
        buffer: i64,
    ) -> (InventoryService<MemoryStore>, ItemId, PathBuf) {
        let path = temp_cache_path();
        let service = InventoryService::new(MemoryStore::new(), &path).unwrap();
        let item = service.create_item(draft(quantity, buffer)).await.unwrap();
        (service, item.id, path)
    }

    #[tokio::test]
    async fn test_deliver_reduces_quantity_and_records_movement() {
        let (service, id, path) = service_with_item(10, 0).await;

        let outcome = service.deliver(&id, 3).await.unwrap();
        assert_eq!(outcome.item.quantity, 7);
        assert_eq!(outcome.movement.before.quantity, 10);
        assert_eq!(outcome.movement.after.quantity, 7);

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_add_buffer_leaves_quantity_alone() {
        let (service, id, path) = service_with_item(7, 0).await;

        let outcome = service.add_buffer(&id, 5).await.unwrap();
        assert_eq!(outcome.item.quantity, 7);
        assert_eq!(outcome.item.buffer, 5);
        assert_eq!(outcome.movement.before.buffer, 0);
        assert_eq!(outcome.movement.after.buffer, 5);

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_transfer_moves_buffer_into_stock() {
        let (service, id, path) = service_with_item(7, 5).await;

        let outcome = service.transfer_buffer_to_stock(&id, 2).await.unwrap();
        assert_eq!(outcome.item.quantity, 9);
        assert_eq!(outcome.item.buffer, 3);
        assert_eq!(outcome.movement.before.quantity, 7);
        assert_eq!(outcome.movement.before.buffer, 5);

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_full_scenario_in_order() {
        let (service, id, path) = service_with_item(10, 0).await;

        service.deliver(&id, 3).await.unwrap();
        service.add_buffer(&id, 5).await.unwrap();
        let outcome = service.transfer_buffer_to_stock(&id, 2).await.unwrap();
        assert_eq!(outcome.item.quantity, 9);
        assert_eq!(outcome.item.buffer, 3);

        // Server ledger agrees, newest first
        let history = service.movement_history(&id).await.unwrap();
        assert_eq!(history.source, HistorySource::Server);
        let kinds: Vec<_> = history.movements.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MovementKind::Transfer,
                MovementKind::AddBuffer,
                MovementKind::Deliver
            ]
        );

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_non_positive_amounts_fail_before_dispatch() {
        let (service, id, path) = service_with_item(10, 0).await;

        for amount in [0, -1, -100] {
            let err = service.deliver(&id, amount).await.unwrap_err();
            assert!(matches!(err, InventoryError::InvalidAmount(_)));
        }
        let err = service.add_buffer(&id, 0).await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidAmount(0)));
        let err = service.transfer_buffer_to_stock(&id, -5).await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidAmount(-5)));

        // No movement recorded anywhere and no store mutation
        let history = service.movement_history(&id).await.unwrap();
        assert!(history.movements.is_empty());
        let items = service.list_items().await.unwrap();
        assert_eq!(items[0].quantity, 10);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_rejected_transfer_records_nothing() {
        let (service, id, path) = service_with_item(10, 3).await;

        let err = service.transfer_buffer_to_stock(&id, 100).await.unwrap_err();
        assert!(matches!(err, InventoryError::OperationRejected(_)));

        let items = service.list_items().await.unwrap();
        assert_eq!(items[0].quantity, 10);
        assert_eq!(items[0].buffer, 3);
        let history = service.movement_history(&id).await.unwrap();
        assert!(history.movements.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_every_success_mirrors_exactly_one_cache_record() {
        let (service, id, path) = service_with_item(10, 0).await;

        service.deliver(&id, 1).await.unwrap();
        service.deliver(&id, 1).await.unwrap();

        let cache = MovementCache::load(&path).unwrap();
        assert_eq!(cache.records_for(&id).len(), 2);

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_history_falls_back_to_cache_when_ledger_is_down() {
        let (service, id, path) = service_with_item(10, 0).await;

        service.deliver(&id, 3).await.unwrap();
        service.add_buffer(&id, 5).await.unwrap();
        service.store().set_ledger_available(false);

        let history = service.movement_history(&id).await.unwrap();
        assert_eq!(history.source, HistorySource::LocalFallback);
        let kinds: Vec<_> = history.movements.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MovementKind::AddBuffer, MovementKind::Deliver]);

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_cache_survives_service_restart() {
        let (service, id, path) = service_with_item(10, 0).await;
        service.deliver(&id, 3).await.unwrap();
        let store = service.store().clone();
        drop(service);

        // A new service over the same cache path rehydrates the mirror
        let service = InventoryService::new(store, &path).unwrap();
        service.store().set_ledger_available(false);
        let history = service.movement_history(&id).await.unwrap();
        assert_eq!(history.source, HistorySource::LocalFallback);
        assert_eq!(history.movements.len(), 1);

        std::fs::remove_file(path).unwrap();
    }
}
