//! Backend item store implementations.
//!
//! The authoritative StockItem store is an opaque, single-writer-per-item
//! REST resource owned by the backend. [`RestStore`] is the production
//! client; [`MemoryStore`] implements the same contract in-process for
//! tests and local development.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use backstock_core::ItemId;

use crate::error::InventoryError;
use crate::item::{MovementRecord, StockItem, StockItemDraft};

/// The backend item store contract.
///
/// One method per backend operation; no batching, retries, or caching at
/// this layer. Mutations return the updated item snapshot the store settled
/// on, which is authoritative — callers must not assume optimistic state.
#[allow(async_fn_in_trait)]
pub trait StockStore {
    /// Read all stock items.
    async fn list_items(&self) -> Result<Vec<StockItem>, InventoryError>;

    /// Add a new stock item.
    async fn create_item(&self, draft: StockItemDraft) -> Result<StockItem, InventoryError>;

    /// Full-field edit of an existing item.
    async fn update_item(
        &self,
        id: &ItemId,
        draft: StockItemDraft,
    ) -> Result<StockItem, InventoryError>;

    /// Remove an item. Irreversible; no dependent constraints are enforced
    /// by this subsystem.
    async fn delete_item(&self, id: &ItemId) -> Result<(), InventoryError>;

    /// Reduce on-hand quantity by `amount` (stock leaving to a customer).
    /// Sufficiency is the store's call; insufficiency surfaces as
    /// [`InventoryError::OperationRejected`].
    async fn deliver(&self, id: &ItemId, amount: i64) -> Result<StockItem, InventoryError>;

    /// Increase buffer quantity by `amount`. On-hand quantity is untouched.
    async fn add_buffer(&self, id: &ItemId, amount: i64) -> Result<StockItem, InventoryError>;

    /// Move `amount` from buffer to on-hand stock in one logical operation.
    async fn transfer_buffer(&self, id: &ItemId, amount: i64)
    -> Result<StockItem, InventoryError>;

    /// Read the server-side movement ledger for an item, newest first.
    async fn movements(&self, id: &ItemId) -> Result<Vec<MovementRecord>, InventoryError>;
}
