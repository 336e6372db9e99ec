//! In-process item store for tests and local development.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use backstock_core::{ItemId, MovementKind};

use super::StockStore;
use crate::error::InventoryError;
use crate::item::{MovementRecord, StockItem, StockItemDraft};

/// An in-memory [`StockStore`] honoring the same contract as the backend:
/// quantities never go negative, rejected mutations leave state untouched,
/// and every accepted mutation is recorded in a per-item ledger.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<State>>,
}

struct State {
    items: BTreeMap<ItemId, StockItem>,
    ledger: BTreeMap<ItemId, Vec<MovementRecord>>,
    next_id: u64,
    ledger_available: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            ledger: BTreeMap::new(),
            next_id: 0,
            ledger_available: true,
        }
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle availability of the server-side movement ledger. When
    /// unavailable, [`StockStore::movements`] fails with a network error,
    /// which exercises the caller's local-cache fallback.
    pub fn set_ledger_available(&self, available: bool) {
        self.state().ledger_available = available;
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn item_or_not_found(state: &State, id: &ItemId) -> Result<StockItem, InventoryError> {
        state
            .items
            .get(id)
            .cloned()
            .ok_or_else(|| InventoryError::ItemNotFound(id.clone()))
    }

    fn apply_movement(
        &self,
        id: &ItemId,
        kind: MovementKind,
        amount: i64,
    ) -> Result<StockItem, InventoryError> {
        let mut state = self.state();
        let current = Self::item_or_not_found(&state, id)?;

        let updated = match kind {
            MovementKind::Deliver => {
                if current.quantity < amount {
                    return Err(InventoryError::OperationRejected(format!(
                        "insufficient stock: have {}, requested {amount}",
                        current.quantity
                    )));
                }
                StockItem {
                    quantity: current.quantity - amount,
                    ..current
                }
            }
            MovementKind::AddBuffer => StockItem {
                buffer: current.buffer.checked_add(amount).ok_or_else(|| {
                    InventoryError::OperationRejected("buffer quantity overflow".to_string())
                })?,
                ..current
            },
            MovementKind::Transfer => {
                if current.buffer < amount {
                    return Err(InventoryError::OperationRejected(format!(
                        "transfer amount exceeds buffer: have {}, requested {amount}",
                        current.buffer
                    )));
                }
                StockItem {
                    quantity: current.quantity.checked_add(amount).ok_or_else(|| {
                        InventoryError::OperationRejected(
                            "on-hand quantity overflow".to_string(),
                        )
                    })?,
                    buffer: current.buffer - amount,
                    ..current
                }
            }
        };

        let record = MovementRecord::for_operation(&updated, kind, amount);
        state.ledger.entry(id.clone()).or_default().push(record);
        state.items.insert(id.clone(), updated.clone());
        Ok(updated)
    }
}

fn check_draft(draft: &StockItemDraft) -> Result<(), InventoryError> {
    if draft.quantity < 0 {
        return Err(InventoryError::OperationRejected(
            "quantity cannot be negative".to_string(),
        ));
    }
    if draft.buffer < 0 {
        return Err(InventoryError::OperationRejected(
            "buffer cannot be negative".to_string(),
        ));
    }
    Ok(())
}

impl StockStore for MemoryStore {
    async fn list_items(&self) -> Result<Vec<StockItem>, InventoryError> {
        Ok(self.state().items.values().cloned().collect())
    }

    async fn create_item(&self, draft: StockItemDraft) -> Result<StockItem, InventoryError> {
        check_draft(&draft)?;
        let mut state = self.state();
        state.next_id += 1;
        let id = ItemId::new(format!("item-{}", state.next_id));
        let item = StockItem {
            id: id.clone(),
            name: draft.name,
            sku: draft.sku,
            price: draft.price,
            quantity: draft.quantity,
            buffer: draft.buffer,
            description: draft.description,
        };
        state.items.insert(id, item.clone());
        Ok(item)
    }

    async fn update_item(
        &self,
        id: &ItemId,
        draft: StockItemDraft,
    ) -> Result<StockItem, InventoryError> {
        check_draft(&draft)?;
        let mut state = self.state();
        Self::item_or_not_found(&state, id)?;
        let item = StockItem {
            id: id.clone(),
            name: draft.name,
            sku: draft.sku,
            price: draft.price,
            quantity: draft.quantity,
            buffer: draft.buffer,
            description: draft.description,
        };
        state.items.insert(id.clone(), item.clone());
        Ok(item)
    }

    async fn delete_item(&self, id: &ItemId) -> Result<(), InventoryError> {
        let mut state = self.state();
        state
            .items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| InventoryError::ItemNotFound(id.clone()))
    }

    async fn deliver(&self, id: &ItemId, amount: i64) -> Result<StockItem, InventoryError> {
        self.apply_movement(id, MovementKind::Deliver, amount)
    }

    async fn add_buffer(&self, id: &ItemId, amount: i64) -> Result<StockItem, InventoryError> {
        self.apply_movement(id, MovementKind::AddBuffer, amount)
    }

    async fn transfer_buffer(
        &self,
        id: &ItemId,
        amount: i64,
    ) -> Result<StockItem, InventoryError> {
        self.apply_movement(id, MovementKind::Transfer, amount)
    }

    async fn movements(&self, id: &ItemId) -> Result<Vec<MovementRecord>, InventoryError> {
        let state = self.state();
        if !state.ledger_available {
            return Err(InventoryError::NetworkFailure(
                "movement ledger unavailable".to_string(),
            ));
        }
        Self::item_or_not_found(&state, id)?;
        // Newest first for display
        Ok(state
            .ledger
            .get(id)
            .map(|records| records.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}
