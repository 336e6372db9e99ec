//! Domain models: stock items and movement records.

use backstock_core::{ItemId, MovementId, MovementKind, Price, Sku};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inventory item as held by the authoritative backend store.
///
/// Invariant (enforced by the store, asserted here only in snapshots):
/// `quantity >= 0` and `buffer >= 0` at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: ItemId,
    pub name: String,
    /// Unique within the catalog.
    pub sku: Sku,
    pub price: Price,
    /// On-hand quantity: sellable stock immediately available for delivery.
    pub quantity: i64,
    /// Buffer quantity: reserve held back from immediate sale.
    pub buffer: i64,
    pub description: String,
}

/// Field set for creating an item or for a full-field edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemDraft {
    pub name: String,
    pub sku: Sku,
    pub price: Price,
    pub quantity: i64,
    pub buffer: i64,
    pub description: String,
}

/// Snapshot of the quantity fields of an item at a point in time.
///
/// Movement records carry one snapshot from immediately before the operation
/// and one from immediately after. The pair is redundant by construction:
/// `after` is derivable from `before`, the movement kind, and the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantitySnapshot {
    pub quantity: i64,
    pub buffer: i64,
}

impl QuantitySnapshot {
    /// Snapshot the quantity fields of an item.
    #[must_use]
    pub const fn of(item: &StockItem) -> Self {
        Self {
            quantity: item.quantity,
            buffer: item.buffer,
        }
    }

    /// The snapshot that must have preceded this one, given that `kind` was
    /// applied with `amount`.
    ///
    /// Used to reconstruct the `before` side of a movement from the updated
    /// item the store returns, so no extra read round-trip is needed.
    ///
    /// Saturating arithmetic: the store rejects any mutation that would
    /// overflow a quantity field, so values from an accepted operation stay
    /// exact; pathological inputs clamp instead of panicking.
    #[must_use]
    pub const fn preceding(&self, kind: MovementKind, amount: i64) -> Self {
        match kind {
            MovementKind::Deliver => Self {
                quantity: self.quantity.saturating_add(amount),
                buffer: self.buffer,
            },
            MovementKind::AddBuffer => Self {
                quantity: self.quantity,
                buffer: self.buffer.saturating_sub(amount),
            },
            MovementKind::Transfer => Self {
                quantity: self.quantity.saturating_sub(amount),
                buffer: self.buffer.saturating_add(amount),
            },
        }
    }

    /// The snapshot that results from applying `kind` with `amount`.
    ///
    /// Saturating, like [`QuantitySnapshot::preceding`].
    #[must_use]
    pub const fn applying(&self, kind: MovementKind, amount: i64) -> Self {
        match kind {
            MovementKind::Deliver => Self {
                quantity: self.quantity.saturating_sub(amount),
                buffer: self.buffer,
            },
            MovementKind::AddBuffer => Self {
                quantity: self.quantity,
                buffer: self.buffer.saturating_add(amount),
            },
            MovementKind::Transfer => Self {
                quantity: self.quantity.saturating_add(amount),
                buffer: self.buffer.saturating_sub(amount),
            },
        }
    }
}

/// A single recorded quantity-changing event.
///
/// Created exactly once per successful operation, immutable thereafter, and
/// never deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: MovementId,
    pub item_id: ItemId,
    pub kind: MovementKind,
    /// Always a positive integer.
    pub amount: i64,
    pub before: QuantitySnapshot,
    pub after: QuantitySnapshot,
    pub recorded_at: DateTime<Utc>,
}

impl MovementRecord {
    /// Build the record for a just-completed operation from the updated item
    /// the store returned.
    #[must_use]
    pub fn for_operation(updated: &StockItem, kind: MovementKind, amount: i64) -> Self {
        let after = QuantitySnapshot::of(updated);
        Self {
            id: MovementId::random(),
            item_id: updated.id.clone(),
            kind,
            amount,
            before: after.preceding(kind, amount),
            after,
            recorded_at: Utc::now(),
        }
    }
}
