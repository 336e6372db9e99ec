//! Unified error handling for the inventory subsystem.

use backstock_core::ItemId;
use thiserror::Error;

/// Errors surfaced by inventory operations and the movement ledger.
///
/// Write-path errors are always surfaced to the caller; only the read path
/// for movement history degrades (to the local cache) instead of failing.
/// No variant is ever retried automatically.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The requested amount is not a positive integer. Caught client-side,
    /// before any request is dispatched.
    #[error("invalid amount {0}: must be a positive integer")]
    InvalidAmount(i64),

    /// The referenced item does not exist (or no longer exists).
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// The store declined the mutation (e.g., insufficient stock). The
    /// server's message is carried verbatim.
    #[error("operation rejected: {0}")]
    OperationRejected(String),

    /// Transport-level failure. Triggers the ledger fallback for reads;
    /// surfaces as a failed action for writes.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The local movement cache could not be read or written.
    #[error("movement cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),

    /// The local movement cache could not be serialized or parsed.
    #[error("movement cache format error: {0}")]
    CacheFormat(#[from] serde_json::Error),
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}
