//! Backstock inventory - the stock/buffer ledger subsystem.
//!
//! Tracks a product's on-hand stock separately from a "buffer" reserve and
//! records every quantity-changing event in an append-only movement history.
//!
//! # Architecture
//!
//! - [`StockStore`] - async trait over the authoritative backend item store.
//!   [`RestStore`] talks JSON-over-HTTP to it; [`MemoryStore`] is an
//!   in-process implementation for tests and local development.
//! - [`InventoryService`] - the operations engine. Validates amounts
//!   client-side, dispatches mutations to the store, and produces a paired
//!   before/after [`MovementRecord`](crate::item::MovementRecord) for each
//!   success.
//! - [`MovementCache`] - durable client-side mirror of movement history,
//!   keyed by item id, used when the server-side ledger is unreachable.
//!
//! # Example
//!
//! ```rust,ignore
//! use backstock_inventory::{InventoryConfig, InventoryService, RestStore, Session};
//!
//! let config = InventoryConfig::from_env()?;
//! let session = Session::hydrate(&config.session_path)?
//!     .ok_or("not signed in")?;
//! let store = RestStore::new(&config, &session);
//! let service = InventoryService::new(store, &config.cache_path)?;
//!
//! let outcome = service.deliver(&item_id, 3).await?;
//! println!("{} -> {}", outcome.movement.before.quantity, outcome.movement.after.quantity);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod item;
pub mod session;
pub mod store;

pub use cache::MovementCache;
pub use config::{ConfigError, InventoryConfig};
pub use engine::{HistorySource, InventoryService, MovementHistory, OperationOutcome};
pub use error::InventoryError;
pub use item::{MovementRecord, QuantitySnapshot, StockItem, StockItemDraft};
pub use session::{Session, SessionError};
pub use store::{MemoryStore, RestStore, StockStore};
