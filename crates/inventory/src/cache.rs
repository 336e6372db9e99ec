//! Durable local mirror of movement history.
//!
//! A single keyed mapping from item identifier to its ordered movement
//! records, serialized as one flat JSON document at a fixed path. Hydrated
//! at startup, rewritten wholesale on every mutation. Best-effort UX
//! continuity, not a correctness mechanism: no reconciliation is performed
//! against the server-side ledger.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use backstock_core::ItemId;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;
use crate::item::MovementRecord;

/// Client-durable mirror of movement history, keyed by item identifier.
///
/// Records are kept in insertion order (oldest first); display order is
/// newest-first via [`MovementCache::newest_first`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementCache {
    entries: BTreeMap<ItemId, Vec<MovementRecord>>,
}

impl MovementCache {
    /// Hydrate the cache from `path`.
    ///
    /// A missing file is an empty cache, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Serialize the cache back to `path`, creating parent directories as
    /// needed. The whole document is rewritten on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), InventoryError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Append a record to the history of its item.
    pub fn append(&mut self, record: MovementRecord) {
        self.entries
            .entry(record.item_id.clone())
            .or_default()
            .push(record);
    }

    /// All records for `item_id` in insertion order (oldest first).
    #[must_use]
    pub fn records_for(&self, item_id: &ItemId) -> &[MovementRecord] {
        self.entries.get(item_id).map_or(&[], Vec::as_slice)
    }

    /// Records for `item_id` in display order (newest first).
    #[must_use]
    pub fn newest_first(&self, item_id: &ItemId) -> Vec<MovementRecord> {
        self.records_for(item_id).iter().rev().cloned().collect()
    }

    /// Number of items with at least one cached record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no item has cached records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::item::QuantitySnapshot;
    use backstock_core::{MovementId, MovementKind};
    use chrono::Utc;
    use std::path::PathBuf;

    fn temp_cache_path() -> PathBuf {
        std::env::temp_dir().join(format!("backstock-cache-{}.json", uuid::Uuid::new_v4()))
    }

    fn record(item: &str, kind: MovementKind, amount: i64) -> MovementRecord {
        let before = QuantitySnapshot {
            quantity: 10,
            buffer: 5,
        };
        MovementRecord {
            id: MovementId::random(),
            item_id: ItemId::new(item),
            kind,
            amount,
            before,
            after: before.applying(kind, amount),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let cache = MovementCache::load(&temp_cache_path()).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut cache = MovementCache::default();
        cache.append(record("item-1", MovementKind::Deliver, 3));
        cache.append(record("item-1", MovementKind::AddBuffer, 5));
        cache.append(record("item-2", MovementKind::Deliver, 1));

        let records = cache.records_for(&ItemId::new("item-1"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, MovementKind::Deliver);
        assert_eq!(records[1].kind, MovementKind::AddBuffer);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_newest_first_reverses() {
        let mut cache = MovementCache::default();
        cache.append(record("item-1", MovementKind::Deliver, 3));
        cache.append(record("item-1", MovementKind::Transfer, 2));

        let newest = cache.newest_first(&ItemId::new("item-1"));
        assert_eq!(newest[0].kind, MovementKind::Transfer);
        assert_eq!(newest[1].kind, MovementKind::Deliver);
    }

    #[test]
    fn test_unknown_item_is_empty_slice() {
        let cache = MovementCache::default();
        assert!(cache.records_for(&ItemId::new("nope")).is_empty());
        assert!(cache.newest_first(&ItemId::new("nope")).is_empty());
    }

    #[test]
    fn test_save_load_round_trip_is_identity() {
        let path = temp_cache_path();
        let mut cache = MovementCache::default();
        cache.append(record("item-1", MovementKind::Deliver, 3));
        cache.append(record("item-1", MovementKind::AddBuffer, 5));
        cache.append(record("item-9", MovementKind::Transfer, 2));

        cache.save(&path).unwrap();
        let rehydrated = MovementCache::load(&path).unwrap();
        assert_eq!(rehydrated, cache);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("backstock-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested/movements.json");

        let mut cache = MovementCache::default();
        cache.append(record("item-1", MovementKind::Deliver, 1));
        cache.save(&path).unwrap();

        assert!(path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
