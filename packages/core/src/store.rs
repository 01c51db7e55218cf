//! # Anchor Store
//!
//! Authoritative ordered list of anchors, kept in one slot of a
//! [`StorageBackend`].
//!
//! The store has no cache and no transaction log: the persisted sequence is
//! the whole state. Every convenience method is a load, an in-memory edit and
//! one `save_all`, so a failed step never leaves a partial write behind.

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::rebase::{rebase_anchors, EditEvent, RebaseOutcome};
use crate::record::{decode_records, encode_records};
use crate::{Anchor, AnchorError, AnchorId, AnchorPatch, StorageBackend};

/// Maximum number of anchors a store accepts at creation time
pub const MAX_ANCHORS: usize = 20;

/// Slot key used when none is given
pub const DEFAULT_SLOT_KEY: &str = "anchors";

#[derive(Debug)]
pub struct AnchorStore<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> AnchorStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DEFAULT_SLOT_KEY)
    }

    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Load the persisted sequence, dropping records that fail validation
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Result<Vec<Anchor>, AnchorError> {
        let Some(value) = self.backend.read(&self.key)? else {
            return Ok(Vec::new());
        };

        let decoded = decode_records(value);
        if decoded.malformed_slot {
            warn!("Anchor slot is not a list; treating it as empty");
        }
        for rejected in &decoded.rejected {
            debug!(%rejected, "Dropping persisted anchor");
        }
        Ok(decoded.anchors)
    }

    /// Replace the whole persisted sequence
    #[instrument(skip(self, anchors), fields(key = %self.key, count = anchors.len()))]
    pub fn save_all(&mut self, anchors: &[Anchor]) -> Result<(), AnchorError> {
        let value = encode_records(anchors).map_err(crate::StorageError::from)?;
        self.backend.write(&self.key, value)?;
        info!("Saved anchors");
        Ok(())
    }

    /// Live count, read from the backend
    pub fn len(&self) -> Result<usize, AnchorError> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, AnchorError> {
        Ok(self.len()? == 0)
    }

    pub fn get(&self, id: &AnchorId) -> Result<Option<Anchor>, AnchorError> {
        Ok(self.load()?.into_iter().find(|a| a.id() == id))
    }

    /// Append an anchor, failing on a known id or once the store is full
    pub fn add(&mut self, anchor: Anchor) -> Result<(), AnchorError> {
        let mut anchors = self.load()?;
        if anchors.iter().any(|a| a.id() == anchor.id()) {
            return Err(AnchorError::DuplicateId(anchor.id().clone()));
        }
        if anchors.len() >= MAX_ANCHORS {
            return Err(AnchorError::CapacityExceeded { limit: MAX_ANCHORS });
        }
        anchors.push(anchor);
        self.save_all(&anchors)
    }

    /// Remove every anchor whose id is in `ids`, returning how many went
    pub fn remove(&mut self, ids: &HashSet<AnchorId>) -> Result<usize, AnchorError> {
        let mut anchors = self.load()?;
        let before = anchors.len();
        anchors.retain(|a| !ids.contains(a.id()));

        let removed = before - anchors.len();
        if removed > 0 {
            self.save_all(&anchors)?;
        }
        Ok(removed)
    }

    /// Update label/icon/note of one anchor
    pub fn update_fields(
        &mut self,
        id: &AnchorId,
        patch: &AnchorPatch,
    ) -> Result<Anchor, AnchorError> {
        let mut anchors = self.load()?;
        let anchor = anchors
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or_else(|| AnchorError::NotFound(id.clone()))?;

        let changed = anchor.apply_patch(patch);
        let updated = anchor.clone();
        if changed {
            self.save_all(&anchors)?;
        }
        Ok(updated)
    }

    /// Drop every anchor
    pub fn clear(&mut self) -> Result<usize, AnchorError> {
        let count = self.len()?;
        self.save_all(&[])?;
        Ok(count)
    }

    /// Rebase stored anchors for one edit event, persisting only on change
    pub fn apply_edits(&mut self, event: &EditEvent) -> Result<RebaseOutcome, AnchorError> {
        let mut anchors = self.load()?;
        let outcome = rebase_anchors(&mut anchors, event)?;
        if outcome.is_changed() {
            self.save_all(&anchors)?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::test_anchor;
    use crate::{AnchorIcon, MemoryBackend, TextEdit};
    use serde_json::json;

    fn store_with(ids: &[&str]) -> AnchorStore<MemoryBackend> {
        let mut store = AnchorStore::new(MemoryBackend::new());
        let anchors: Vec<_> = ids.iter().map(|id| test_anchor(id, "/a.rs", 0)).collect();
        store.save_all(&anchors).unwrap();
        store
    }

    fn ids(store: &AnchorStore<MemoryBackend>) -> Vec<String> {
        store
            .load()
            .unwrap()
            .iter()
            .map(|a| a.id().to_string())
            .collect()
    }

    #[test]
    fn test_empty_backend_loads_nothing() {
        let store = AnchorStore::new(MemoryBackend::new());
        assert!(store.load().unwrap().is_empty());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_add_rejects_known_id() {
        let mut store = AnchorStore::new(MemoryBackend::new());
        let anchor = test_anchor("same", "/a.rs", 4);
        store.add(anchor.clone()).unwrap();
        let writes = store.backend().write_count();

        let err = store.add(anchor).unwrap_err();

        assert!(matches!(err, AnchorError::DuplicateId(ref id) if id.as_str() == "same"));
        assert_eq!(store.backend().write_count(), writes);
        assert_eq!(ids(&store), vec!["same"]);
        let slot = store.backend().slot(DEFAULT_SLOT_KEY).unwrap();
        assert_eq!(slot.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_twenty_first_add_fails() {
        let mut store = AnchorStore::new(MemoryBackend::new());
        for i in 0..MAX_ANCHORS {
            store.add(test_anchor(&format!("a{i}"), "/a.rs", i as u32)).unwrap();
        }

        let err = store.add(test_anchor("overflow", "/a.rs", 0)).unwrap_err();
        assert!(matches!(err, AnchorError::CapacityExceeded { limit: 20 }));
        assert_eq!(store.len().unwrap(), 20);
    }

    #[test]
    fn test_capacity_reads_live_count() {
        let mut store = store_with(&[]);
        for i in 0..MAX_ANCHORS {
            store.add(test_anchor(&format!("a{i}"), "/a.rs", 0)).unwrap();
        }
        store.remove(&HashSet::from([AnchorId::from("a3")])).unwrap();

        store.add(test_anchor("fits", "/a.rs", 0)).unwrap();
        assert_eq!(store.len().unwrap(), 20);
    }

    #[test]
    fn test_remove_by_selection_keeps_remaining_order() {
        let mut store = store_with(&["a", "b", "c", "d", "e", "f"]);
        let selected = HashSet::from([
            AnchorId::from("b"),
            AnchorId::from("f"),
            AnchorId::from("d"),
        ]);

        assert_eq!(store.remove(&selected).unwrap(), 3);
        assert_eq!(ids(&store), vec!["a", "c", "e"]);
    }

    #[test]
    fn test_remove_unknown_ids_does_not_write() {
        let mut store = store_with(&["a"]);
        let writes = store.backend().write_count();

        assert_eq!(store.remove(&HashSet::from([AnchorId::from("zzz")])).unwrap(), 0);
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn test_update_fields_missing_id() {
        let mut store = store_with(&["a"]);
        let err = store
            .update_fields(&AnchorId::from("nope"), &AnchorPatch::default())
            .unwrap_err();
        assert!(matches!(err, AnchorError::NotFound(_)));
    }

    #[test]
    fn test_update_fields_persists_patch() {
        let mut store = store_with(&["a", "b"]);
        let patch = AnchorPatch {
            note: Some("look here".to_string()),
            icon: Some(AnchorIcon::Note),
            ..AnchorPatch::default()
        };

        store.update_fields(&AnchorId::from("b"), &patch).unwrap();

        let b = store.get(&AnchorId::from("b")).unwrap().unwrap();
        assert_eq!(b.note(), "look here");
        assert_eq!(b.icon(), AnchorIcon::Note);
        assert_eq!(b.label(), "b");
        assert_eq!(ids(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_corrupt_records_are_dropped_on_load() {
        let backend = MemoryBackend::with_slot(
            DEFAULT_SLOT_KEY,
            json!([
                {"id": "ok", "label": "x", "filePath": "/a.rs", "lineNumber": 1,
                 "endLineNumber": 1, "codeText": "x", "icon": "bug", "note": ""},
                {"id": "broken", "label": "x"}
            ]),
        );
        let store = AnchorStore::new(backend);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id().as_str(), "ok");
    }

    #[test]
    fn test_non_list_slot_loads_empty() {
        let store = AnchorStore::new(MemoryBackend::with_slot(DEFAULT_SLOT_KEY, json!("oops")));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = store_with(&["a", "b"]);
        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_apply_edits_without_change_does_not_persist() {
        let mut store = AnchorStore::new(MemoryBackend::new());
        store.save_all(&[test_anchor("a", "/a.rs", 4)]).unwrap();
        let writes = store.backend().write_count();

        let event = EditEvent::new("/a.rs", vec![TextEdit::new(4, 6, "x\ny\nz\n")]);
        let outcome = store.apply_edits(&event).unwrap();

        assert!(!outcome.is_changed());
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn test_custom_slot_key() {
        let mut store = AnchorStore::with_key(MemoryBackend::new(), "project-anchors");
        store.add(test_anchor("a", "/a.rs", 0)).unwrap();

        let backend = store.into_backend();
        assert!(backend.slot("project-anchors").is_some());
        assert!(backend.slot(DEFAULT_SLOT_KEY).is_none());
    }
}
