//! # Anchor List View
//!
//! Derived, possibly filtered view of the store for a rendering layer.
//!
//! The view never owns anchors. It reads the store on demand, and a reorder
//! gesture is turned into a complete new sequence that goes back through
//! [`AnchorStore::save_all`] before subscribers are told to re-render.

use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver, Sender};

use tracing::debug;

use crate::{Anchor, AnchorError, AnchorId, AnchorStore, StorageBackend};

/// Notification sent to view subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Store contents changed; re-read the view
    Changed,
    /// Filter query changed
    FilterChanged(String),
}

/// Case-insensitive substring match on label, note and file path
///
/// A blank query matches everything.
pub fn matches_query(anchor: &Anchor, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    anchor.label().to_lowercase().contains(&needle)
        || anchor.note().to_lowercase().contains(&needle)
        || anchor
            .file_path()
            .to_string_lossy()
            .to_lowercase()
            .contains(&needle)
}

/// Anchors matching `query`, in their original relative order
pub fn filter_anchors<'a>(anchors: &'a [Anchor], query: &str) -> Vec<&'a Anchor> {
    anchors.iter().filter(|a| matches_query(a, query)).collect()
}

/// Move the dragged anchors as one block in front of `target`
///
/// The block keeps the relative order the dragged anchors had in `anchors`.
/// With no target the block goes to the end. Dragged ids that are not in the
/// list are ignored. An unknown target, or a target that is itself being
/// dragged, leaves the order unchanged.
pub fn reorder_anchors(
    anchors: &[Anchor],
    dragged: &[AnchorId],
    target: Option<&AnchorId>,
) -> Vec<Anchor> {
    let dragged: HashSet<&AnchorId> = dragged.iter().collect();
    if let Some(target) = target {
        if dragged.contains(target) || !anchors.iter().any(|a| a.id() == target) {
            return anchors.to_vec();
        }
    }

    let (block, mut rest): (Vec<Anchor>, Vec<Anchor>) = anchors
        .iter()
        .cloned()
        .partition(|a| dragged.contains(a.id()));
    if block.is_empty() {
        return anchors.to_vec();
    }

    let insert_at = target
        .and_then(|t| rest.iter().position(|a| a.id() == t))
        .unwrap_or(rest.len());
    rest.splice(insert_at..insert_at, block);
    rest
}

/// Presentation adapter between the store and a rendering layer
#[derive(Debug, Default)]
pub struct AnchorListView {
    filter: String,
    subscribers: Vec<Sender<ViewEvent>>,
}

impl AnchorListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Set the search query; the store is not touched
    pub fn set_filter(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.filter {
            return;
        }
        self.filter = query;
        self.notify(ViewEvent::FilterChanged(self.filter.clone()));
    }

    /// Current rendered subset
    pub fn view<B: StorageBackend>(&self, store: &AnchorStore<B>) -> Result<Vec<Anchor>, AnchorError> {
        let anchors = store.load()?;
        Ok(filter_anchors(&anchors, &self.filter)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Apply a drag-and-drop gesture, returning whether the order changed
    pub fn on_reorder<B: StorageBackend>(
        &mut self,
        store: &mut AnchorStore<B>,
        dragged: &[AnchorId],
        target: Option<&AnchorId>,
    ) -> Result<bool, AnchorError> {
        let current = store.load()?;
        let reordered = reorder_anchors(&current, dragged, target);
        if reordered == current {
            debug!("Reorder left the list unchanged");
            return Ok(false);
        }

        store.save_all(&reordered)?;
        self.refresh();
        Ok(true)
    }

    /// Subscribe to change notifications
    pub fn subscribe(&mut self) -> Receiver<ViewEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Tell subscribers the store changed
    pub fn refresh(&mut self) {
        self.notify(ViewEvent::Changed);
    }

    fn notify(&mut self, event: ViewEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::test_anchor;
    use crate::{AnchorPatch, MemoryBackend};

    fn list(ids: &[&str]) -> Vec<Anchor> {
        ids.iter().map(|id| test_anchor(id, "/src/lib.rs", 0)).collect()
    }

    fn order(anchors: &[Anchor]) -> Vec<&str> {
        anchors.iter().map(|a| a.id().as_str()).collect()
    }

    fn id(s: &str) -> AnchorId {
        AnchorId::from(s)
    }

    #[test]
    fn test_drag_single_before_target() {
        let result = reorder_anchors(&list(&["A", "B", "C", "D"]), &[id("D")], Some(&id("B")));
        assert_eq!(order(&result), vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn test_drag_to_end_keeps_relative_order() {
        let result = reorder_anchors(&list(&["A", "B", "C", "D"]), &[id("A"), id("C")], None);
        assert_eq!(order(&result), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_dragged_order_follows_list_not_gesture() {
        let result = reorder_anchors(&list(&["A", "B", "C", "D"]), &[id("C"), id("A")], Some(&id("B")));
        assert_eq!(order(&result), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_drag_already_in_place_is_idempotent() {
        let anchors = list(&["A", "B", "C", "D"]);
        let result = reorder_anchors(&anchors, &[id("B"), id("C")], Some(&id("D")));
        assert_eq!(result, anchors);
    }

    #[test]
    fn test_drag_forward() {
        let result = reorder_anchors(&list(&["A", "B", "C", "D"]), &[id("A")], Some(&id("D")));
        assert_eq!(order(&result), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_unknown_ids() {
        let anchors = list(&["A", "B", "C"]);
        assert_eq!(reorder_anchors(&anchors, &[id("X")], None), anchors);
        assert_eq!(reorder_anchors(&anchors, &[id("A")], Some(&id("X"))), anchors);
        assert_eq!(reorder_anchors(&anchors, &[id("A"), id("B")], Some(&id("B"))), anchors);
    }

    #[test]
    fn test_filter_is_case_insensitive_over_label_note_path() {
        let mut store = AnchorStore::new(MemoryBackend::new());
        store
            .save_all(&[
                test_anchor("first", "/src/lib.rs", 0),
                test_anchor("second", "/src/main.rs", 0),
                test_anchor("third", "/src/debug.rs", 0),
            ])
            .unwrap();
        store
            .update_fields(
                &id("first"),
                &AnchorPatch {
                    note: Some("Bug in parser".to_string()),
                    ..AnchorPatch::default()
                },
            )
            .unwrap();

        let mut view = AnchorListView::new();
        view.set_filter("bug");
        let visible = view.view(&store).unwrap();

        // "second" has no match in label, note or path
        assert_eq!(order(&visible), vec!["first", "third"]);
        assert_eq!(store.len().unwrap(), 3);
        assert_eq!(order(&store.load().unwrap()), vec!["first", "second", "third"]);

        view.set_filter("   ");
        assert_eq!(view.view(&store).unwrap().len(), 3);
    }

    #[test]
    fn test_reorder_writes_through_store_and_notifies() {
        let mut store = AnchorStore::new(MemoryBackend::new());
        store.save_all(&list(&["A", "B", "C", "D"])).unwrap();
        let mut view = AnchorListView::new();
        let rx = view.subscribe();

        assert!(view.on_reorder(&mut store, &[id("D")], Some(&id("B"))).unwrap());

        assert_eq!(order(&store.load().unwrap()), vec!["A", "D", "B", "C"]);
        assert_eq!(rx.try_recv(), Ok(ViewEvent::Changed));
    }

    #[test]
    fn test_noop_reorder_skips_write() {
        let mut store = AnchorStore::new(MemoryBackend::new());
        store.save_all(&list(&["A", "B"])).unwrap();
        let writes = store.backend().write_count();
        let mut view = AnchorListView::new();
        let rx = view.subscribe();

        assert!(!view.on_reorder(&mut store, &[id("A")], Some(&id("B"))).unwrap());
        assert_eq!(store.backend().write_count(), writes);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut view = AnchorListView::new();
        let kept = view.subscribe();
        drop(view.subscribe());

        view.set_filter("todo");

        assert_eq!(view.subscriber_count(), 1);
        assert_eq!(kept.try_recv(), Ok(ViewEvent::FilterChanged("todo".to_string())));
    }
}
