//! # Anchor Session
//!
//! Command surface over one store and its list view.
//!
//! Each command reads what it needs, runs every host prompt, and only then
//! writes. A dismissed prompt returns [`AnchorError::UserCancelled`] before
//! anything is saved. User-visible failures are also reported to the host;
//! cancellation is silent.

use std::collections::HashSet;
use std::sync::mpsc::Receiver;

use tracing::{info, instrument};

use crate::{
    Anchor, AnchorError, AnchorIcon, AnchorId, AnchorListView, AnchorPatch, AnchorStore,
    EditEvent, Host, NoticeLevel, RebaseOutcome, StorageBackend, ViewEvent, MAX_ANCHORS,
};

pub struct AnchorSession<B> {
    store: AnchorStore<B>,
    view: AnchorListView,
}

impl<B: StorageBackend> AnchorSession<B> {
    pub fn new(store: AnchorStore<B>) -> Self {
        Self {
            store,
            view: AnchorListView::new(),
        }
    }

    pub fn store(&self) -> &AnchorStore<B> {
        &self.store
    }

    pub fn list_view(&self) -> &AnchorListView {
        &self.view
    }

    /// Filtered anchors for rendering
    pub fn view(&self) -> Result<Vec<Anchor>, AnchorError> {
        self.view.view(&self.store)
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.view.set_filter(query);
    }

    pub fn subscribe(&mut self) -> Receiver<ViewEvent> {
        self.view.subscribe()
    }

    /// Create an anchor from the host's active selection
    #[instrument(skip(self, host))]
    pub fn add_anchor<H: Host>(&mut self, host: &mut H) -> Result<Anchor, AnchorError> {
        let result = self.try_add(host);
        report(host, result)
    }

    fn try_add<H: Host>(&mut self, host: &mut H) -> Result<Anchor, AnchorError> {
        let selection = host
            .active_selection()
            .filter(|s| !s.is_blank())
            .ok_or(AnchorError::NoSelection)?;

        if self.store.len()? >= MAX_ANCHORS {
            return Err(AnchorError::CapacityExceeded { limit: MAX_ANCHORS });
        }

        let icon = host
            .pick_icon(AnchorIcon::Default)
            .ok_or(AnchorError::UserCancelled)?;
        let note = host.prompt_note("").ok_or(AnchorError::UserCancelled)?;

        let anchor = Anchor::from_selection(&selection, icon, note)?;
        self.store.add(anchor.clone())?;
        self.view.refresh();

        info!(id = %anchor.id(), file = %anchor.file_path().display(), "Anchor added");
        host.notify(
            NoticeLevel::Info,
            &format!("⚓ Anchor added for: \"{}\"", anchor.label()),
        );
        Ok(anchor)
    }

    /// Prompt for a new label, icon and note
    #[instrument(skip(self, host, id), fields(id = %id))]
    pub fn edit_anchor<H: Host>(
        &mut self,
        host: &mut H,
        id: &AnchorId,
    ) -> Result<Anchor, AnchorError> {
        let result = self.try_edit(host, id);
        report(host, result)
    }

    fn try_edit<H: Host>(&mut self, host: &mut H, id: &AnchorId) -> Result<Anchor, AnchorError> {
        let current = self
            .store
            .get(id)?
            .ok_or_else(|| AnchorError::NotFound(id.clone()))?;

        let label = host
            .prompt_label(current.label())
            .ok_or(AnchorError::UserCancelled)?;
        let icon = host
            .pick_icon(current.icon())
            .ok_or(AnchorError::UserCancelled)?;
        let note = host
            .prompt_note(current.note())
            .ok_or(AnchorError::UserCancelled)?;

        let label = label.trim();
        let patch = AnchorPatch {
            label: (!label.is_empty()).then(|| label.to_string()),
            icon: Some(icon),
            note: Some(note),
        };

        let updated = self.store.update_fields(id, &patch)?;
        self.view.refresh();
        Ok(updated)
    }

    /// Delete the clicked anchor, or the whole selection when several are selected
    #[instrument(skip(self, clicked, selected), fields(clicked = %clicked, selected = selected.len()))]
    pub fn delete_anchor(
        &mut self,
        clicked: &AnchorId,
        selected: &[AnchorId],
    ) -> Result<usize, AnchorError> {
        let ids: HashSet<AnchorId> = if selected.len() > 1 {
            selected.iter().cloned().collect()
        } else {
            HashSet::from([clicked.clone()])
        };

        let removed = self.store.remove(&ids)?;
        if removed > 0 {
            self.view.refresh();
        }
        Ok(removed)
    }

    /// Remove every anchor after the host confirms
    pub fn clear_anchors<H: Host>(&mut self, host: &mut H) -> Result<usize, AnchorError> {
        let result = self.try_clear(host);
        report(host, result)
    }

    fn try_clear<H: Host>(&mut self, host: &mut H) -> Result<usize, AnchorError> {
        let count = self.store.len()?;
        if count == 0 {
            return Ok(0);
        }
        if !host.confirm(&format!("Remove all {count} anchors?")) {
            return Err(AnchorError::UserCancelled);
        }

        let removed = self.store.clear()?;
        self.view.refresh();
        Ok(removed)
    }

    /// Open the anchor's file at its start line
    #[instrument(skip(self, host, anchor), fields(id = %anchor.id()))]
    pub fn jump_to_anchor<H: Host>(
        &mut self,
        host: &mut H,
        anchor: &Anchor,
    ) -> Result<(), AnchorError> {
        let result = host
            .open_at(anchor.file_path(), anchor.line_number())
            .map_err(|reason| AnchorError::FileUnavailable {
                path: anchor.file_path().to_path_buf(),
                reason,
            });
        report(host, result)
    }

    /// Feed one text-change notification to the rebase engine
    pub fn apply_text_edits(&mut self, event: &EditEvent) -> Result<RebaseOutcome, AnchorError> {
        let outcome = self.store.apply_edits(event)?;
        if outcome.is_changed() {
            self.view.refresh();
        }
        Ok(outcome)
    }

    /// Drag-and-drop reorder
    pub fn reorder(
        &mut self,
        dragged: &[AnchorId],
        target: Option<&AnchorId>,
    ) -> Result<bool, AnchorError> {
        self.view.on_reorder(&mut self.store, dragged, target)
    }
}

fn report<H: Host, T>(host: &mut H, result: Result<T, AnchorError>) -> Result<T, AnchorError> {
    if let Err(err) = &result {
        if err.is_user_visible() {
            let level = match err {
                AnchorError::CapacityExceeded { .. } | AnchorError::NoSelection => {
                    NoticeLevel::Warning
                }
                _ => NoticeLevel::Error,
            };
            host.notify(level, &err.to_string());
        }
    }
    result
}
