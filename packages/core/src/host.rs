//! Host editor seam
//!
//! Everything the command surface needs from the surrounding editor. Prompt
//! methods return `None` when the user dismisses them.

use std::path::Path;

use crate::{AnchorIcon, Selection};

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

pub trait Host {
    /// Current non-empty selection in the active editor, if any
    fn active_selection(&self) -> Option<Selection>;

    /// Ask for an icon, preselecting `current`
    fn pick_icon(&mut self, current: AnchorIcon) -> Option<AnchorIcon>;

    /// Ask for a note, prefilled with `current`
    fn prompt_note(&mut self, current: &str) -> Option<String>;

    /// Ask for a label, prefilled with `current`
    fn prompt_label(&mut self, current: &str) -> Option<String>;

    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> bool;

    /// Open `path` with the cursor on zero-based `line`, centred in view
    fn open_at(&mut self, path: &Path, line: u32) -> Result<(), String>;

    /// Show a message to the user
    fn notify(&mut self, level: NoticeLevel, message: &str);
}
