//! # Line Rebase
//!
//! Keeps anchor start lines aligned with edits to their file without reading
//! the file.
//!
//! An edit replaces the line range `range_start_line..=range_end_line` with new
//! text. Its line delta is the number of newlines in the replacement minus the
//! number of line breaks the range spanned. Anchors whose start lies strictly
//! below the edited range move by that delta; anchors that overlap or touch
//! the range stay where they are.
//!
//! All edits of one event are measured against the positions the anchors had
//! before the event, and each anchor moves once by the sum of its deltas.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{Anchor, AnchorError, AnchorId};

/// One replaced line range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    /// Zero-based first replaced line
    pub range_start_line: u32,
    /// Zero-based last replaced line
    pub range_end_line: u32,
    /// Replacement text
    pub text: String,
}

impl TextEdit {
    pub fn new(range_start_line: u32, range_end_line: u32, text: impl Into<String>) -> Self {
        Self {
            range_start_line,
            range_end_line,
            text: text.into(),
        }
    }

    /// Net number of lines this edit adds (negative when it removes lines)
    pub fn lines_delta(&self) -> i64 {
        let removed = i64::from(self.range_end_line) - i64::from(self.range_start_line);
        count_newlines(&self.text) as i64 - removed
    }

    fn validate(&self) -> Result<(), AnchorError> {
        if self.range_start_line > self.range_end_line {
            return Err(AnchorError::InvalidEdit {
                start: self.range_start_line,
                end: self.range_end_line,
            });
        }
        Ok(())
    }
}

/// All edits the host reported for one file in one change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEvent {
    pub file_path: PathBuf,
    pub edits: Vec<TextEdit>,
}

impl EditEvent {
    pub fn new(file_path: impl Into<PathBuf>, edits: Vec<TextEdit>) -> Self {
        Self {
            file_path: file_path.into(),
            edits,
        }
    }
}

/// Anchors moved by one event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebaseOutcome {
    /// `(id, old line, new line)` in store order
    pub moved: Vec<(AnchorId, u32, u32)>,
}

impl RebaseOutcome {
    pub fn is_changed(&self) -> bool {
        !self.moved.is_empty()
    }
}

/// Count line breaks; `\r\n` counts once
pub fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

/// Shift the start lines of `anchors` for `event`
///
/// Invalid edits are rejected before any anchor is touched.
#[instrument(skip(anchors, event), fields(file = %event.file_path.display(), edits = event.edits.len()))]
pub fn rebase_anchors(
    anchors: &mut [Anchor],
    event: &EditEvent,
) -> Result<RebaseOutcome, AnchorError> {
    for edit in &event.edits {
        edit.validate()?;
    }

    let mut outcome = RebaseOutcome::default();
    for anchor in anchors
        .iter_mut()
        .filter(|a| a.file_path() == event.file_path.as_path())
    {
        let original = anchor.line_number();
        let delta: i64 = event
            .edits
            .iter()
            .filter(|edit| edit.range_end_line < original)
            .map(TextEdit::lines_delta)
            .sum();
        if delta == 0 {
            continue;
        }

        let shifted = (i64::from(original) + delta).clamp(0, i64::from(u32::MAX));
        let line = u32::try_from(shifted).unwrap_or(original);
        if line != original {
            debug!(id = %anchor.id(), from = original, to = line, "Rebased anchor");
            anchor.set_line_number(line);
            outcome.moved.push((anchor.id().clone(), original, line));
        }
    }

    Ok(outcome)
}
