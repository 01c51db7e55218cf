//! # Anchor Record
//!
//! A named bookmark over a line range of one file.
//!
//! Identity, location and captured text are fixed when the anchor is created.
//! Only `label`, `icon` and `note` are user-editable, and only the rebase
//! engine moves `line_number`. The fields are private so those rules hold
//! outside this crate as well.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AnchorError;

/// Opaque anchor identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(String);

impl AnchorId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnchorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AnchorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Icon category shown next to an anchor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorIcon {
    #[default]
    Default,
    Bug,
    Todo,
    Note,
}

impl AnchorIcon {
    pub const ALL: [AnchorIcon; 4] = [
        AnchorIcon::Default,
        AnchorIcon::Bug,
        AnchorIcon::Todo,
        AnchorIcon::Note,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnchorIcon::Default => "default",
            AnchorIcon::Bug => "bug",
            AnchorIcon::Todo => "todo",
            AnchorIcon::Note => "note",
        }
    }

    /// Single-glyph rendering for terminals
    pub fn glyph(self) -> &'static str {
        match self {
            AnchorIcon::Default => "⚓",
            AnchorIcon::Bug => "🐞",
            AnchorIcon::Todo => "☑",
            AnchorIcon::Note => "✎",
        }
    }
}

impl fmt::Display for AnchorIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnchorIcon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(AnchorIcon::Default),
            "bug" => Ok(AnchorIcon::Bug),
            "todo" => Ok(AnchorIcon::Todo),
            "note" => Ok(AnchorIcon::Note),
            other => Err(format!(
                "unknown icon '{other}' (expected default, bug, todo or note)"
            )),
        }
    }
}

/// Active text selection reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub file_path: PathBuf,
    /// Zero-based first line
    pub start_line: u32,
    /// Zero-based last line, inclusive
    pub end_line: u32,
    pub text: String,
}

impl Selection {
    /// True when the selection holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Partial update of the editable fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorPatch {
    pub label: Option<String>,
    pub icon: Option<AnchorIcon>,
    pub note: Option<String>,
}

impl AnchorPatch {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.icon.is_none() && self.note.is_none()
    }
}

/// Persisted bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Anchor {
    id: AnchorId,
    label: String,
    file_path: PathBuf,
    line_number: u32,
    end_line_number: u32,
    code_text: String,
    icon: AnchorIcon,
    note: String,
}

impl Anchor {
    /// Create an anchor from a selection, labelled with the trimmed text
    pub fn from_selection(
        selection: &Selection,
        icon: AnchorIcon,
        note: impl Into<String>,
    ) -> Result<Self, AnchorError> {
        if selection.is_blank() {
            return Err(AnchorError::NoSelection);
        }
        if selection.start_line > selection.end_line {
            return Err(AnchorError::InvalidRange {
                start: selection.start_line,
                end: selection.end_line,
            });
        }

        let text = selection.text.trim().to_string();
        Ok(Self {
            id: AnchorId::generate(),
            label: text.clone(),
            file_path: selection.file_path.clone(),
            line_number: selection.start_line,
            end_line_number: selection.end_line,
            code_text: text,
            icon,
            note: note.into(),
        })
    }

    pub fn id(&self) -> &AnchorId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    pub fn end_line_number(&self) -> u32 {
        self.end_line_number
    }

    pub fn code_text(&self) -> &str {
        &self.code_text
    }

    pub fn icon(&self) -> AnchorIcon {
        self.icon
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Apply the editable fields of a patch, returning whether anything changed
    pub fn apply_patch(&mut self, patch: &AnchorPatch) -> bool {
        let before = (self.label.clone(), self.icon, self.note.clone());
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(note) = &patch.note {
            self.note = note.clone();
        }
        before != (self.label.clone(), self.icon, self.note.clone())
    }

    pub(crate) fn set_line_number(&mut self, line: u32) {
        self.line_number = line;
    }

    /// True once a rebase has moved the start line past the fixed end line
    pub fn has_stale_end(&self) -> bool {
        self.line_number > self.end_line_number
    }

    /// `L12` or `L12-15`, one-based
    pub fn line_info(&self) -> String {
        if self.line_number >= self.end_line_number {
            format!("L{}", self.line_number + 1)
        } else {
            format!("L{}-{}", self.line_number + 1, self.end_line_number + 1)
        }
    }

    /// `main.rs (L12-15)`
    pub fn description(&self) -> String {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string());
        format!("{} ({})", name, self.line_info())
    }

    pub fn tooltip(&self) -> String {
        format!("{}\n{}", self.file_path.display(), self.line_info())
    }
}

#[cfg(test)]
pub(crate) fn test_anchor(id: &str, file: &str, line: u32) -> Anchor {
    Anchor {
        id: AnchorId::from(id),
        label: id.to_string(),
        file_path: PathBuf::from(file),
        line_number: line,
        end_line_number: line,
        code_text: format!("code of {id}"),
        icon: AnchorIcon::Default,
        note: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(text: &str, start: u32, end: u32) -> Selection {
        Selection {
            file_path: PathBuf::from("/work/src/main.rs"),
            start_line: start,
            end_line: end,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_label_defaults_to_trimmed_selection() {
        let anchor =
            Anchor::from_selection(&selection("  fn main() {}\n", 4, 4), AnchorIcon::Todo, "")
                .unwrap();

        assert_eq!(anchor.label(), "fn main() {}");
        assert_eq!(anchor.code_text(), "fn main() {}");
        assert_eq!(anchor.line_number(), 4);
        assert_eq!(anchor.icon(), AnchorIcon::Todo);
        assert!(anchor.note().is_empty());
    }

    #[test]
    fn test_blank_selection_is_rejected() {
        let err = Anchor::from_selection(&selection(" \n\t", 1, 2), AnchorIcon::Default, "")
            .unwrap_err();
        assert!(matches!(err, AnchorError::NoSelection));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = Anchor::from_selection(&selection("x", 5, 2), AnchorIcon::Default, "")
            .unwrap_err();
        assert!(matches!(err, AnchorError::InvalidRange { start: 5, end: 2 }));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Anchor::from_selection(&selection("x", 0, 0), AnchorIcon::Default, "").unwrap();
        let b = Anchor::from_selection(&selection("x", 0, 0), AnchorIcon::Default, "").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_line_info_and_description() {
        let single = Anchor::from_selection(&selection("x", 9, 9), AnchorIcon::Default, "").unwrap();
        assert_eq!(single.line_info(), "L10");
        assert_eq!(single.description(), "main.rs (L10)");

        let multi = Anchor::from_selection(&selection("x", 9, 11), AnchorIcon::Default, "").unwrap();
        assert_eq!(multi.line_info(), "L10-12");
        assert_eq!(multi.tooltip(), "/work/src/main.rs\nL10-12");
    }

    #[test]
    fn test_patch_touches_only_editable_fields() {
        let mut anchor =
            Anchor::from_selection(&selection("let x = 1;", 3, 3), AnchorIcon::Default, "").unwrap();
        let id = anchor.id().clone();

        let changed = anchor.apply_patch(&AnchorPatch {
            label: Some("init".to_string()),
            icon: Some(AnchorIcon::Bug),
            note: Some("off by one".to_string()),
        });

        assert!(changed);
        assert_eq!(anchor.id(), &id);
        assert_eq!(anchor.label(), "init");
        assert_eq!(anchor.icon(), AnchorIcon::Bug);
        assert_eq!(anchor.note(), "off by one");
        assert_eq!(anchor.code_text(), "let x = 1;");
        assert!(!anchor.apply_patch(&AnchorPatch::default()));
    }

    #[test]
    fn test_icon_parsing() {
        assert_eq!("BUG".parse::<AnchorIcon>(), Ok(AnchorIcon::Bug));
        assert_eq!("".parse::<AnchorIcon>(), Ok(AnchorIcon::Default));
        assert!("star".parse::<AnchorIcon>().is_err());
    }
}
