//! Error types for anchor operations

use std::path::PathBuf;

use thiserror::Error;

use crate::AnchorId;

#[derive(Error, Debug)]
pub enum AnchorError {
    #[error("Anchor limit reached ({limit}); delete an anchor before adding another")]
    CapacityExceeded { limit: usize },

    #[error("Please select some code to create an anchor")]
    NoSelection,

    #[error("Invalid line range {start}..={end}")]
    InvalidRange { start: u32, end: u32 },

    #[error("Could not open {}: {reason}", path.display())]
    FileUnavailable { path: PathBuf, reason: String },

    #[error("Cancelled")]
    UserCancelled,

    #[error("Anchor not found: {0}")]
    NotFound(AnchorId),

    #[error("An anchor with id {0} already exists")]
    DuplicateId(AnchorId),

    #[error("Invalid edit: range start {start} is after range end {end}")]
    InvalidEdit { start: u32, end: u32 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AnchorError {
    /// Whether the host should show this error to the user
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, AnchorError::UserCancelled)
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("State file {} is not a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

/// Why a single persisted record was dropped on load
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("record {index}: {reason}")]
    Malformed { index: usize, reason: String },

    #[error("record {index}: duplicate id {id}")]
    DuplicateId { index: usize, id: AnchorId },
}

impl RecordError {
    pub fn index(&self) -> usize {
        match self {
            RecordError::Malformed { index, .. } | RecordError::DuplicateId { index, .. } => *index,
        }
    }
}
