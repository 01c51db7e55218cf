//! # Code Anchor Core
//!
//! Bookkeeping engine for named source anchors.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: selection, prompts, navigation        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: add / edit / delete / jump         │
//! │  - Rebase anchors on text edits             │
//! │  - Filter and reorder through the view      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ store: ordered anchors in one keyed slot    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Store is source of truth**: the view is derived and never persisted
//! 2. **Compute, then write**: every command builds its full next sequence
//!    before a single `save_all`
//! 3. **Cancel means nothing happened**: dismissed prompts never write
//! 4. **Lossy load**: a malformed record is dropped, the rest survive
//!
//! ## Usage
//!
//! ```rust,ignore
//! use code_anchor_core::{AnchorSession, AnchorStore, MemoryBackend};
//!
//! let store = AnchorStore::new(MemoryBackend::new());
//! let mut session = AnchorSession::new(store);
//!
//! // Host supplies the selection and answers the icon/note prompts
//! session.add_anchor(&mut host)?;
//!
//! let visible = session.view()?;
//! ```

mod anchor;
mod errors;
mod host;
mod rebase;
mod record;
mod session;
mod storage;
mod store;
mod view;

pub use anchor::{Anchor, AnchorIcon, AnchorId, AnchorPatch, Selection};
pub use errors::{AnchorError, RecordError, StorageError};
pub use host::{Host, NoticeLevel};
pub use rebase::{count_newlines, rebase_anchors, EditEvent, RebaseOutcome, TextEdit};
pub use record::{decode_records, encode_records, DecodedRecords};
pub use session::AnchorSession;
pub use storage::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use store::{AnchorStore, DEFAULT_SLOT_KEY, MAX_ANCHORS};
pub use view::{filter_anchors, matches_query, reorder_anchors, AnchorListView, ViewEvent};
