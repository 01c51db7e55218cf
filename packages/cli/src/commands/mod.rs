pub mod add;
pub mod clear;
pub mod delete;
pub mod edit;
pub mod init;
pub mod jump;
pub mod list;
pub mod move_;
pub mod rebase;
pub mod show;

pub use add::{add, AddArgs};
pub use clear::{clear, ClearArgs};
pub use delete::{delete, DeleteArgs};
pub use edit::{edit, EditArgs};
pub use init::{init, InitArgs};
pub use jump::{jump, JumpArgs};
pub use list::{list, ListArgs};
pub use move_::{move_anchors, MoveArgs};
pub use rebase::{rebase, RebaseArgs};
pub use show::{show, ShowArgs};

use crate::config::Config;
use anyhow::{anyhow, Result};
use code_anchor_core::{Anchor, AnchorError, AnchorSession, AnchorStore, JsonFileBackend};
use std::path::PathBuf;
use tracing::debug;

/// Resolved runtime settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct Context {
    pub cwd: PathBuf,
    pub config: Config,
    pub store_override: Option<PathBuf>,
}

impl Context {
    pub fn store_path(&self) -> PathBuf {
        match &self.store_override {
            Some(path) => self.cwd.join(path),
            None => self.config.get_store_path(&self.cwd),
        }
    }

    pub fn open_session(&self) -> AnchorSession<JsonFileBackend> {
        let path = self.store_path();
        debug!(
            store = %path.display(),
            slot = %self.config.slot_key,
            overridden = self.store_override.is_some(),
            "Opening anchor store"
        );
        let backend = JsonFileBackend::new(path);
        AnchorSession::new(AnchorStore::with_key(backend, self.config.slot_key.clone()))
    }
}

/// An error the host has already shown to the user
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct AlreadyReported(pub AnchorError);

/// Convert an error from a command that already reported it through the host
pub fn reported(err: AnchorError) -> anyhow::Error {
    if err.is_user_visible() {
        AlreadyReported(err).into()
    } else {
        err.into()
    }
}

/// Find an anchor by 1-based position, full id, or unique id prefix
pub fn resolve<'a>(anchors: &'a [Anchor], key: &str) -> Result<&'a Anchor> {
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Empty anchor reference"));
    }

    if key.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(position) = key.parse::<usize>() {
            if position >= 1 && position <= anchors.len() {
                return Ok(&anchors[position - 1]);
            }
        }
    }

    if let Some(anchor) = anchors.iter().find(|a| a.id().as_str() == key) {
        return Ok(anchor);
    }

    let matches: Vec<&Anchor> = anchors
        .iter()
        .filter(|a| a.id().as_str().starts_with(key))
        .collect();
    match matches.as_slice() {
        [single] => Ok(single),
        [] => Err(anyhow!("No anchor matches '{}'", key)),
        _ => Err(anyhow!(
            "'{}' is ambiguous ({} anchors match); use a longer id",
            key,
            matches.len()
        )),
    }
}

/// Short form of an id for listings
pub fn short_id(anchor: &Anchor) -> &str {
    let id = anchor.id().as_str();
    id.get(..8).unwrap_or(id)
}
