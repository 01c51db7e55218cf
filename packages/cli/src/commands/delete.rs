use super::{resolve, Context};
use anyhow::Result;
use clap::Args;
use code_anchor_core::AnchorId;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Anchors to delete (position, id, or id prefix)
    #[arg(required = true)]
    pub anchors: Vec<String>,
}

pub fn delete(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.open_session();
    let anchors = session.store().load()?;

    // Resolve everything first so a bad reference deletes nothing
    let selected = args
        .anchors
        .iter()
        .map(|key| resolve(&anchors, key).map(|a| a.id().clone()))
        .collect::<Result<Vec<AnchorId>>>()?;

    let removed = session.delete_anchor(&selected[0], &selected)?;
    println!("  {} Deleted {} anchor(s)", "✓".green(), removed);
    Ok(())
}
