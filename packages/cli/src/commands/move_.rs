use super::{resolve, Context};
use anyhow::Result;
use clap::Args;
use code_anchor_core::AnchorId;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Anchors to move as one block (position, id, or id prefix)
    #[arg(required = true)]
    pub anchors: Vec<String>,

    /// Place the block before this anchor; moves to the end when omitted
    #[arg(short, long)]
    pub before: Option<String>,
}

pub fn move_anchors(args: MoveArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.open_session();
    let anchors = session.store().load()?;

    let dragged = args
        .anchors
        .iter()
        .map(|key| resolve(&anchors, key).map(|a| a.id().clone()))
        .collect::<Result<Vec<AnchorId>>>()?;
    let target = match &args.before {
        Some(key) => Some(resolve(&anchors, key)?.id().clone()),
        None => None,
    };

    if session.reorder(&dragged, target.as_ref())? {
        println!("  {} Moved {} anchor(s)", "✓".green(), dragged.len());
    } else {
        println!("  {} Order unchanged", "•".dimmed());
    }
    Ok(())
}
