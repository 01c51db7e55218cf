use super::{reported, Context};
use crate::host::{Presets, TerminalHost};
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

pub fn clear(args: ClearArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.open_session();
    let mut host = TerminalHost::stdio().with_presets(Presets {
        assume_yes: args.yes,
        ..Presets::default()
    });

    let removed = session.clear_anchors(&mut host).map_err(reported)?;
    println!("  {} Removed {} anchor(s)", "✓".green(), removed);
    Ok(())
}
