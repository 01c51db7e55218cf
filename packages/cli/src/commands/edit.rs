use super::{reported, resolve, Context};
use crate::host::{Presets, TerminalHost};
use anyhow::Result;
use clap::Args;
use code_anchor_core::AnchorIcon;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Anchor position, id, or id prefix
    pub anchor: String,

    /// New label; prompts when omitted
    #[arg(short, long)]
    pub label: Option<String>,

    /// New icon; prompts when omitted
    #[arg(short, long)]
    pub icon: Option<AnchorIcon>,

    /// New note; prompts when omitted
    #[arg(short, long)]
    pub note: Option<String>,
}

pub fn edit(args: EditArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.open_session();
    let anchors = session.store().load()?;
    let id = resolve(&anchors, &args.anchor)?.id().clone();

    let mut host = TerminalHost::stdio().with_presets(Presets {
        label: args.label,
        icon: args.icon,
        note: args.note,
        assume_yes: false,
    });

    let updated = session.edit_anchor(&mut host, &id).map_err(reported)?;
    println!("  {} Updated {}", "✓".green(), updated.label());
    Ok(())
}
