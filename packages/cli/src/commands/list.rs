use super::{short_id, Context};
use anyhow::Result;
use clap::Args;
use code_anchor_core::Anchor;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show anchors whose label, note or path contains this text
    #[arg(short, long, default_value = "")]
    pub filter: String,

    /// Print the anchors as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.open_session();
    let all = session.store().load()?;
    session.set_filter(args.filter.clone());
    let visible = session.view()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if all.is_empty() {
        println!("{}", "No anchors yet. Add one with: code-anchor add <file> --lines <N>".yellow());
        return Ok(());
    }
    if visible.is_empty() {
        println!("{} No anchors match '{}'", "⚠️".yellow(), args.filter);
        return Ok(());
    }

    for anchor in &visible {
        // Positions refer to the unfiltered order so they can be passed to other commands
        let position = all
            .iter()
            .position(|a| a.id() == anchor.id())
            .map(|i| i + 1)
            .unwrap_or_default();
        print_row(position, anchor);
    }

    if visible.len() < all.len() {
        println!();
        println!("{} of {} anchors shown", visible.len(), all.len());
    }
    Ok(())
}

fn print_row(position: usize, anchor: &Anchor) {
    println!(
        "{:>3}. {} {}  {}  {}",
        position,
        anchor.icon().glyph(),
        anchor.label().bold(),
        anchor.description().dimmed(),
        short_id(anchor).bright_black()
    );
    if !anchor.note().is_empty() {
        println!("       {}", anchor.note().italic());
    }
}
