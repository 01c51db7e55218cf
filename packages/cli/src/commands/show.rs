use super::{resolve, Context};
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Anchor position, id, or id prefix
    pub anchor: String,
}

pub fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let session = ctx.open_session();
    let anchors = session.store().load()?;
    let anchor = resolve(&anchors, &args.anchor)?;

    println!("{} {}", anchor.icon().glyph(), anchor.label().bold());
    println!("  {}   {}", "id".dimmed(), anchor.id());
    println!("  {}  {}", "file".dimmed(), anchor.file_path().display());
    println!("  {} {}", "lines".dimmed(), anchor.line_info());
    println!("  {}  {}", "icon".dimmed(), anchor.icon());
    if !anchor.note().is_empty() {
        println!("  {}  {}", "note".dimmed(), anchor.note());
    }
    if anchor.has_stale_end() {
        println!(
            "  {} end line was recorded before later edits",
            "⚠️".yellow()
        );
    }
    println!();
    for line in anchor.code_text().lines() {
        println!("    {}", line.cyan());
    }
    Ok(())
}
