use super::{short_id, Context};
use anyhow::{anyhow, Context as _, Result};
use clap::Args;
use code_anchor_core::{Anchor, EditEvent, RebaseOutcome, TextEdit};
use colored::Colorize;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RebaseArgs {
    /// Read edit events as JSON lines from a file, or `-` for stdin
    #[arg(long, conflicts_with_all = ["file", "start", "end", "text"])]
    pub events: Option<String>,

    /// File that was edited
    #[arg(short, long, required_unless_present = "events")]
    pub file: Option<PathBuf>,

    /// First replaced line, 1-based
    #[arg(long, required_unless_present = "events")]
    pub start: Option<u32>,

    /// Last replaced line, 1-based (defaults to --start)
    #[arg(long)]
    pub end: Option<u32>,

    /// Replacement text (use an empty string for a deletion)
    #[arg(long, default_value = "")]
    pub text: String,
}

pub fn rebase(args: RebaseArgs, ctx: &Context) -> Result<()> {
    let events = match &args.events {
        Some(source) => read_events(source)?,
        None => vec![single_event(&args, ctx)?],
    };

    let mut session = ctx.open_session();
    let anchors = session.store().load()?;
    let mut total = 0;

    for event in &events {
        let outcome = session.apply_text_edits(event)?;
        total += outcome.moved.len();
        print_outcome(&outcome, &anchors);
    }

    if total == 0 {
        println!("  {} No anchors moved", "•".dimmed());
    }
    Ok(())
}

fn single_event(args: &RebaseArgs, ctx: &Context) -> Result<EditEvent> {
    let file = args
        .file
        .as_ref()
        .ok_or_else(|| anyhow!("--file is required"))?;
    let start = args.start.ok_or_else(|| anyhow!("--start is required"))?;
    let end = args.end.unwrap_or(start);
    if start == 0 || end == 0 {
        return Err(anyhow!("line numbers start at 1"));
    }

    let path = ctx.cwd.join(file);
    let path = fs::canonicalize(&path).unwrap_or(path);
    Ok(EditEvent::new(
        path,
        vec![TextEdit::new(start - 1, end - 1, args.text.clone())],
    ))
}

/// Parse one `EditEvent` per non-empty line
fn read_events(source: &str) -> Result<Vec<EditEvent>> {
    let reader: Box<dyn BufRead> = if source == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file =
            fs::File::open(source).with_context(|| format!("Cannot open events file {source}"))?;
        Box::new(BufReader::new(file))
    };
    parse_events(reader)
}

fn parse_events(reader: impl BufRead) -> Result<Vec<EditEvent>> {
    let mut events = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: EditEvent = serde_json::from_str(&line)
            .with_context(|| format!("Invalid edit event on line {}", i + 1))?;
        events.push(event);
    }
    Ok(events)
}

fn print_outcome(outcome: &RebaseOutcome, before: &[Anchor]) {
    for (id, from, to) in &outcome.moved {
        let label = before
            .iter()
            .find(|a| a.id() == id)
            .map(|a| format!("{} {}", a.label(), short_id(a).bright_black()))
            .unwrap_or_else(|| id.to_string());
        println!(
            "  {} {}  L{} → L{}",
            "✓".green(),
            label,
            from + 1,
            to + 1
        );
    }
}
