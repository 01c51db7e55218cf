use super::{reported, Context};
use crate::host::{Presets, TerminalHost};
use anyhow::{anyhow, Context as _, Result};
use clap::Args;
use code_anchor_core::{AnchorIcon, Selection};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// File containing the code to anchor
    pub file: String,

    /// Lines to select, 1-based (`12` or `12-15`)
    #[arg(short, long)]
    pub lines: LineRange,

    /// Icon (default, bug, todo, note); prompts when omitted
    #[arg(short, long)]
    pub icon: Option<AnchorIcon>,

    /// Note text; prompts when omitted
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Inclusive 1-based line range as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| -> Result<u32, String> {
            let n: u32 = part
                .trim()
                .parse()
                .map_err(|_| format!("'{}' is not a line number", part.trim()))?;
            if n == 0 {
                return Err("line numbers start at 1".to_string());
            }
            Ok(n)
        };

        let (start, end) = match s.split_once('-') {
            Some((a, b)) => (parse(a)?, parse(b)?),
            None => {
                let n = parse(s)?;
                (n, n)
            }
        };
        if start > end {
            return Err(format!("range {start}-{end} ends before it starts"));
        }
        Ok(Self { start, end })
    }
}

/// Build a selection from lines of a file on disk
pub fn selection_from_file(path: &Path, range: LineRange) -> Result<Selection> {
    let file_path = fs::canonicalize(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;
    let content = fs::read_to_string(&file_path)
        .with_context(|| format!("Cannot read {}", file_path.display()))?;

    let lines: Vec<&str> = content.lines().collect();
    let start = (range.start - 1) as usize;
    let end = (range.end - 1) as usize;
    if end >= lines.len() {
        return Err(anyhow!(
            "{} has {} lines; cannot select up to line {}",
            file_path.display(),
            lines.len(),
            range.end
        ));
    }

    Ok(Selection {
        file_path,
        start_line: range.start - 1,
        end_line: range.end - 1,
        text: lines[start..=end].join("\n"),
    })
}

pub fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let selection = selection_from_file(&ctx.cwd.join(&args.file), args.lines)?;

    let mut host = TerminalHost::stdio()
        .with_selection(selection)
        .with_presets(Presets {
            icon: args.icon,
            note: args.note,
            ..Presets::default()
        });

    let mut session = ctx.open_session();
    let anchor = session.add_anchor(&mut host).map_err(reported)?;

    println!("{}", anchor.id());
    Ok(())
}
