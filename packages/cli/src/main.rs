mod commands;
mod config;
mod host;

use clap::{Parser, Subcommand};
use code_anchor_core::AnchorError;
use colored::Colorize;
use commands::{
    add, clear, delete, edit, init, jump, list, move_anchors, rebase, show, AddArgs,
    AlreadyReported, ClearArgs, Context, DeleteArgs, EditArgs, InitArgs, JumpArgs, ListArgs,
    MoveArgs, RebaseArgs, ShowArgs,
};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// code-anchor - Bookmarks for lines of code that follow your edits
#[derive(Parser, Debug)]
#[command(name = "code-anchor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./code-anchor.config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State file (overrides storePath from config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a code-anchor config to the working directory
    Init(InitArgs),

    /// Anchor lines of a file
    Add(AddArgs),

    /// List anchors
    List(ListArgs),

    /// Show one anchor in full
    Show(ShowArgs),

    /// Change an anchor's label, icon, or note
    Edit(EditArgs),

    /// Delete one or more anchors
    Delete(DeleteArgs),

    /// Delete every anchor
    Clear(ClearArgs),

    /// Open an anchor's file at its line
    Jump(JumpArgs),

    /// Reorder anchors
    Move(MoveArgs),

    /// Shift anchors after a text edit
    Rebase(RebaseArgs),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()
        .map_err(|e| anyhow::anyhow!("Cannot get current directory: {e}"))?;

    let config = match &cli.config {
        Some(path) => Config::load_from(&cwd.join(path))?,
        None => Config::load(&cwd)?,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context {
        cwd,
        config,
        store_override: cli.store,
    };

    match cli.command {
        Command::Init(args) => init(args, &ctx),
        Command::Add(args) => add(args, &ctx),
        Command::List(args) => list(args, &ctx),
        Command::Show(args) => show(args, &ctx),
        Command::Edit(args) => edit(args, &ctx),
        Command::Delete(args) => delete(args, &ctx),
        Command::Clear(args) => clear(args, &ctx),
        Command::Jump(args) => jump(args, &ctx),
        Command::Move(args) => move_anchors(args, &ctx),
        Command::Rebase(args) => rebase(args, &ctx),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        if err.downcast_ref::<AlreadyReported>().is_some() {
            std::process::exit(1);
        }
        if let Some(AnchorError::UserCancelled) = err.downcast_ref::<AnchorError>() {
            return;
        }
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
