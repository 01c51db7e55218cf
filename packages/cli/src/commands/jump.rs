use super::{reported, resolve, Context};
use crate::host::TerminalHost;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct JumpArgs {
    /// Anchor position, id, or id prefix
    pub anchor: String,

    /// Editor command to open the file with (overrides config)
    #[arg(short, long)]
    pub editor: Option<String>,
}

pub fn jump(args: JumpArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.open_session();
    let anchors = session.store().load()?;
    let anchor = resolve(&anchors, &args.anchor)?.clone();

    let mut host = TerminalHost::stdio().with_editor(args.editor.or_else(|| ctx.config.editor.clone()));
    session
        .jump_to_anchor(&mut host, &anchor)
        .map_err(reported)
}
