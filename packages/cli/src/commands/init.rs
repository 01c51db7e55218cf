use super::Context;
use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// State file location, relative to the working directory
    #[arg(short, long)]
    pub store_path: Option<String>,

    /// Editor command used by `jump`
    #[arg(short, long)]
    pub editor: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "⚓ Initializing code-anchor...".bright_blue().bold());

    let mut config = Config::default();
    if let Some(store_path) = args.store_path {
        config.store_path = store_path;
    }
    config.editor = args.editor;

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let store_path = config.get_store_path(&ctx.cwd);
    if let Some(parent) = store_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            println!("  {} Created {}/", "✓".green(), parent.display());
        }
    }

    println!();
    println!("{}", "✅ Ready!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: code-anchor add <file> --lines <N>");
    println!("  2. Run: code-anchor list");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn context(cwd: PathBuf) -> Context {
        Context {
            cwd,
            config: Config::default(),
            store_override: None,
        }
    }

    #[test]
    fn test_init_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path().to_path_buf());

        init(
            InitArgs {
                store_path: Some("state/anchors.json".to_string()),
                editor: Some("vim".to_string()),
                force: false,
            },
            &ctx,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.store_path, "state/anchors.json");
        assert_eq!(config.editor.as_deref(), Some("vim"));
        assert!(dir.path().join("state").is_dir());
    }

    #[test]
    fn test_init_keeps_existing_config_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&config_path, r#"{ "slotKey": "mine" }"#).unwrap();
        let ctx = context(dir.path().to_path_buf());

        init(
            InitArgs {
                store_path: None,
                editor: None,
                force: false,
            },
            &ctx,
        )
        .unwrap();

        assert_eq!(Config::load(dir.path()).unwrap().slot_key, "mine");
    }
}
