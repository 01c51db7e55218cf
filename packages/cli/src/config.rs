use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "code-anchor.config.json";

/// code-anchor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// State file holding the anchor slot, relative to the working directory
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Key of the slot inside the state file
    #[serde(default = "default_slot_key")]
    pub slot_key: String,

    /// Editor command used by `jump` (`<editor> +<line> <file>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_store_path() -> String {
    ".code-anchor/state.json".to_string()
}

fn default_slot_key() -> String {
    code_anchor_core::DEFAULT_SLOT_KEY.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        Self::load_from(&cwd.join(DEFAULT_CONFIG_NAME))
    }

    /// Load config from an explicit file, defaulting when it does not exist
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get absolute path to the state file
    pub fn get_store_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.store_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            slot_key: default_slot_key(),
            editor: None,
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storePath": ".vscode/anchors.json",
            "slotKey": "workspace-anchors",
            "editor": "vim",
            "logLevel": "debug"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_path, ".vscode/anchors.json");
        assert_eq!(config.slot_key, "workspace-anchors");
        assert_eq!(config.editor.as_deref(), Some("vim"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "editor": "hx" }"#).unwrap();
        assert_eq!(config.store_path, ".code-anchor/state.json");
        assert_eq!(config.slot_key, "anchors");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.get_store_path(dir.path()),
            dir.path().join(".code-anchor/state.json")
        );
    }
}
