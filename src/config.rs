// WHY: Settings for the reference host and the selection tracker, loadable from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::host::{ENTER_COMMAND, SHIFT_ENTER_COMMAND};

/// Auto-link configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutolinkConfig {
    /// Protocol prepended to links found without one, e.g. `"https"`
    pub default_protocol: Option<String>,
    /// Element names inside which auto-linking is switched off
    pub no_link_blocks: Vec<String>,
    /// Commands registered by the in-memory editor
    pub commands: Vec<String>,
}

impl Default for AutolinkConfig {
    fn default() -> Self {
        Self {
            default_protocol: None,
            no_link_blocks: vec!["codeBlock".to_string()],
            commands: vec![ENTER_COMMAND.to_string(), SHIFT_ENTER_COMMAND.to_string()],
        }
    }
}

impl AutolinkConfig {
    pub fn with_default_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.default_protocol = Some(protocol.into());
        self
    }

    pub fn with_commands(mut self, commands: &[&str]) -> Self {
        self.commands = commands.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid auto-link configuration")
    }
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AutolinkConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    AutolinkConfig::from_toml_str(&content)
}

/// Load configuration from a TOML file (async version)
pub async fn load_config_async<P: AsRef<Path>>(path: P) -> Result<AutolinkConfig> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    AutolinkConfig::from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AutolinkConfig::default();
        assert_eq!(config.default_protocol, None);
        assert_eq!(config.no_link_blocks, vec!["codeBlock"]);
        assert_eq!(config.commands, vec!["enter", "shiftEnter"]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AutolinkConfig::from_toml_str("default_protocol = \"https\"\n").unwrap();
        assert_eq!(config.default_protocol.as_deref(), Some("https"));
        assert_eq!(config.no_link_blocks, vec!["codeBlock"]);
    }

    #[test]
    fn test_full_toml() {
        let content = r#"
            default_protocol = "http"
            no_link_blocks = ["codeBlock", "rawHtml"]
            commands = ["enter"]
        "#;
        let config = AutolinkConfig::from_toml_str(content).unwrap();
        assert_eq!(config.no_link_blocks.len(), 2);
        assert_eq!(config.commands, vec!["enter"]);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(AutolinkConfig::from_toml_str("default_protocol = [").is_err());
        assert!(AutolinkConfig::from_toml_str("no_link_blocks = 3").is_err());
    }
}
