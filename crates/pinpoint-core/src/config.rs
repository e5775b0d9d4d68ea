//! Configuration management for Pinpoint
//!
//! This module provides configuration for the storage layout, the picker, and the
//! static guidance blocks appended to generated prompts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;

/// Pinpoint configuration
///
/// Loaded from `.pinpoint/config.toml` under the data root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinpointConfig {
    /// Maximum number of generated prompts kept in history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// File name of the JSON store inside the data root
    #[serde(default = "default_storage_file")]
    pub storage_file: String,

    /// Id of Pinpoint's own UI root; elements inside it are never picked
    #[serde(default = "default_ignore_root_id")]
    pub ignore_root_id: String,

    /// Class toggled on the hovered element while picking
    #[serde(default = "default_highlight_class")]
    pub highlight_class: String,

    /// Static prompt blocks
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// Static guidance appended to every prompt section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_guidelines")]
    pub guidelines: Vec<String>,

    #[serde(default = "default_constraints")]
    pub constraints: Vec<String>,
}

// Default value providers
fn default_history_capacity() -> usize {
    50
}

fn default_storage_file() -> String {
    "pinpoint_data.json".to_string()
}

fn default_ignore_root_id() -> String {
    "pinpoint-root".to_string()
}

fn default_highlight_class() -> String {
    "pinpoint-highlight".to_string()
}

fn default_guidelines() -> Vec<String> {
    vec![
        "preserve existing interaction patterns".to_string(),
        "maintain current animation logic unless specified".to_string(),
        "keep accessibility (aria labels, keyboard nav)".to_string(),
    ]
}

fn default_constraints() -> Vec<String> {
    vec![
        "mobile viewport must work".to_string(),
        "loading states must remain intact".to_string(),
    ]
}

impl PinpointConfig {
    /// Path of the config file for a data root
    pub fn path(data_root: &Path) -> PathBuf {
        data_root.join(".pinpoint/config.toml")
    }

    /// Load configuration from `.pinpoint/config.toml` or use defaults
    pub fn load_or_default(data_root: &Path) -> Result<Self> {
        let config_path = Self::path(data_root);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content).map_err(|e| {
                crate::PinpointError::Config(format!("Failed to parse config file: {}", e))
            })?)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `.pinpoint/config.toml`
    pub fn write_default(data_root: &Path) -> Result<()> {
        let config_dir = data_root.join(".pinpoint");
        std::fs::create_dir_all(&config_dir)?;

        let config = Self::default();
        let content = toml::to_string_pretty(&config).map_err(|e| {
            crate::PinpointError::Config(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(Self::path(data_root), content)?;
        Ok(())
    }

    /// Location of the JSON store for a data root
    pub fn storage_path(&self, data_root: &Path) -> PathBuf {
        data_root.join(".pinpoint").join(&self.storage_file)
    }
}

impl Default for PinpointConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            storage_file: default_storage_file(),
            ignore_root_id: default_ignore_root_id(),
            highlight_class: default_highlight_class(),
            prompt: PromptConfig::default(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            guidelines: default_guidelines(),
            constraints: default_constraints(),
        }
    }
}
