//! Configuration handling for the rmsk CLI
//!
//! Supports loading configuration from rmsk.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use rmsk_core::TrackConfig;
use rmsk_render::ExportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "rmsk.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub track: TrackConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Default record name filter
    #[serde(default)]
    pub name_filter: Option<String>,

    /// Treat the name filter as a regular expression instead of a wildcard
    #[serde(default)]
    pub filter_is_regex: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_true")]
    pub show_legend: bool,

    #[serde(default = "default_true")]
    pub show_footer: bool,

    #[serde(default = "default_true")]
    pub show_left_labels: bool,

    /// Pixels reserved for left-margin labels
    #[serde(default = "default_left_margin")]
    pub left_margin: u32,

    #[serde(default = "default_background")]
    pub background_color: String,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

fn default_true() -> bool { true }
fn default_left_margin() -> u32 { 120 }
fn default_background() -> String { "#ffffff".to_string() }
fn default_font_family() -> String { "Arial, sans-serif".to_string() }
fn default_font_size() -> u32 { 12 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_footer: true,
            show_left_labels: true,
            left_margin: default_left_margin(),
            background_color: default_background(),
            font_family: default_font_family(),
            font_size: default_font_size(),
        }
    }
}

impl RenderConfig {
    pub fn export_config(&self, title: Option<String>, provenance_comment: Option<String>) -> ExportConfig {
        ExportConfig {
            show_legend: self.show_legend,
            show_footer: self.show_footer,
            show_left_labels: self.show_left_labels,
            left_margin: self.left_margin,
            title,
            background_color: self.background_color.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            provenance_comment,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }
}
