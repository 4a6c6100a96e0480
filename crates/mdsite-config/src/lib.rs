//! Configuration management for mdsite.
//!
//! Parses `mdsite.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every section is
//! optional; a missing file yields the defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdsite.toml";

/// Deepest heading level the TOC may include.
const MAX_TOC_LEVEL: u8 = 3;

/// Site build configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown conversion configuration.
    pub markdown: MarkdownConfig,
    /// Table-of-contents configuration.
    pub toc: TocConfig,
    /// Togglable-tabs configuration.
    pub tabs: TabsConfig,
    /// Sequence-diagram configuration.
    pub diagrams: DiagramsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown conversion configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Whether GitHub Flavored Markdown features are enabled.
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Table-of-contents configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Whether heading anchors and the sidenav are generated.
    pub enabled: bool,
    /// Deepest heading level listed in the sidenav (1–3).
    pub max_level: u8,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_level: MAX_TOC_LEVEL,
        }
    }
}

/// Togglable-tabs configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Whether `<tabber>` markup is expanded.
    pub enabled: bool,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Sequence-diagram configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Whether sequence-diagram blocks are wrapped for client-side rendering.
    pub enabled: bool,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `mdsite.toml` in the current directory and parents,
    /// falling back to defaults when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, or if
    /// parsing or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default()),
        }
    }

    /// Search for a config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toc.max_level == 0 || self.toc.max_level > MAX_TOC_LEVEL {
            return Err(ConfigError::Validation(format!(
                "toc.max_level must be between 1 and {MAX_TOC_LEVEL}"
            )));
        }
        Ok(())
    }
}
