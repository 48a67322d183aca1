//! Configuration management for wiki outline rendering.
//!
//! Parses `wm.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ## Environment Variable Expansion
//!
//! `outline.wiki_id` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wm.toml";

/// Upper bound for `ads.max_ads`.
const MAX_ADS_LIMIT: usize = 100;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Outline serialization configuration.
    pub outline: OutlineConfig,
    /// In-content ad placement configuration.
    pub ads: AdsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Outline serialization configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Whether section edit buttons are emitted.
    pub edit_buttons: bool,
    /// Whether the leading image of the page is captured as featured image.
    pub header_metadata: bool,
    /// Page identifier written into edit buttons.
    pub wiki_id: String,
    /// Fail on internal outline errors. Unset means strict in debug builds only.
    pub strict: Option<bool>,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            edit_buttons: true,
            header_metadata: true,
            wiki_id: "start".to_owned(),
            strict: None,
        }
    }
}

/// In-content ad placement configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AdsConfig {
    /// Whether ad markers are inserted at all.
    pub enabled: bool,
    /// Content lines required since the previous marker.
    pub min_cumulative_lines: usize,
    /// Content lines a section must have to receive a marker.
    pub min_section_lines: usize,
    /// Maximum number of markers per page.
    pub max_ads: usize,
    /// Never place a marker in the last section.
    pub skip_last_section: bool,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_cumulative_lines: 25,
            min_section_lines: 3,
            max_ads: 4,
            skip_last_section: true,
        }
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`outline.wiki_id`").
        field: String,
        /// Error message.
        message: String,
    },
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wm.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Search for a config file in `start_dir` and its parents.
    #[must_use]
    pub fn discover(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Parse, expand and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let wiki_id = &self.outline.wiki_id;
        if wiki_id.is_empty() {
            return Err(ConfigError::Validation(
                "outline.wiki_id cannot be empty".to_owned(),
            ));
        }
        if wiki_id.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "outline.wiki_id cannot contain whitespace".to_owned(),
            ));
        }
        if self.ads.max_ads > MAX_ADS_LIMIT {
            return Err(ConfigError::Validation(format!(
                "ads.max_ads cannot exceed {MAX_ADS_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.outline.wiki_id = expand_env(&self.outline.wiki_id, "outline.wiki_id")?;
        Ok(())
    }
}

fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}
