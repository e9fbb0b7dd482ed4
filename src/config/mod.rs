//! Configuration management module
//!
//! Handles the export directory, file naming and session preferences.

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::DEFAULT_FILE_NAME;

/// Environment variable overriding the export directory
pub const OUTPUT_DIR_ENV: &str = "PROMPTFORGE_OUTPUT_DIR";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory downloaded prompts are written to
    pub output_dir: PathBuf,
    /// File name for downloaded prompts
    pub file_name: String,
    /// Ask before overwriting an existing prompt file
    pub confirm_overwrite: bool,
    /// Show which fields fell back to defaults after each change
    pub show_defaults_hint: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            confirm_overwrite: true,
            show_defaults_hint: true,
        }
    }
}

impl Config {
    /// Load configuration from file, then apply environment overrides
    pub async fn load() -> Result<Self> {
        let mut config = Self::load_or_default(&get_config_file_path()).await?;

        if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV) {
            if !dir.trim().is_empty() {
                config.output_dir = PathBuf::from(dir);
            }
        }

        Ok(config)
    }

    /// Load configuration, using defaults only when the file does not exist.
    /// An unreadable or malformed file is an error so it is never overwritten.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::parse(&content, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Failed to read config file {}", path.display()))),
        }
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).with_context(|| {
            format!(
                "Invalid config file: {} (fix it or run 'promptforge config reset')",
                path.display()
            )
        })
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<()> {
        self.save_to(&get_config_file_path()).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Set and persist the export directory
    pub async fn set_output_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.output_dir = dir;
        self.save().await
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("📋 Current Configuration:");
        println!("  Config File: {}", get_config_file_path().display());
        println!("  Output Directory: {}", self.output_dir.display());
        println!("  File Name: {}", self.file_name);
        println!("  Confirm Overwrite: {}", self.confirm_overwrite);
        println!("  Show Defaults Hint: {}", self.show_defaults_hint);
    }

    /// Reset configuration to defaults
    pub async fn reset(&mut self) -> Result<()> {
        *self = Self::default();

        let config_path = get_config_file_path();
        if config_path.exists() {
            tokio::fs::remove_file(&config_path).await?;
        }

        Ok(())
    }
}

/// Get the configuration directory path
fn get_config_dir() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptforge")
}

/// Get the configuration file path
fn get_config_file_path() -> PathBuf {
    get_config_dir().join("config.json")
}
