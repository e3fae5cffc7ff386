//! Settings file handling.
//!
//! Paths come from a TOML file and can be overridden per invocation. Nothing
//! is discovered automatically; the game and workshop locations must be set.

use std::fs;
use std::path::{Path, PathBuf};

use adotrack::{DEFAULT_CACHE_FILE, RuntimeConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::PathArgs;

/// Default level catalog location, relative to the working directory
pub const DEFAULT_CATALOG_FILE: &str = "resource/levels_info.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub install_root: Option<PathBuf>,
    pub save_file: Option<PathBuf>,
    pub cache_file: Option<PathBuf>,
    pub catalog_file: Option<PathBuf>,
    pub strip_markup: Option<bool>,
}

impl Settings {
    /// Load settings from `path`, or from the default location if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => match default_settings_path() {
                Some(path) if path.exists() => Self::load_from_path(&path),
                _ => {
                    debug!("No settings file, using command line paths only");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Pipeline configuration with command line overrides applied
    pub fn runtime_config(&self, args: &PathArgs) -> Result<RuntimeConfig> {
        let mut builder = RuntimeConfig::builder()
            .cache_file_path(self.cache_file(args))
            .strip_markup(!args.no_strip_markup && self.strip_markup.unwrap_or(true));

        if let Some(root) = args.install_root.as_ref().or(self.install_root.as_ref()) {
            builder = builder.install_root(root);
        }
        if let Some(save) = args.save_file.as_ref().or(self.save_file.as_ref()) {
            builder = builder.save_file_path(save);
        }

        builder
            .build()
            .context("Set install_root and save_file in the settings file or on the command line")
    }

    pub fn cache_file(&self, args: &PathArgs) -> PathBuf {
        args.cache_file
            .clone()
            .or_else(|| self.cache_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE))
    }

    pub fn catalog_file(&self, args: &PathArgs) -> PathBuf {
        args.catalog
            .clone()
            .or_else(|| self.catalog_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE))
    }
}

fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("adotrack").join("config.toml"))
}
