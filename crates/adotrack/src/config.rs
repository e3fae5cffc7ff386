//! Runtime configuration for the reconciliation pipeline.
//!
//! Paths are resolved once by whoever starts the pipeline (the CLI reads them
//! from its settings file) and handed over explicitly.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default location of the fingerprint cache, relative to the working directory
pub const DEFAULT_CACHE_FILE: &str = "resource/workshop_md5_map.json";

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Workshop content folder containing one directory per external id
    pub install_root: PathBuf,
    /// Game save file holding the per-level progress values
    pub save_file_path: PathBuf,
    /// Persistent external id -> fingerprint map
    pub cache_file_path: PathBuf,
    /// Strip rich-text markup from metadata before fingerprinting
    pub strip_markup: bool,
}

impl RuntimeConfig {
    /// Create a new configuration builder
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }
}

/// Builder for RuntimeConfig
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfigBuilder {
    install_root: Option<PathBuf>,
    save_file_path: Option<PathBuf>,
    cache_file_path: Option<PathBuf>,
    strip_markup: Option<bool>,
}

impl RuntimeConfigBuilder {
    /// Set the workshop content folder
    pub fn install_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.install_root = Some(path.into());
        self
    }

    /// Set the save file path
    pub fn save_file_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.save_file_path = Some(path.into());
        self
    }

    /// Set the fingerprint cache path
    pub fn cache_file_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cache_file_path = Some(path.into());
        self
    }

    /// Enable or disable markup stripping
    pub fn strip_markup(mut self, enabled: bool) -> Self {
        self.strip_markup = Some(enabled);
        self
    }

    /// Build the configuration
    ///
    /// Fails when the install root or the save file path was never set.
    pub fn build(self) -> Result<RuntimeConfig> {
        let install_root = self
            .install_root
            .ok_or_else(|| Error::InvalidConfig("install root is not set".to_string()))?;
        let save_file_path = self
            .save_file_path
            .ok_or_else(|| Error::InvalidConfig("save file path is not set".to_string()))?;

        Ok(RuntimeConfig {
            install_root,
            save_file_path,
            cache_file_path: self
                .cache_file_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE)),
            strip_markup: self.strip_markup.unwrap_or(true),
        })
    }
}
