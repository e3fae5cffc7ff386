//! Persistent fingerprint cache.
//!
//! Maps workshop external ids to fingerprints so level files are only parsed
//! the first time a level is seen. Entries are never invalidated: the cache
//! carries no record of how a fingerprint was derived.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::Fingerprint;
use crate::error::Result;

/// External id -> fingerprint
pub type FingerprintMap = BTreeMap<String, Fingerprint>;

/// JSON file backed fingerprint cache
#[derive(Debug, Clone)]
pub struct FingerprintCache {
    path: PathBuf,
}

impl FingerprintCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached mapping.
    ///
    /// A missing or corrupt file is replaced with an empty mapping on disk.
    /// Any other read failure leaves the file alone and yields an empty mapping.
    pub fn load(&self) -> FingerprintMap {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Fingerprint cache {} not found", self.path.display());
                self.reset();
                return FingerprintMap::new();
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(
                    "Fingerprint cache {} is not valid UTF-8, starting empty: {}",
                    self.path.display(),
                    e
                );
                self.reset();
                return FingerprintMap::new();
            }
            Err(e) => {
                warn!(
                    "Cannot read fingerprint cache {}: {}",
                    self.path.display(),
                    e
                );
                return FingerprintMap::new();
            }
        };

        match serde_json::from_str::<FingerprintMap>(content.trim_start_matches('\u{feff}')) {
            Ok(map) => {
                debug!(
                    "Loaded {} cached fingerprints from {}",
                    map.len(),
                    self.path.display()
                );
                map
            }
            Err(e) => {
                warn!(
                    "Fingerprint cache {} is corrupt, starting empty: {}",
                    self.path.display(),
                    e
                );
                self.reset();
                FingerprintMap::new()
            }
        }
    }

    /// Overwrite the cache file with the full mapping
    pub fn save(&self, map: &FingerprintMap) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, content)?;
        info!(
            "Saved {} fingerprints to {}",
            map.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Replace the cache file with an empty mapping
    pub fn reset(&self) {
        if let Err(e) = self.save(&FingerprintMap::new()) {
            warn!(
                "Failed to initialize fingerprint cache {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
