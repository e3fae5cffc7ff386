//! Read-only view of the game's custom level save file.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fingerprint::Fingerprint;

/// Key/value contents of the save file (`custom_data.sav`)
#[derive(Debug, Clone, Default)]
pub struct SaveData {
    values: Map<String, Value>,
}

impl SaveData {
    /// Load the save file. Any failure is reported as `SaveDataUnavailable`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let unavailable = |message: String| Error::SaveDataUnavailable {
            path: path.to_path_buf(),
            message,
        };

        let bytes = fs::read(path).map_err(|e| unavailable(e.to_string()))?;
        let (encoding, bom_len) = Encoding::for_bom(&bytes).unwrap_or((UTF_8, 0));
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);

        Self::from_json_str(&text).map_err(|e| unavailable(e.to_string()))
    }

    /// Parse save data from JSON text; the document must be an object
    pub fn from_json_str(content: &str) -> Result<Self> {
        let values: Map<String, Value> = serde_json::from_str(content)?;
        Ok(Self { values })
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Numeric value stored under `key`; non-numeric values count as absent
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        let value = self.values.get(key)?;
        let number = value.as_f64();
        if number.is_none() {
            debug!("Ignoring non-numeric save value {}: {}", key, value);
        }
        number
    }

    pub fn completion(&self, fingerprint: &Fingerprint) -> Option<f64> {
        self.get_f64(&fingerprint.completion_key())
    }

    pub fn x_accuracy(&self, fingerprint: &Fingerprint) -> Option<f64> {
        self.get_f64(&fingerprint.x_accuracy_key())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
