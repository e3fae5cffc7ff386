//! Level catalog loading.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::Level;

/// Load the level catalog from a JSON array.
///
/// Entries that are not objects or do not describe a level are dropped. A
/// missing or unparseable file yields an empty catalog.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Vec<Level> {
    let path = path.as_ref();

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read level catalog {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let levels = parse_catalog(&content);
    info!("Loaded {} levels from {}", levels.len(), path.display());
    levels
}

/// Parse catalog JSON text
pub fn parse_catalog(content: &str) -> Vec<Level> {
    let entries = match serde_json::from_str::<Value>(content.trim_start_matches('\u{feff}')) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("Level catalog is not a JSON array");
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to parse level catalog: {}", e);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| match serde_json::from_value::<Level>(entry) {
            Ok(level) => Some(level),
            Err(e) => {
                debug!("Skipping catalog entry: {}", e);
                None
            }
        })
        .collect()
}
