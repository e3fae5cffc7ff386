//! Workshop level catalog and level file parsing.

mod catalog;
mod parser;

pub use catalog::*;
pub use parser::*;

use serde::{Deserialize, Serialize};

/// Song information attached to a catalog entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Music {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<String>,
}

/// Catalog entry for a workshop level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: u32,
    pub workshop_url: String,
    #[serde(default)]
    pub music: Music,
    #[serde(default)]
    pub difficulty: f64,
}

impl Level {
    /// Workshop content folder id taken from the workshop URL
    pub fn external_id(&self) -> &str {
        extract_external_id(&self.workshop_url)
    }

    /// Artists joined for display
    pub fn artists_display(&self) -> String {
        self.music.artists.join(", ")
    }
}

/// Extract the external id from a workshop reference.
///
/// Anything from the first `&` on is ignored; the id is the text after the
/// last `=` of what remains (`...?id=123456&searchtext=` yields `123456`).
pub fn extract_external_id(reference: &str) -> &str {
    let head = reference.split('&').next().unwrap_or(reference);
    head.rsplit('=').next().unwrap_or(head)
}
