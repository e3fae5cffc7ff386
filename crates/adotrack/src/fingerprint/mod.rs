//! Content fingerprints for workshop levels.
//!
//! A fingerprint is the MD5 of `author ‖ artist ‖ song` rendered as lowercase
//! hex. The game keys its per-level progress by the same digest, so the exact
//! byte sequence fed to the hasher must never change.

mod cache;
mod markup;

pub use cache::*;
pub use markup::*;

use std::fmt;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Length of a rendered fingerprint (128-bit digest as hex)
pub const FINGERPRINT_HEX_LEN: usize = 32;

/// Hex digest identifying a level's content
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already computed digest (e.g. one read from the cache)
    pub fn from_hex<S: Into<String>>(hex: S) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Save data key holding the completion fraction
    pub fn completion_key(&self) -> String {
        format!("CustomWorld_{}_Completion", self.0)
    }

    /// Save data key holding the accuracy fraction
    pub fn x_accuracy_key(&self) -> String {
        format!("CustomWorld_{}_XAccuracy", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of a level's identity fields.
///
/// Absent fields count as empty strings. With `strip_markup`, rich-text tags
/// and character entities are removed from each field first.
pub fn fingerprint(
    author: Option<&str>,
    artist: Option<&str>,
    song: Option<&str>,
    strip_markup: bool,
) -> Fingerprint {
    let mut hasher = Md5::new();
    for field in [author, artist, song] {
        let field = field.unwrap_or("");
        if strip_markup {
            hasher.update(markup::strip_markup(field).as_bytes());
        } else {
            hasher.update(field.as_bytes());
        }
    }
    Fingerprint(format!("{:x}", hasher.finalize()))
}
