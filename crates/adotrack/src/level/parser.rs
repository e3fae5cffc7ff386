//! Level file metadata extraction.
//!
//! A level file (`main.adofai`) is a loosely JSON-shaped document using `\r`
//! line breaks. Only `author`, `artist` and `song` are needed, so the fields are
//! pulled out by pattern instead of parsing the whole document; the files in
//! the wild carry trailing commas and raw control characters that strict JSON
//! parsers reject.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use encoding_rs::{DecoderResult, Encoding, UTF_8};
use regex::Regex;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::fingerprint::{Fingerprint, fingerprint};

/// Level definition file inside each workshop folder
pub const LEVEL_FILE_NAME: &str = "main.adofai";

static AUTHOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| field_pattern("author"));
static ARTIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| field_pattern("artist"));
static SONG_PATTERN: LazyLock<Regex> = LazyLock::new(|| field_pattern("song"));

fn field_pattern(field: &str) -> Regex {
    Regex::new(&format!(r#"(?s)"{field}":\s*"((?:\\"|.)*?)""#))
        .expect("field pattern is a valid regex")
}

/// The three identity fields of a level. Either all are known or none is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMetadata {
    pub author: String,
    pub artist: String,
    pub song: String,
}

impl ParsedMetadata {
    /// Fingerprint of these fields
    pub fn fingerprint(&self, strip_markup: bool) -> Fingerprint {
        fingerprint(
            Some(self.author.as_str()),
            Some(self.artist.as_str()),
            Some(self.song.as_str()),
            strip_markup,
        )
    }
}

/// Source of level metadata keyed by external id
pub trait MetadataSource {
    fn read_metadata(&self, external_id: &str) -> Result<ParsedMetadata>;
}

/// Reads metadata from level files below the workshop content folder
#[derive(Debug, Clone)]
pub struct LevelFileParser {
    install_root: PathBuf,
}

impl LevelFileParser {
    pub fn new<P: Into<PathBuf>>(install_root: P) -> Self {
        Self {
            install_root: install_root.into(),
        }
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Path of the level file for an external id
    pub fn level_path(&self, external_id: &str) -> PathBuf {
        self.install_root.join(external_id).join(LEVEL_FILE_NAME)
    }

    /// Parse the level file for an external id.
    ///
    /// A missing file is logged at info level and a malformed one at error
    /// level; neither yields partial metadata.
    pub fn parse(&self, external_id: &str) -> Result<ParsedMetadata> {
        let path = self.level_path(external_id);

        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Level file not found: {}", path.display());
                return Err(Error::LevelFileNotFound(path));
            }
            Err(e) => {
                error!("Failed to read level file {}: {}", path.display(), e);
                return Err(Error::LevelFileMalformed {
                    path,
                    message: e.to_string(),
                });
            }
        };

        let text = decode_level_text(&bytes);
        match extract_metadata(&text) {
            Some(metadata) => Ok(metadata),
            None => {
                error!(
                    "Level file {} is missing author/artist/song",
                    path.display()
                );
                Err(Error::LevelFileMalformed {
                    path,
                    message: "missing author/artist/song".to_string(),
                })
            }
        }
    }
}

impl MetadataSource for LevelFileParser {
    fn read_metadata(&self, external_id: &str) -> Result<ParsedMetadata> {
        self.parse(external_id)
    }
}

/// Decode raw level file bytes into text.
///
/// Honours a UTF-8 or UTF-16 byte order mark and falls back to UTF-8.
/// Malformed byte sequences are dropped without touching characters that were
/// validly encoded, and literal `\n` escapes are turned into real newlines.
pub fn decode_level_text(bytes: &[u8]) -> String {
    let (encoding, bom_len): (&'static Encoding, usize) =
        Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut input = &bytes[bom_len..];
    let mut text = String::with_capacity(
        decoder
            .max_utf8_buffer_length_without_replacement(input.len())
            .unwrap_or(input.len()),
    );

    loop {
        let (result, read) = decoder.decode_to_string_without_replacement(input, &mut text, true);
        input = &input[read..];
        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::OutputFull => {
                let needed = decoder
                    .max_utf8_buffer_length_without_replacement(input.len())
                    .unwrap_or(input.len());
                text.reserve(needed.max(4));
            }
            DecoderResult::Malformed(_, _) => {}
        }
    }

    text.replace("\\n", "\n")
}

/// Extract author, artist and song from decoded level text
pub fn extract_metadata(text: &str) -> Option<ParsedMetadata> {
    Some(ParsedMetadata {
        author: capture_field(&AUTHOR_PATTERN, text)?,
        artist: capture_field(&ARTIST_PATTERN, text)?,
        song: capture_field(&SONG_PATTERN, text)?,
    })
}

fn capture_field(pattern: &Regex, text: &str) -> Option<String> {
    let captures = pattern.captures(text)?;
    Some(captures.get(1)?.as_str().replace("\\\"", "\""))
}
