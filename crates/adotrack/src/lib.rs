//! # adotrack
//!
//! Core library for tracking completion of subscribed workshop levels.
//!
//! This crate provides:
//! - Level catalog loading and level file metadata extraction
//! - Content fingerprints and the persistent fingerprint cache
//! - Save file lookup and progress classification
//! - The reconciliation pipeline tying them together
//! - Skill rating aggregation, filtering and sorting for display

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod level;
pub mod pipeline;
pub mod prelude;
pub mod progress;
pub mod query;

pub use config::{DEFAULT_CACHE_FILE, RuntimeConfig, RuntimeConfigBuilder};
pub use error::{Error, Result};
pub use fingerprint::{
    FINGERPRINT_HEX_LEN, Fingerprint, FingerprintCache, FingerprintMap, decode_entities,
    fingerprint, strip_markup,
};
pub use level::{
    LEVEL_FILE_NAME, Level, LevelFileParser, MetadataSource, Music, ParsedMetadata,
    decode_level_text, extract_external_id, extract_metadata, load_catalog, parse_catalog,
};
pub use pipeline::{ProgressSnapshot, ReconciliationPipeline};
pub use progress::{
    DEFAULT_RATING_TOP_N, LevelProgress, ProgressKind, ProgressState, SaveData, resolve,
    skill_contribution, skill_rating,
};
pub use query::{LevelFilter, SortKey, select_levels};
