//! Prelude module for convenient imports
//!
//! ```ignore
//! use adotrack::prelude::*;
//! ```

// Pipeline
pub use crate::config::RuntimeConfig;
pub use crate::pipeline::{ProgressSnapshot, ReconciliationPipeline};

// Error handling
pub use crate::error::{Error, Result};

// Catalog and metadata
pub use crate::level::{Level, LevelFileParser, MetadataSource, ParsedMetadata};

// Progress
pub use crate::fingerprint::Fingerprint;
pub use crate::progress::{LevelProgress, ProgressKind, ProgressState, SaveData};

// Display helpers
pub use crate::query::{LevelFilter, SortKey};
